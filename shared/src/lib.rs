//! Wire types shared between the habit stack backend and its clients.
//!
//! These structs define the JSON payloads of the REST API. Dates travel as
//! RFC 3339 strings; the backend's domain layer owns the typed
//! representations and maps to/from these DTOs at the REST boundary.

use serde::{Deserialize, Serialize};

/// A single repeatable action with an estimated duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    /// Id of the category this habit belongs to
    pub category: String,
    /// Estimated duration in minutes
    pub time: u32,
    pub description: String,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

/// Payload for creating a habit. The id and creation timestamp are assigned
/// by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateHabitRequest {
    pub name: String,
    pub category: String,
    pub time: u32,
    pub description: String,
}

/// Payload for replacing a habit's editable fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateHabitRequest {
    pub name: String,
    pub category: String,
    pub time: u32,
    pub description: String,
}

/// A grouping label for habits, with display styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitCategory {
    pub id: String,
    /// Unique among categories
    pub name: String,
    /// Hex color used by the frontend, e.g. "#FFB800"
    pub color: String,
    pub icon: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub color: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: String,
    pub color: String,
    pub icon: String,
}

/// One entry of a habit stack: a reference to a habit plus its completion
/// state within that stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackHabit {
    #[serde(rename = "habitId")]
    pub habit_id: String,
    pub completed: bool,
}

/// An ordered group of habits performed as a routine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitStack {
    pub id: String,
    pub name: String,
    /// Entries in display/execution order
    pub habits: Vec<StackHabit>,
    pub created_at: String,
    /// Most recent moment the whole stack was complete (RFC 3339)
    #[serde(rename = "lastCompleted")]
    pub last_completed: Option<String>,
}

/// Payload for creating a stack. The id and creation timestamp are assigned
/// by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateStackRequest {
    pub name: String,
    pub habits: Vec<StackHabit>,
}

/// Payload for replacing a stack's name, entries and last-completed marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStackRequest {
    pub name: String,
    pub habits: Vec<StackHabit>,
    #[serde(rename = "lastCompleted")]
    pub last_completed: Option<String>,
}

/// Streak and completion-rate statistics for one stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressData {
    pub id: String,
    pub stack_id: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Completed fraction of the stack at the last recompute, 0.0 to 1.0
    pub completion_rate: f64,
    /// Seven day-slot completion flags
    pub last_week_progress: Vec<bool>,
    pub updated_at: String,
}

/// Payload for overwriting a stack's progress statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateProgressRequest {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub completion_rate: f64,
    pub last_week_progress: Vec<bool>,
}

/// Payload for toggling one habit's completion flag within a stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleHabitRequest {
    pub stack_id: String,
    pub habit_id: String,
}

/// Generic success envelope for operations that return no resource body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error envelope returned for every failed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    /// Stable machine-readable code, e.g. "RESOURCE_NOT_FOUND"
    pub error_code: String,
    pub status_code: u16,
    pub timestamp: String,
}
