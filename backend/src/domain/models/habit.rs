use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single repeatable action with an estimated duration in minutes.
///
/// Habits are catalog entries; stacks reference them by id without owning
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    /// Id of the category this habit belongs to
    pub category: String,
    /// Estimated duration in minutes, at least 1
    pub time: u32,
    pub description: String,
    pub created_at: DateTime<Utc>,
}
