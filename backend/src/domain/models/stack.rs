use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference to a habit plus its completion state within one stack.
///
/// The reference is weak: deleting the habit does not touch the entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackHabit {
    pub habit_id: String,
    pub completed: bool,
}

impl StackHabit {
    /// New entry, not yet completed.
    pub fn new(habit_id: impl Into<String>) -> Self {
        Self {
            habit_id: habit_id.into(),
            completed: false,
        }
    }
}

/// An ordered group of habits performed as a routine.
///
/// Entry order is display/execution order and is preserved verbatim through
/// every operation. Completion state lives on the entries; everything else
/// about completion is derived on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitStack {
    pub id: String,
    pub name: String,
    pub habits: Vec<StackHabit>,
    pub created_at: DateTime<Utc>,
    /// Most recent moment the whole stack was complete. Never cleared once
    /// set, even when an entry is toggled back off.
    pub last_completed: Option<DateTime<Utc>>,
}

impl HabitStack {
    /// True when every entry in the stack is marked completed.
    pub fn is_completed(&self) -> bool {
        self.habits.iter().all(|h| h.completed)
    }

    pub fn completed_count(&self) -> usize {
        self.habits.iter().filter(|h| h.completed).count()
    }

    /// Completed share of the stack, 0.0 to 100.0. Zero for an empty entry
    /// sequence rather than NaN.
    pub fn completion_percentage(&self) -> f64 {
        if self.habits.is_empty() {
            return 0.0;
        }
        self.completed_count() as f64 / self.habits.len() as f64 * 100.0
    }
}
