use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Streak and completion-rate statistics for one stack.
///
/// Exactly one record exists per stack; the stack-id-keyed upsert in the
/// progress service enforces this, not the store itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressData {
    pub id: String,
    pub stack_id: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Completed fraction of the stack at the last recompute, 0.0 to 1.0.
    /// A point-in-time snapshot, not a rolling average.
    pub completion_rate: f64,
    /// Opaque seven-slot day history. The toggle path never writes it; only
    /// record creation and explicit updates do.
    pub last_week_progress: [bool; 7],
    pub updated_at: DateTime<Utc>,
}

impl ProgressData {
    /// Zero-valued record for a stack that has no progress yet.
    pub fn new_for_stack(stack_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            stack_id: stack_id.to_string(),
            current_streak: 0,
            longest_streak: 0,
            completion_rate: 0.0,
            last_week_progress: [false; 7],
            updated_at: Utc::now(),
        }
    }
}
