use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A grouping label for habits. Names are unique across categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitCategory {
    pub id: String,
    pub name: String,
    /// Hex color used by the frontend, e.g. "#FFB800"
    pub color: String,
    pub icon: String,
    pub created_at: DateTime<Utc>,
}
