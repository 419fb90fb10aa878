//! Domain-level command and query types.
//!
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer is responsible for mapping the
//! public DTOs defined in the `shared` crate to these internal types.

pub mod habits {
    use chrono::{DateTime, Utc};

    /// Input for creating a habit. Seed data supplies fixed ids and
    /// timestamps; the REST layer leaves them unset.
    #[derive(Debug, Clone)]
    pub struct CreateHabitCommand {
        pub id: Option<String>,
        pub name: String,
        pub category: String,
        pub time: u32,
        pub description: String,
        pub created_at: Option<DateTime<Utc>>,
    }

    /// Input for replacing a habit's editable fields.
    #[derive(Debug, Clone)]
    pub struct UpdateHabitCommand {
        pub name: String,
        pub category: String,
        pub time: u32,
        pub description: String,
    }

    /// Filters for listing habits. Both may be combined.
    #[derive(Debug, Clone, Default)]
    pub struct HabitListQuery {
        pub category: Option<String>,
        pub search: Option<String>,
    }
}

pub mod categories {
    /// Input for creating a category.
    #[derive(Debug, Clone)]
    pub struct CreateCategoryCommand {
        pub id: Option<String>,
        pub name: String,
        pub color: String,
        pub icon: String,
    }

    /// Input for replacing a category's editable fields.
    #[derive(Debug, Clone)]
    pub struct UpdateCategoryCommand {
        pub name: String,
        pub color: String,
        pub icon: String,
    }
}

pub mod stacks {
    use chrono::{DateTime, Utc};

    use crate::domain::models::stack::StackHabit;

    /// Input for creating a stack. Seed data supplies fixed ids and
    /// timestamps; the REST layer leaves them unset.
    #[derive(Debug, Clone)]
    pub struct CreateStackCommand {
        pub id: Option<String>,
        pub name: String,
        pub habits: Vec<StackHabit>,
        pub created_at: Option<DateTime<Utc>>,
        pub last_completed: Option<DateTime<Utc>>,
    }

    /// Input for replacing a stack's name, entry sequence and last-completed
    /// marker. The entry sequence is replaced wholesale, not merged.
    #[derive(Debug, Clone)]
    pub struct UpdateStackCommand {
        pub name: String,
        pub habits: Vec<StackHabit>,
        pub last_completed: Option<DateTime<Utc>>,
    }
}

pub mod progress {
    /// Input for overwriting an existing progress record's statistics.
    #[derive(Debug, Clone)]
    pub struct UpdateProgressCommand {
        pub current_streak: u32,
        pub longest_streak: u32,
        pub completion_rate: f64,
        pub last_week_progress: [bool; 7],
    }
}
