//! Habit catalog service: CRUD plus category and name-search filtering.

use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::commands::habits::{CreateHabitCommand, HabitListQuery, UpdateHabitCommand};
use crate::domain::models::habit::Habit;
use crate::error::{DomainError, DomainResult};
use crate::storage::json::{HabitRepository, JsonConnection};
use crate::storage::traits::HabitStorage;

/// Service for managing the habit catalog.
#[derive(Clone)]
pub struct HabitService {
    habit_repository: HabitRepository,
}

impl HabitService {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self {
            habit_repository: HabitRepository::new(connection),
        }
    }

    /// List habits, optionally narrowed to a category and/or a
    /// case-insensitive substring of the name. Both filters may be combined.
    pub fn list_habits(&self, query: HabitListQuery) -> DomainResult<Vec<Habit>> {
        let mut habits = self.habit_repository.list_habits()?;

        if let Some(category) = &query.category {
            habits.retain(|h| &h.category == category);
        }
        if let Some(search) = &query.search {
            let needle = search.to_lowercase();
            habits.retain(|h| h.name.to_lowercase().contains(&needle));
        }

        info!("Found {} habits", habits.len());
        Ok(habits)
    }

    pub fn get_habit(&self, habit_id: &str) -> DomainResult<Habit> {
        self.habit_repository
            .get_habit(habit_id)?
            .ok_or_else(|| DomainError::not_found("Habit", habit_id))
    }

    pub fn create_habit(&self, command: CreateHabitCommand) -> DomainResult<Habit> {
        Self::validate_fields(&command.name, &command.category, command.time, &command.description)?;

        let habit = Habit {
            id: command.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: command.name,
            category: command.category,
            time: command.time,
            description: command.description,
            created_at: command.created_at.unwrap_or_else(Utc::now),
        };
        self.habit_repository.store_habit(&habit)?;

        info!("Created habit: {} with ID: {}", habit.name, habit.id);
        Ok(habit)
    }

    /// Replace a habit's editable fields; id and creation timestamp are
    /// preserved from the stored record.
    pub fn update_habit(&self, habit_id: &str, command: UpdateHabitCommand) -> DomainResult<Habit> {
        let mut habit = self.get_habit(habit_id)?;

        Self::validate_fields(&command.name, &command.category, command.time, &command.description)?;

        habit.name = command.name;
        habit.category = command.category;
        habit.time = command.time;
        habit.description = command.description;

        self.habit_repository.update_habit(&habit)?;

        info!("Updated habit: {}", habit_id);
        Ok(habit)
    }

    pub fn delete_habit(&self, habit_id: &str) -> DomainResult<()> {
        if !self.habit_repository.delete_habit(habit_id)? {
            return Err(DomainError::not_found("Habit", habit_id));
        }
        info!("Deleted habit: {}", habit_id);
        Ok(())
    }

    fn validate_fields(
        name: &str,
        category: &str,
        time: u32,
        description: &str,
    ) -> DomainResult<()> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("Habit name is required"));
        }
        if category.trim().is_empty() {
            return Err(DomainError::validation("Category is required"));
        }
        if time < 1 {
            return Err(DomainError::validation("Time must be at least 1 minute"));
        }
        if description.trim().is_empty() {
            return Err(DomainError::validation("Description is required"));
        }
        Ok(())
    }
}
