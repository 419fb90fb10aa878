//! Habit-category service: CRUD with name-uniqueness enforcement.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::commands::categories::{CreateCategoryCommand, UpdateCategoryCommand};
use crate::domain::models::category::HabitCategory;
use crate::error::{DomainError, DomainResult};
use crate::storage::json::{CategoryRepository, JsonConnection};
use crate::storage::traits::CategoryStorage;

/// Service for managing habit categories.
#[derive(Clone)]
pub struct CategoryService {
    category_repository: CategoryRepository,
}

impl CategoryService {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self {
            category_repository: CategoryRepository::new(connection),
        }
    }

    pub fn list_categories(&self) -> DomainResult<Vec<HabitCategory>> {
        Ok(self.category_repository.list_categories()?)
    }

    pub fn get_category(&self, category_id: &str) -> DomainResult<HabitCategory> {
        self.category_repository
            .get_category(category_id)?
            .ok_or_else(|| DomainError::not_found("Category", category_id))
    }

    pub fn get_category_by_name(&self, name: &str) -> DomainResult<Option<HabitCategory>> {
        Ok(self.category_repository.get_category_by_name(name)?)
    }

    pub fn create_category(&self, command: CreateCategoryCommand) -> DomainResult<HabitCategory> {
        Self::validate_fields(&command.name, &command.color, &command.icon)?;

        if self.category_repository.get_category_by_name(&command.name)?.is_some() {
            warn!("Category already exists with name: {}", command.name);
            return Err(DomainError::already_exists("Category", command.name));
        }

        let category = HabitCategory {
            id: command.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: command.name,
            color: command.color,
            icon: command.icon,
            created_at: Utc::now(),
        };
        self.category_repository.store_category(&category)?;

        info!("Created category: {} with ID: {}", category.name, category.id);
        Ok(category)
    }

    /// Replace a category's editable fields; renaming onto a name that
    /// another category holds is a conflict.
    pub fn update_category(
        &self,
        category_id: &str,
        command: UpdateCategoryCommand,
    ) -> DomainResult<HabitCategory> {
        let mut category = self.get_category(category_id)?;

        Self::validate_fields(&command.name, &command.color, &command.icon)?;

        if category.name != command.name
            && self.category_repository.get_category_by_name(&command.name)?.is_some()
        {
            warn!("Category name already exists: {}", command.name);
            return Err(DomainError::already_exists("Category", command.name));
        }

        category.name = command.name;
        category.color = command.color;
        category.icon = command.icon;

        self.category_repository.update_category(&category)?;

        info!("Updated category: {}", category_id);
        Ok(category)
    }

    pub fn delete_category(&self, category_id: &str) -> DomainResult<()> {
        if !self.category_repository.delete_category(category_id)? {
            return Err(DomainError::not_found("Category", category_id));
        }
        info!("Deleted category: {}", category_id);
        Ok(())
    }

    fn validate_fields(name: &str, color: &str, icon: &str) -> DomainResult<()> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("Category name is required"));
        }
        if color.trim().is_empty() {
            return Err(DomainError::validation("Category color is required"));
        }
        if icon.trim().is_empty() {
            return Err(DomainError::validation("Category icon is required"));
        }
        Ok(())
    }
}
