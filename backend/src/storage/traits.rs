//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! document-store backends to be used interchangeably in the domain layer.

use anyhow::Result;

use crate::domain::models::category::HabitCategory;
use crate::domain::models::habit::Habit;
use crate::domain::models::progress::ProgressData;
use crate::domain::models::stack::HabitStack;

/// Trait defining the interface for habit catalog storage operations.
pub trait HabitStorage: Send + Sync {
    /// Store a new habit document
    fn store_habit(&self, habit: &Habit) -> Result<()>;

    /// Retrieve a specific habit by id
    fn get_habit(&self, habit_id: &str) -> Result<Option<Habit>>;

    /// List all habits in insertion order
    fn list_habits(&self) -> Result<Vec<Habit>>;

    /// Update an existing habit document
    fn update_habit(&self, habit: &Habit) -> Result<()>;

    /// Delete a habit by id
    /// Returns true if the habit was found and deleted, false otherwise
    fn delete_habit(&self, habit_id: &str) -> Result<bool>;
}

/// Trait defining the interface for category storage operations.
pub trait CategoryStorage: Send + Sync {
    /// Store a new category document
    fn store_category(&self, category: &HabitCategory) -> Result<()>;

    /// Retrieve a specific category by id
    fn get_category(&self, category_id: &str) -> Result<Option<HabitCategory>>;

    /// Indexed lookup by the unique category name
    fn get_category_by_name(&self, name: &str) -> Result<Option<HabitCategory>>;

    /// List all categories in insertion order
    fn list_categories(&self) -> Result<Vec<HabitCategory>>;

    /// Update an existing category document
    fn update_category(&self, category: &HabitCategory) -> Result<()>;

    /// Delete a category by id
    /// Returns true if the category was found and deleted, false otherwise
    fn delete_category(&self, category_id: &str) -> Result<bool>;
}

/// Trait defining the interface for habit-stack storage operations.
pub trait HabitStackStorage: Send + Sync {
    /// Store a new stack document
    fn store_stack(&self, stack: &HabitStack) -> Result<()>;

    /// Retrieve a specific stack by id
    fn get_stack(&self, stack_id: &str) -> Result<Option<HabitStack>>;

    /// List all stacks in insertion order
    fn list_stacks(&self) -> Result<Vec<HabitStack>>;

    /// Update an existing stack document
    fn update_stack(&self, stack: &HabitStack) -> Result<()>;

    /// Delete a stack by id
    /// Returns true if the stack was found and deleted, false otherwise
    fn delete_stack(&self, stack_id: &str) -> Result<bool>;
}

/// Trait defining the interface for progress-record storage operations.
///
/// Progress records carry their own storage id but are addressed by the
/// owning stack's id for every lifecycle operation, so the trait exposes
/// both lookups.
pub trait ProgressStorage: Send + Sync {
    /// Store a new progress record
    fn store_progress(&self, progress: &ProgressData) -> Result<()>;

    /// Retrieve a specific record by its storage id
    fn get_progress(&self, progress_id: &str) -> Result<Option<ProgressData>>;

    /// Indexed lookup by the owning stack's id
    fn find_by_stack_id(&self, stack_id: &str) -> Result<Option<ProgressData>>;

    /// List all progress records in insertion order
    fn list_progress(&self) -> Result<Vec<ProgressData>>;

    /// Update an existing record
    fn update_progress(&self, progress: &ProgressData) -> Result<()>;

    /// Delete a record by its storage id
    /// Returns true if the record was found and deleted, false otherwise
    fn delete_progress(&self, progress_id: &str) -> Result<bool>;

    /// Delete the record belonging to a stack
    /// Returns true if a record was found and deleted, false otherwise
    fn delete_by_stack_id(&self, stack_id: &str) -> Result<bool>;
}
