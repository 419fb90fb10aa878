//! Habit-stack service: stack CRUD plus the completion toggle.
//!
//! The toggle is the one genuinely stateful transition in the system. It
//! performs a read-modify-write on two independent documents (the stack,
//! then its progress record) with no cross-document transaction; the second
//! write derives everything from the stack state just saved, so retrying it
//! alone is safe. Concurrent toggles on the same stack are last-writer-wins.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::commands::stacks::{CreateStackCommand, UpdateStackCommand};
use crate::domain::models::stack::HabitStack;
use crate::domain::progress_service::ProgressService;
use crate::error::{DomainError, DomainResult};
use crate::storage::json::{JsonConnection, StackRepository};
use crate::storage::traits::HabitStackStorage;

/// Service owning habit-stack CRUD and the completion-toggle transition.
#[derive(Clone)]
pub struct StackService {
    stack_repository: StackRepository,
    progress_service: ProgressService,
}

impl StackService {
    pub fn new(connection: Arc<JsonConnection>, progress_service: ProgressService) -> Self {
        Self {
            stack_repository: StackRepository::new(connection),
            progress_service,
        }
    }

    /// List stacks, optionally filtered by a case-insensitive substring of
    /// the name. Insertion order otherwise.
    pub fn list_stacks(&self, search: Option<&str>) -> DomainResult<Vec<HabitStack>> {
        let mut stacks = self.stack_repository.list_stacks()?;
        if let Some(query) = search {
            let query = query.to_lowercase();
            stacks.retain(|s| s.name.to_lowercase().contains(&query));
        }
        Ok(stacks)
    }

    pub fn get_stack(&self, stack_id: &str) -> DomainResult<HabitStack> {
        self.stack_repository
            .get_stack(stack_id)?
            .ok_or_else(|| DomainError::not_found("Stack", stack_id))
    }

    /// Create a stack and its initial zero-valued progress record.
    pub fn create_stack(&self, command: CreateStackCommand) -> DomainResult<HabitStack> {
        Self::validate_name_and_entries(&command.name, command.habits.len())?;

        let stack = HabitStack {
            id: command.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: command.name,
            habits: command.habits,
            created_at: command.created_at.unwrap_or_else(Utc::now),
            last_completed: command.last_completed,
        };
        self.stack_repository.store_stack(&stack)?;

        // Every stack has a progress record from the moment it exists.
        self.progress_service.get_or_default(&stack.id)?;

        info!("Created stack: {} with ID: {}", stack.name, stack.id);
        Ok(stack)
    }

    /// Replace name, habit entries and last-completed on an existing stack.
    /// The entry sequence is replaced wholesale; id and creation timestamp
    /// are preserved from the stored record.
    pub fn update_stack(
        &self,
        stack_id: &str,
        command: UpdateStackCommand,
    ) -> DomainResult<HabitStack> {
        let mut stack = self.get_stack(stack_id)?;

        Self::validate_name_and_entries(&command.name, command.habits.len())?;

        stack.name = command.name;
        stack.habits = command.habits;
        stack.last_completed = command.last_completed;

        self.stack_repository.update_stack(&stack)?;

        info!("Updated stack: {}", stack_id);
        Ok(stack)
    }

    /// Delete a stack together with its progress record. Returns false when
    /// the stack does not exist.
    pub fn delete_stack(&self, stack_id: &str) -> DomainResult<bool> {
        if !self.stack_repository.delete_stack(stack_id)? {
            warn!("Stack not found for deletion: {}", stack_id);
            return Ok(false);
        }

        // The progress record is keyed by stack id, not by its own id.
        self.progress_service.delete_by_stack_id(stack_id)?;

        info!("Deleted stack: {}", stack_id);
        Ok(true)
    }

    /// Flip the completion flag of one habit within a stack and propagate
    /// the consequences to the stack's progress record.
    ///
    /// Only the first entry referencing `habit_id` is flipped, which keeps
    /// the result deterministic if a stack ever references the same habit
    /// twice. An id not present in the stack leaves it unchanged — a no-op,
    /// not an error, so client retries stay harmless. `last_completed`
    /// records the most recent moment the whole stack was complete and is
    /// never cleared afterwards.
    pub fn toggle_habit_completion(
        &self,
        stack_id: &str,
        habit_id: &str,
    ) -> DomainResult<HabitStack> {
        let mut stack = self.get_stack(stack_id)?;

        match stack.habits.iter_mut().find(|h| h.habit_id == habit_id) {
            Some(entry) => {
                entry.completed = !entry.completed;
                info!(
                    "Toggled habit {} in stack {} to completed={}",
                    habit_id, stack_id, entry.completed
                );
            }
            None => {
                warn!("Habit {} is not part of stack {}, nothing to toggle", habit_id, stack_id);
            }
        }

        if stack.is_completed() {
            stack.last_completed = Some(Utc::now());
        }

        self.stack_repository.update_stack(&stack)?;

        self.progress_service.recompute_for_stack(&stack)?;

        Ok(stack)
    }

    fn validate_name_and_entries(name: &str, entry_count: usize) -> DomainResult<()> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("Stack name is required"));
        }
        if entry_count == 0 {
            return Err(DomainError::validation(
                "Stack must contain at least one habit",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::stack::StackHabit;
    use tempfile::TempDir;

    fn setup_test() -> (StackService, ProgressService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = Arc::new(JsonConnection::new(temp_dir.path()).unwrap());
        let progress_service = ProgressService::new(connection.clone());
        let stack_service = StackService::new(connection, progress_service.clone());
        (stack_service, progress_service, temp_dir)
    }

    fn create_command(name: &str, habit_ids: &[&str]) -> CreateStackCommand {
        CreateStackCommand {
            id: None,
            name: name.to_string(),
            habits: habit_ids.iter().copied().map(StackHabit::new).collect(),
            created_at: None,
            last_completed: None,
        }
    }

    #[test]
    fn test_create_stack_creates_default_progress() {
        let (stacks, progress, _temp_dir) = setup_test();

        let stack = stacks
            .create_stack(create_command("Morning Power Stack", &["h1", "h2"]))
            .unwrap();
        assert!(!stack.id.is_empty());
        assert!(stack.last_completed.is_none());

        let record = progress.get_by_stack_id(&stack.id).unwrap().unwrap();
        assert_eq!(record.current_streak, 0);
        assert_eq!(record.longest_streak, 0);
        assert_eq!(record.completion_rate, 0.0);
        assert_eq!(record.last_week_progress, [false; 7]);
    }

    #[test]
    fn test_create_stack_validation() {
        let (stacks, _, _temp_dir) = setup_test();

        let result = stacks.create_stack(create_command("  ", &["h1"]));
        assert!(matches!(result, Err(DomainError::Validation(_))));

        let result = stacks.create_stack(create_command("Empty Stack", &[]));
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_get_missing_stack_is_not_found() {
        let (stacks, _, _temp_dir) = setup_test();
        let result = stacks.get_stack("missing");
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[test]
    fn test_list_stacks_search_is_case_insensitive_substring() {
        let (stacks, _, _temp_dir) = setup_test();

        stacks
            .create_stack(create_command("Morning Power Stack", &["h1"]))
            .unwrap();
        stacks
            .create_stack(create_command("Evening Wind Down", &["h2"]))
            .unwrap();

        assert_eq!(stacks.list_stacks(None).unwrap().len(), 2);

        let found = stacks.list_stacks(Some("MORNING")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Morning Power Stack");

        let found = stacks.list_stacks(Some("wind")).unwrap();
        assert_eq!(found.len(), 1);

        assert!(stacks.list_stacks(Some("yoga")).unwrap().is_empty());
    }

    #[test]
    fn test_update_stack_replaces_fields_and_preserves_identity() {
        let (stacks, _, _temp_dir) = setup_test();

        let created = stacks
            .create_stack(create_command("Original", &["h1", "h2"]))
            .unwrap();

        let updated = stacks
            .update_stack(
                &created.id,
                UpdateStackCommand {
                    name: "Renamed".to_string(),
                    habits: vec![StackHabit::new("h3")],
                    last_completed: None,
                },
            )
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.habits.len(), 1);
        assert_eq!(updated.habits[0].habit_id, "h3");
    }

    #[test]
    fn test_update_missing_stack_is_not_found() {
        let (stacks, _, _temp_dir) = setup_test();

        let result = stacks.update_stack(
            "missing",
            UpdateStackCommand {
                name: "Name".to_string(),
                habits: vec![StackHabit::new("h1")],
                last_completed: None,
            },
        );
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[test]
    fn test_delete_stack_removes_progress_record() {
        let (stacks, progress, _temp_dir) = setup_test();

        let stack = stacks.create_stack(create_command("Doomed", &["h1"])).unwrap();
        assert!(progress.get_by_stack_id(&stack.id).unwrap().is_some());

        assert!(stacks.delete_stack(&stack.id).unwrap());
        assert!(matches!(
            stacks.get_stack(&stack.id),
            Err(DomainError::NotFound { .. })
        ));
        assert!(progress.get_by_stack_id(&stack.id).unwrap().is_none());

        // Deleting again is a silent failure, not an error.
        assert!(!stacks.delete_stack(&stack.id).unwrap());
    }

    #[test]
    fn test_toggle_missing_stack_is_not_found_without_side_effects() {
        let (stacks, progress, _temp_dir) = setup_test();

        let result = stacks.toggle_habit_completion("missing", "h1");
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
        assert!(progress.get_by_stack_id("missing").unwrap().is_none());
    }

    #[test]
    fn test_toggle_completion_scenario() {
        let (stacks, progress, _temp_dir) = setup_test();

        let stack = stacks
            .create_stack(create_command("Routine", &["h1", "h2"]))
            .unwrap();
        let before_completion = Utc::now();

        // First toggle: half done, streak untouched.
        let after_first = stacks.toggle_habit_completion(&stack.id, "h1").unwrap();
        assert!(after_first.habits[0].completed);
        assert!(!after_first.habits[1].completed);
        assert!(!after_first.is_completed());
        assert!(after_first.last_completed.is_none());

        let record = progress.get_by_stack_id(&stack.id).unwrap().unwrap();
        assert!((record.completion_rate - 0.5).abs() < f64::EPSILON);
        assert_eq!(record.current_streak, 0);

        // Second toggle: fully complete, streak extends, timestamp set.
        let after_second = stacks.toggle_habit_completion(&stack.id, "h2").unwrap();
        assert!(after_second.is_completed());
        assert!(after_second.last_completed.unwrap() >= before_completion);

        let record = progress.get_by_stack_id(&stack.id).unwrap().unwrap();
        assert!((record.completion_rate - 1.0).abs() < f64::EPSILON);
        assert_eq!(record.current_streak, 1);
        assert_eq!(record.longest_streak, 1);
    }

    #[test]
    fn test_toggle_twice_restores_the_entry() {
        let (stacks, _, _temp_dir) = setup_test();

        let stack = stacks
            .create_stack(create_command("Routine", &["h1", "h2"]))
            .unwrap();

        stacks.toggle_habit_completion(&stack.id, "h1").unwrap();
        let restored = stacks.toggle_habit_completion(&stack.id, "h1").unwrap();

        assert!(!restored.habits[0].completed);
        assert!(!restored.habits[1].completed);
    }

    #[test]
    fn test_toggle_unknown_habit_is_a_noop() {
        let (stacks, progress, _temp_dir) = setup_test();

        let stack = stacks
            .create_stack(create_command("Routine", &["h1", "h2"]))
            .unwrap();

        let returned = stacks.toggle_habit_completion(&stack.id, "h99").unwrap();
        assert_eq!(returned, stack);

        // The no-op still snapshots the (unchanged) completion rate.
        let record = progress.get_by_stack_id(&stack.id).unwrap().unwrap();
        assert_eq!(record.completion_rate, 0.0);
        assert_eq!(record.current_streak, 0);
    }

    #[test]
    fn test_toggle_flips_only_the_first_matching_entry() {
        let (stacks, _, _temp_dir) = setup_test();

        let stack = stacks
            .create_stack(create_command("Doubled", &["h1", "h1"]))
            .unwrap();

        let toggled = stacks.toggle_habit_completion(&stack.id, "h1").unwrap();
        assert!(toggled.habits[0].completed);
        assert!(!toggled.habits[1].completed);
    }

    #[test]
    fn test_last_completed_survives_uncompletion() {
        let (stacks, progress, _temp_dir) = setup_test();

        let stack = stacks.create_stack(create_command("Routine", &["h1"])).unwrap();

        let completed = stacks.toggle_habit_completion(&stack.id, "h1").unwrap();
        let completed_at = completed.last_completed.unwrap();

        let uncompleted = stacks.toggle_habit_completion(&stack.id, "h1").unwrap();
        assert!(!uncompleted.is_completed());
        assert_eq!(uncompleted.last_completed, Some(completed_at));

        // The streak is not punished for breaking completion.
        let record = progress.get_by_stack_id(&stack.id).unwrap().unwrap();
        assert_eq!(record.current_streak, 1);
    }

    #[test]
    fn test_longest_streak_dominates_current_across_toggles() {
        let (stacks, progress, _temp_dir) = setup_test();

        let stack = stacks.create_stack(create_command("Routine", &["h1"])).unwrap();

        for _ in 0..3 {
            stacks.toggle_habit_completion(&stack.id, "h1").unwrap(); // complete
            stacks.toggle_habit_completion(&stack.id, "h1").unwrap(); // uncomplete

            let record = progress.get_by_stack_id(&stack.id).unwrap().unwrap();
            assert!(record.longest_streak >= record.current_streak);
        }

        let record = progress.get_by_stack_id(&stack.id).unwrap().unwrap();
        assert_eq!(record.current_streak, 3);
        assert_eq!(record.longest_streak, 3);
    }
}
