//! Progress-record lifecycle for habit stacks.
//!
//! Owns the lazy get-or-default creation, the stack-id-keyed upsert, and the
//! recompute that runs after every completion toggle. One record exists per
//! stack; its lifecycle is bound to the stack's by the stack service.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::commands::progress::UpdateProgressCommand;
use crate::domain::models::progress::ProgressData;
use crate::domain::models::stack::HabitStack;
use crate::error::{DomainError, DomainResult};
use crate::storage::json::{JsonConnection, ProgressRepository};
use crate::storage::traits::ProgressStorage;

/// Service for managing per-stack progress statistics.
#[derive(Clone)]
pub struct ProgressService {
    progress_repository: ProgressRepository,
}

impl ProgressService {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self {
            progress_repository: ProgressRepository::new(connection),
        }
    }

    /// List progress records for all stacks.
    pub fn list_all(&self) -> DomainResult<Vec<ProgressData>> {
        Ok(self.progress_repository.list_progress()?)
    }

    /// Plain lookup by owning stack. A missing record is a legitimate state,
    /// not an error.
    pub fn get_by_stack_id(&self, stack_id: &str) -> DomainResult<Option<ProgressData>> {
        Ok(self.progress_repository.find_by_stack_id(stack_id)?)
    }

    /// Return the stack's progress record, creating and persisting a
    /// zero-valued one if none exists yet.
    pub fn get_or_default(&self, stack_id: &str) -> DomainResult<ProgressData> {
        if let Some(existing) = self.progress_repository.find_by_stack_id(stack_id)? {
            return Ok(existing);
        }

        let progress = ProgressData::new_for_stack(stack_id);
        self.progress_repository.store_progress(&progress)?;
        debug!("created default progress record for stack {}", stack_id);
        Ok(progress)
    }

    /// Insert or overwrite, keyed on the logical `stack_id` rather than the
    /// storage id. An existing record keeps its identity; only the mutable
    /// statistics and `updated_at` change. Callers never need to know whether
    /// a record pre-existed.
    pub fn upsert(&self, progress: ProgressData) -> DomainResult<ProgressData> {
        match self.progress_repository.find_by_stack_id(&progress.stack_id)? {
            Some(mut existing) => {
                existing.current_streak = progress.current_streak;
                existing.longest_streak = progress.longest_streak;
                existing.completion_rate = progress.completion_rate;
                existing.last_week_progress = progress.last_week_progress;
                existing.updated_at = Utc::now();
                self.progress_repository.update_progress(&existing)?;
                Ok(existing)
            }
            None => {
                let mut record = progress;
                record.updated_at = Utc::now();
                self.progress_repository.store_progress(&record)?;
                Ok(record)
            }
        }
    }

    /// Overwrite an existing record's statistics. Unlike `upsert` this never
    /// creates one.
    pub fn update(
        &self,
        stack_id: &str,
        command: UpdateProgressCommand,
    ) -> DomainResult<ProgressData> {
        info!("Updating progress for stack: {}", stack_id);

        let mut progress = self
            .progress_repository
            .find_by_stack_id(stack_id)?
            .ok_or_else(|| DomainError::not_found("Progress data", stack_id))?;

        progress.current_streak = command.current_streak;
        progress.longest_streak = command.longest_streak;
        progress.completion_rate = command.completion_rate;
        progress.last_week_progress = command.last_week_progress;
        progress.updated_at = Utc::now();

        self.progress_repository.update_progress(&progress)?;
        Ok(progress)
    }

    /// Delete a record by its storage id. Returns false when absent.
    pub fn delete(&self, progress_id: &str) -> DomainResult<bool> {
        Ok(self.progress_repository.delete_progress(progress_id)?)
    }

    /// Remove the record belonging to a stack. A stack without one is a
    /// no-op.
    pub fn delete_by_stack_id(&self, stack_id: &str) -> DomainResult<()> {
        if !self.progress_repository.delete_by_stack_id(stack_id)? {
            debug!("no progress record to delete for stack {}", stack_id);
        }
        Ok(())
    }

    /// Re-derive a stack's statistics after a toggle and persist them.
    ///
    /// The completion rate is a point-in-time snapshot of the stack as just
    /// saved. A toggle that completes the stack extends the streak; one that
    /// breaks completion leaves the streak untouched. The week buffer is
    /// never written here.
    pub fn recompute_for_stack(&self, stack: &HabitStack) -> DomainResult<ProgressData> {
        let mut progress = self.get_or_default(&stack.id)?;

        progress.completion_rate = stack.completion_percentage() / 100.0;

        if stack.is_completed() {
            progress.current_streak += 1;
            progress.longest_streak = progress.longest_streak.max(progress.current_streak);
        }

        self.upsert(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::stack::StackHabit;
    use tempfile::TempDir;

    fn setup_test() -> (ProgressService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = Arc::new(JsonConnection::new(temp_dir.path()).unwrap());
        (ProgressService::new(connection), temp_dir)
    }

    fn stack_with_flags(id: &str, flags: &[bool]) -> HabitStack {
        HabitStack {
            id: id.to_string(),
            name: "Test Stack".to_string(),
            habits: flags
                .iter()
                .enumerate()
                .map(|(i, completed)| StackHabit {
                    habit_id: format!("habit-{}", i + 1),
                    completed: *completed,
                })
                .collect(),
            created_at: Utc::now(),
            last_completed: None,
        }
    }

    #[test]
    fn test_get_or_default_creates_and_persists() {
        let (service, _temp_dir) = setup_test();

        assert!(service.get_by_stack_id("stack-1").unwrap().is_none());

        let created = service.get_or_default("stack-1").unwrap();
        assert_eq!(created.current_streak, 0);
        assert_eq!(created.longest_streak, 0);
        assert_eq!(created.completion_rate, 0.0);
        assert_eq!(created.last_week_progress, [false; 7]);

        // The same record comes back on the next call.
        let again = service.get_or_default("stack-1").unwrap();
        assert_eq!(again.id, created.id);
    }

    #[test]
    fn test_upsert_overwrites_existing_keeping_identity() {
        let (service, _temp_dir) = setup_test();

        let original = service.get_or_default("stack-1").unwrap();

        let mut incoming = ProgressData::new_for_stack("stack-1");
        incoming.current_streak = 3;
        incoming.longest_streak = 8;
        incoming.completion_rate = 0.92;
        incoming.last_week_progress = [true, true, true, false, true, true, true];

        let saved = service.upsert(incoming).unwrap();
        assert_eq!(saved.id, original.id);
        assert_eq!(saved.current_streak, 3);
        assert_eq!(saved.longest_streak, 8);

        // Only one record exists for the stack.
        assert_eq!(service.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_upsert_inserts_when_absent() {
        let (service, _temp_dir) = setup_test();

        let mut incoming = ProgressData::new_for_stack("stack-1");
        incoming.current_streak = 5;

        let saved = service.upsert(incoming.clone()).unwrap();
        assert_eq!(saved.id, incoming.id);
        assert_eq!(
            service.get_by_stack_id("stack-1").unwrap().unwrap().current_streak,
            5
        );
    }

    #[test]
    fn test_update_requires_existing_record() {
        let (service, _temp_dir) = setup_test();

        let command = UpdateProgressCommand {
            current_streak: 1,
            longest_streak: 2,
            completion_rate: 0.5,
            last_week_progress: [false; 7],
        };
        let result = service.update("stack-1", command.clone());
        assert!(matches!(result, Err(DomainError::NotFound { .. })));

        service.get_or_default("stack-1").unwrap();
        let updated = service.update("stack-1", command).unwrap();
        assert_eq!(updated.current_streak, 1);
        assert_eq!(updated.longest_streak, 2);
    }

    #[test]
    fn test_delete_by_stack_id_is_noop_when_absent() {
        let (service, _temp_dir) = setup_test();

        service.delete_by_stack_id("stack-1").unwrap();

        service.get_or_default("stack-1").unwrap();
        service.delete_by_stack_id("stack-1").unwrap();
        assert!(service.get_by_stack_id("stack-1").unwrap().is_none());
    }

    #[test]
    fn test_recompute_snapshots_completion_rate() {
        let (service, _temp_dir) = setup_test();

        let progress = service
            .recompute_for_stack(&stack_with_flags("stack-1", &[true, false, false, false]))
            .unwrap();
        assert!((progress.completion_rate - 0.25).abs() < f64::EPSILON);
        assert_eq!(progress.current_streak, 0);
        assert_eq!(progress.longest_streak, 0);
    }

    #[test]
    fn test_recompute_extends_streak_only_on_full_completion() {
        let (service, _temp_dir) = setup_test();

        let complete = stack_with_flags("stack-1", &[true, true]);
        let partial = stack_with_flags("stack-1", &[true, false]);

        let progress = service.recompute_for_stack(&complete).unwrap();
        assert_eq!(progress.current_streak, 1);
        assert_eq!(progress.longest_streak, 1);

        // Breaking completion never resets the streak.
        let progress = service.recompute_for_stack(&partial).unwrap();
        assert_eq!(progress.current_streak, 1);
        assert_eq!(progress.longest_streak, 1);
        assert!((progress.completion_rate - 0.5).abs() < f64::EPSILON);

        let progress = service.recompute_for_stack(&complete).unwrap();
        assert_eq!(progress.current_streak, 2);
        assert_eq!(progress.longest_streak, 2);
    }

    #[test]
    fn test_recompute_never_lowers_longest_streak() {
        let (service, _temp_dir) = setup_test();

        let mut seeded = ProgressData::new_for_stack("stack-1");
        seeded.current_streak = 2;
        seeded.longest_streak = 9;
        service.upsert(seeded).unwrap();

        let progress = service
            .recompute_for_stack(&stack_with_flags("stack-1", &[true, true]))
            .unwrap();
        assert_eq!(progress.current_streak, 3);
        assert_eq!(progress.longest_streak, 9);
        assert!(progress.longest_streak >= progress.current_streak);
    }

    #[test]
    fn test_recompute_leaves_week_buffer_alone() {
        let (service, _temp_dir) = setup_test();

        let mut seeded = ProgressData::new_for_stack("stack-1");
        seeded.last_week_progress = [true, false, true, false, true, false, true];
        service.upsert(seeded).unwrap();

        let progress = service
            .recompute_for_stack(&stack_with_flags("stack-1", &[true, true]))
            .unwrap();
        assert_eq!(
            progress.last_week_progress,
            [true, false, true, false, true, false, true]
        );
    }
}
