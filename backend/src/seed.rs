//! First-run seed data.
//!
//! Populates an empty store with the default catalog: six categories,
//! twenty-four habits, three stacks and their progress records. Each
//! collection is only seeded while empty, so restarting the server never
//! duplicates or overwrites user data.

use anyhow::Result;
use chrono::{TimeZone, Utc};
use tracing::info;

use crate::domain::commands::categories::CreateCategoryCommand;
use crate::domain::commands::habits::CreateHabitCommand;
use crate::domain::commands::stacks::CreateStackCommand;
use crate::domain::models::progress::ProgressData;
use crate::domain::models::stack::StackHabit;
use crate::domain::{CategoryService, HabitService, ProgressService, StackService};

pub fn seed_default_data(
    category_service: &CategoryService,
    habit_service: &HabitService,
    stack_service: &StackService,
    progress_service: &ProgressService,
) -> Result<()> {
    info!("Starting data initialization");

    seed_categories(category_service)?;
    seed_habits(habit_service)?;
    seed_stacks(stack_service, progress_service)?;

    info!("Data initialization completed");
    Ok(())
}

fn category(id: &str, name: &str, color: &str, icon: &str) -> CreateCategoryCommand {
    CreateCategoryCommand {
        id: Some(id.to_string()),
        name: name.to_string(),
        color: color.to_string(),
        icon: icon.to_string(),
    }
}

fn seed_categories(service: &CategoryService) -> Result<()> {
    if !service.list_categories()?.is_empty() {
        info!("Habit categories already exist, skipping initialization");
        return Ok(());
    }

    let defaults = vec![
        category("morning", "Morning Routine", "#FFB800", "🌅"),
        category("exercise", "Exercise", "#FF6B6B", "💪"),
        category("work", "Work", "#4ECDC4", "💼"),
        category("evening", "Evening Routine", "#A8E6CF", "🌙"),
        category("health", "Health", "#88D8B0", "🏥"),
        category("learning", "Learning", "#FFD93D", "📚"),
    ];
    let count = defaults.len();
    for command in defaults {
        service.create_category(command)?;
    }

    info!("Initialized {} habit categories", count);
    Ok(())
}

fn habit(id: &str, name: &str, category: &str, time: u32, description: &str) -> CreateHabitCommand {
    CreateHabitCommand {
        id: Some(id.to_string()),
        name: name.to_string(),
        category: category.to_string(),
        time,
        description: description.to_string(),
        created_at: None,
    }
}

fn seed_habits(service: &HabitService) -> Result<()> {
    if !service.list_habits(Default::default())?.is_empty() {
        info!("Habits already exist, skipping initialization");
        return Ok(());
    }

    let defaults = vec![
        // Morning Routine
        habit("1", "Brush Teeth", "morning", 3, "Clean teeth and gums"),
        habit("2", "Drink Water", "morning", 1, "16oz of water"),
        habit("3", "Make Bed", "morning", 2, "Tidy up bedroom"),
        habit("4", "Make Coffee", "morning", 5, "Brew morning coffee"),
        habit("5", "Check Weather", "morning", 1, "Plan outfit for day"),
        // Exercise
        habit("6", "10 Push-ups", "exercise", 2, "Quick strength training"),
        habit("7", "5-min Stretch", "exercise", 5, "Basic stretching routine"),
        habit("8", "Go for Walk", "exercise", 15, "15-minute walk outside"),
        habit("9", "Planks", "exercise", 3, "1-minute plank hold"),
        habit("10", "Jumping Jacks", "exercise", 2, "20 jumping jacks"),
        // Work
        habit("11", "Check Email", "work", 10, "Review and respond to emails"),
        habit("12", "Review To-Do", "work", 3, "Plan daily tasks"),
        habit("13", "Deep Work Block", "work", 90, "Focused work session"),
        habit("14", "Team Standup", "work", 15, "Daily team meeting"),
        // Evening Routine
        habit("15", "Prepare Clothes", "evening", 5, "Lay out tomorrow's outfit"),
        habit("16", "Journal", "evening", 10, "Write daily reflections"),
        habit("17", "Read Book", "evening", 20, "Read before bed"),
        habit("18", "Phone Away", "evening", 1, "Put phone in another room"),
        // Health
        habit("19", "Take Vitamins", "health", 1, "Daily supplement routine"),
        habit("20", "Meditate", "health", 10, "10-minute mindfulness"),
        habit("21", "Floss", "health", 2, "Daily flossing routine"),
        // Learning
        habit("22", "Duolingo", "learning", 15, "Language learning practice"),
        habit("23", "Watch Tutorial", "learning", 20, "Educational video"),
        habit("24", "Practice Code", "learning", 30, "Coding practice"),
    ];
    let count = defaults.len();
    for command in defaults {
        service.create_habit(command)?;
    }

    info!("Initialized {} habits", count);
    Ok(())
}

fn entry(habit_id: &str, completed: bool) -> StackHabit {
    StackHabit {
        habit_id: habit_id.to_string(),
        completed,
    }
}

fn seed_stacks(stack_service: &StackService, progress_service: &ProgressService) -> Result<()> {
    if !stack_service.list_stacks(None)?.is_empty() {
        info!("Habit stacks already exist, skipping initialization");
        return Ok(());
    }

    let stacks = vec![
        CreateStackCommand {
            id: Some("stack1".to_string()),
            name: "Morning Power Stack".to_string(),
            habits: vec![entry("1", true), entry("6", true), entry("4", false), entry("20", false)],
            created_at: Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()),
            last_completed: Some(Utc.with_ymd_and_hms(2024, 1, 20, 8, 30, 0).unwrap()),
        },
        CreateStackCommand {
            id: Some("stack2".to_string()),
            name: "Work Prep Stack".to_string(),
            habits: vec![entry("2", true), entry("12", true), entry("11", false)],
            created_at: Some(Utc.with_ymd_and_hms(2024, 1, 16, 9, 0, 0).unwrap()),
            last_completed: Some(Utc.with_ymd_and_hms(2024, 1, 19, 9, 15, 0).unwrap()),
        },
        CreateStackCommand {
            id: Some("stack3".to_string()),
            name: "Evening Wind Down".to_string(),
            habits: vec![entry("15", false), entry("16", false), entry("17", false), entry("18", false)],
            created_at: Some(Utc.with_ymd_and_hms(2024, 1, 17, 20, 0, 0).unwrap()),
            last_completed: None,
        },
    ];
    let count = stacks.len();
    for command in stacks {
        // Stack creation lays down a zero-valued progress record; the seeded
        // statistics below are upserted over it.
        stack_service.create_stack(command)?;
    }
    info!("Initialized {} habit stacks", count);

    let progress_records = vec![
        seeded_progress("stack1", 5, 12, 0.85, [true, true, false, true, true, true, false]),
        seeded_progress("stack2", 3, 8, 0.92, [true, true, true, false, true, true, true]),
        seeded_progress("stack3", 0, 4, 0.45, [false, false, true, false, false, true, false]),
    ];
    let count = progress_records.len();
    for record in progress_records {
        progress_service.upsert(record)?;
    }
    info!("Initialized {} progress records", count);

    Ok(())
}

fn seeded_progress(
    stack_id: &str,
    current_streak: u32,
    longest_streak: u32,
    completion_rate: f64,
    last_week_progress: [bool; 7],
) -> ProgressData {
    let mut progress = ProgressData::new_for_stack(stack_id);
    progress.current_streak = current_streak;
    progress.longest_streak = longest_streak;
    progress.completion_rate = completion_rate;
    progress.last_week_progress = last_week_progress;
    progress
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::json::JsonConnection;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn setup_services() -> (CategoryService, HabitService, StackService, ProgressService, TempDir)
    {
        let temp_dir = TempDir::new().unwrap();
        let connection = Arc::new(JsonConnection::new(temp_dir.path()).unwrap());
        let category_service = CategoryService::new(connection.clone());
        let habit_service = HabitService::new(connection.clone());
        let progress_service = ProgressService::new(connection.clone());
        let stack_service = StackService::new(connection, progress_service.clone());
        (category_service, habit_service, stack_service, progress_service, temp_dir)
    }

    #[test]
    fn test_seed_populates_empty_store() {
        let (categories, habits, stacks, progress, _temp_dir) = setup_services();

        seed_default_data(&categories, &habits, &stacks, &progress).unwrap();

        assert_eq!(categories.list_categories().unwrap().len(), 6);
        assert_eq!(habits.list_habits(Default::default()).unwrap().len(), 24);
        assert_eq!(stacks.list_stacks(None).unwrap().len(), 3);
        assert_eq!(progress.list_all().unwrap().len(), 3);

        // Seeded statistics replace the zero-valued defaults.
        let record = progress.get_by_stack_id("stack1").unwrap().unwrap();
        assert_eq!(record.current_streak, 5);
        assert_eq!(record.longest_streak, 12);
        assert!((record.completion_rate - 0.85).abs() < f64::EPSILON);
    }

    #[test]
    fn test_seed_is_idempotent() {
        let (categories, habits, stacks, progress, _temp_dir) = setup_services();

        seed_default_data(&categories, &habits, &stacks, &progress).unwrap();
        seed_default_data(&categories, &habits, &stacks, &progress).unwrap();

        assert_eq!(categories.list_categories().unwrap().len(), 6);
        assert_eq!(habits.list_habits(Default::default()).unwrap().len(), 24);
        assert_eq!(stacks.list_stacks(None).unwrap().len(), 3);
        assert_eq!(progress.list_all().unwrap().len(), 3);
    }

    #[test]
    fn test_seeded_stack_keeps_original_completion_flags() {
        let (categories, habits, stacks, progress, _temp_dir) = setup_services();

        seed_default_data(&categories, &habits, &stacks, &progress).unwrap();

        let stack = stacks.get_stack("stack1").unwrap();
        let flags: Vec<bool> = stack.habits.iter().map(|h| h.completed).collect();
        assert_eq!(flags, vec![true, true, false, false]);
        assert!(stack.last_completed.is_some());
    }
}
