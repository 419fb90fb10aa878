use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use super::connection::JsonConnection;
use crate::domain::models::habit::Habit;
use crate::storage::traits::HabitStorage;

const COLLECTION: &str = "habits";

/// Document shape stored on disk, with RFC 3339 string dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HabitDocument {
    id: String,
    name: String,
    category: String,
    time: u32,
    description: String,
    created_at: String,
}

impl HabitDocument {
    fn from_domain(habit: &Habit) -> Self {
        Self {
            id: habit.id.clone(),
            name: habit.name.clone(),
            category: habit.category.clone(),
            time: habit.time,
            description: habit.description.clone(),
            created_at: habit.created_at.to_rfc3339(),
        }
    }

    fn into_domain(self) -> Result<Habit> {
        Ok(Habit {
            id: self.id,
            name: self.name,
            category: self.category,
            time: self.time,
            description: self.description,
            created_at: chrono::DateTime::parse_from_rfc3339(&self.created_at)
                .map_err(|e| anyhow::anyhow!("failed to parse created_at: {}", e))?
                .with_timezone(&chrono::Utc),
        })
    }
}

/// JSON-file repository for the habit catalog.
#[derive(Clone)]
pub struct HabitRepository {
    connection: Arc<JsonConnection>,
}

impl HabitRepository {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self { connection }
    }

    fn load_all(&self) -> Result<Vec<HabitDocument>> {
        self.connection.load_collection(COLLECTION)
    }

    fn save_all(&self, documents: &[HabitDocument]) -> Result<()> {
        self.connection.save_collection(COLLECTION, documents)
    }
}

impl HabitStorage for HabitRepository {
    fn store_habit(&self, habit: &Habit) -> Result<()> {
        let mut documents = self.load_all()?;
        documents.push(HabitDocument::from_domain(habit));
        self.save_all(&documents)
    }

    fn get_habit(&self, habit_id: &str) -> Result<Option<Habit>> {
        let documents = self.load_all()?;
        documents
            .into_iter()
            .find(|d| d.id == habit_id)
            .map(HabitDocument::into_domain)
            .transpose()
    }

    fn list_habits(&self) -> Result<Vec<Habit>> {
        self.load_all()?
            .into_iter()
            .map(HabitDocument::into_domain)
            .collect()
    }

    fn update_habit(&self, habit: &Habit) -> Result<()> {
        let mut documents = self.load_all()?;
        match documents.iter_mut().find(|d| d.id == habit.id) {
            Some(document) => {
                *document = HabitDocument::from_domain(habit);
                self.save_all(&documents)
            }
            None => {
                warn!("attempted to update a habit that is not stored: {}", habit.id);
                Err(anyhow::anyhow!("habit not found for update: {}", habit.id))
            }
        }
    }

    fn delete_habit(&self, habit_id: &str) -> Result<bool> {
        let mut documents = self.load_all()?;
        let before = documents.len();
        documents.retain(|d| d.id != habit_id);
        if documents.len() == before {
            return Ok(false);
        }
        self.save_all(&documents)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::json::test_utils::TestEnvironment;
    use chrono::Utc;

    fn sample_habit(id: &str, name: &str) -> Habit {
        Habit {
            id: id.to_string(),
            name: name.to_string(),
            category: "morning".to_string(),
            time: 5,
            description: "A test habit".to_string(),
            created_at: Utc::now(),
        }
    }

    fn setup_test_repo() -> (HabitRepository, TestEnvironment) {
        let env = TestEnvironment::new().unwrap();
        let repo = HabitRepository::new(Arc::new(env.connection.clone()));
        (repo, env)
    }

    #[test]
    fn test_store_and_get_habit() {
        let (repo, _env) = setup_test_repo();

        repo.store_habit(&sample_habit("habit-1", "Make Coffee")).unwrap();

        let habit = repo.get_habit("habit-1").unwrap().unwrap();
        assert_eq!(habit.name, "Make Coffee");
        assert_eq!(habit.time, 5);

        assert!(repo.get_habit("missing").unwrap().is_none());
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let (repo, _env) = setup_test_repo();

        repo.store_habit(&sample_habit("habit-1", "First")).unwrap();
        repo.store_habit(&sample_habit("habit-2", "Second")).unwrap();
        repo.store_habit(&sample_habit("habit-3", "Third")).unwrap();

        let names: Vec<String> = repo
            .list_habits()
            .unwrap()
            .into_iter()
            .map(|h| h.name)
            .collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_update_habit() {
        let (repo, _env) = setup_test_repo();

        let mut habit = sample_habit("habit-1", "Old Name");
        repo.store_habit(&habit).unwrap();

        habit.name = "New Name".to_string();
        habit.time = 10;
        repo.update_habit(&habit).unwrap();

        let reloaded = repo.get_habit("habit-1").unwrap().unwrap();
        assert_eq!(reloaded.name, "New Name");
        assert_eq!(reloaded.time, 10);
    }

    #[test]
    fn test_update_missing_habit_is_an_error() {
        let (repo, _env) = setup_test_repo();
        assert!(repo.update_habit(&sample_habit("ghost", "Ghost")).is_err());
    }

    #[test]
    fn test_delete_habit() {
        let (repo, _env) = setup_test_repo();

        repo.store_habit(&sample_habit("habit-1", "Doomed")).unwrap();

        assert!(repo.delete_habit("habit-1").unwrap());
        assert!(repo.get_habit("habit-1").unwrap().is_none());
        assert!(!repo.delete_habit("habit-1").unwrap());
    }
}
