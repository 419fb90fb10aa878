use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use super::connection::JsonConnection;
use crate::domain::models::stack::{HabitStack, StackHabit};
use crate::storage::traits::HabitStackStorage;

const COLLECTION: &str = "habit_stacks";

/// Entry shape stored on disk. Field names match the wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StackHabitDocument {
    #[serde(rename = "habitId")]
    habit_id: String,
    completed: bool,
}

/// Document shape stored on disk, with RFC 3339 string dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StackDocument {
    id: String,
    name: String,
    habits: Vec<StackHabitDocument>,
    created_at: String,
    last_completed: Option<String>,
}

impl StackDocument {
    fn from_domain(stack: &HabitStack) -> Self {
        Self {
            id: stack.id.clone(),
            name: stack.name.clone(),
            habits: stack
                .habits
                .iter()
                .map(|h| StackHabitDocument {
                    habit_id: h.habit_id.clone(),
                    completed: h.completed,
                })
                .collect(),
            created_at: stack.created_at.to_rfc3339(),
            last_completed: stack.last_completed.map(|t| t.to_rfc3339()),
        }
    }

    fn into_domain(self) -> Result<HabitStack> {
        Ok(HabitStack {
            id: self.id,
            name: self.name,
            habits: self
                .habits
                .into_iter()
                .map(|h| StackHabit {
                    habit_id: h.habit_id,
                    completed: h.completed,
                })
                .collect(),
            created_at: chrono::DateTime::parse_from_rfc3339(&self.created_at)
                .map_err(|e| anyhow::anyhow!("failed to parse created_at: {}", e))?
                .with_timezone(&chrono::Utc),
            last_completed: self
                .last_completed
                .map(|t| {
                    chrono::DateTime::parse_from_rfc3339(&t)
                        .map(|dt| dt.with_timezone(&chrono::Utc))
                        .map_err(|e| anyhow::anyhow!("failed to parse last_completed: {}", e))
                })
                .transpose()?,
        })
    }
}

/// JSON-file repository for habit stacks.
#[derive(Clone)]
pub struct StackRepository {
    connection: Arc<JsonConnection>,
}

impl StackRepository {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self { connection }
    }

    fn load_all(&self) -> Result<Vec<StackDocument>> {
        self.connection.load_collection(COLLECTION)
    }

    fn save_all(&self, documents: &[StackDocument]) -> Result<()> {
        self.connection.save_collection(COLLECTION, documents)
    }
}

impl HabitStackStorage for StackRepository {
    fn store_stack(&self, stack: &HabitStack) -> Result<()> {
        let mut documents = self.load_all()?;
        documents.push(StackDocument::from_domain(stack));
        self.save_all(&documents)
    }

    fn get_stack(&self, stack_id: &str) -> Result<Option<HabitStack>> {
        let documents = self.load_all()?;
        documents
            .into_iter()
            .find(|d| d.id == stack_id)
            .map(StackDocument::into_domain)
            .transpose()
    }

    fn list_stacks(&self) -> Result<Vec<HabitStack>> {
        self.load_all()?
            .into_iter()
            .map(StackDocument::into_domain)
            .collect()
    }

    fn update_stack(&self, stack: &HabitStack) -> Result<()> {
        let mut documents = self.load_all()?;
        match documents.iter_mut().find(|d| d.id == stack.id) {
            Some(document) => {
                *document = StackDocument::from_domain(stack);
                self.save_all(&documents)
            }
            None => {
                warn!("attempted to update a stack that is not stored: {}", stack.id);
                Err(anyhow::anyhow!("stack not found for update: {}", stack.id))
            }
        }
    }

    fn delete_stack(&self, stack_id: &str) -> Result<bool> {
        let mut documents = self.load_all()?;
        let before = documents.len();
        documents.retain(|d| d.id != stack_id);
        if documents.len() == before {
            return Ok(false);
        }
        self.save_all(&documents)?;
        Ok(true)
    }
}
