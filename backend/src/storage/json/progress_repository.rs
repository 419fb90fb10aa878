use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use super::connection::JsonConnection;
use crate::domain::models::progress::ProgressData;
use crate::storage::traits::ProgressStorage;

const COLLECTION: &str = "progress_data";

/// Document shape stored on disk, with RFC 3339 string dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProgressDocument {
    id: String,
    stack_id: String,
    current_streak: u32,
    longest_streak: u32,
    completion_rate: f64,
    last_week_progress: Vec<bool>,
    updated_at: String,
}

impl ProgressDocument {
    fn from_domain(progress: &ProgressData) -> Self {
        Self {
            id: progress.id.clone(),
            stack_id: progress.stack_id.clone(),
            current_streak: progress.current_streak,
            longest_streak: progress.longest_streak,
            completion_rate: progress.completion_rate,
            last_week_progress: progress.last_week_progress.to_vec(),
            updated_at: progress.updated_at.to_rfc3339(),
        }
    }

    fn into_domain(self) -> Result<ProgressData> {
        let last_week_progress: [bool; 7] =
            self.last_week_progress.try_into().map_err(|v: Vec<bool>| {
                anyhow::anyhow!("expected 7 day slots in last_week_progress, found {}", v.len())
            })?;
        Ok(ProgressData {
            id: self.id,
            stack_id: self.stack_id,
            current_streak: self.current_streak,
            longest_streak: self.longest_streak,
            completion_rate: self.completion_rate,
            last_week_progress,
            updated_at: chrono::DateTime::parse_from_rfc3339(&self.updated_at)
                .map_err(|e| anyhow::anyhow!("failed to parse updated_at: {}", e))?
                .with_timezone(&chrono::Utc),
        })
    }
}

/// JSON-file repository for per-stack progress records.
#[derive(Clone)]
pub struct ProgressRepository {
    connection: Arc<JsonConnection>,
}

impl ProgressRepository {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self { connection }
    }

    fn load_all(&self) -> Result<Vec<ProgressDocument>> {
        self.connection.load_collection(COLLECTION)
    }

    fn save_all(&self, documents: &[ProgressDocument]) -> Result<()> {
        self.connection.save_collection(COLLECTION, documents)
    }
}

impl ProgressStorage for ProgressRepository {
    fn store_progress(&self, progress: &ProgressData) -> Result<()> {
        let mut documents = self.load_all()?;
        documents.push(ProgressDocument::from_domain(progress));
        self.save_all(&documents)
    }

    fn get_progress(&self, progress_id: &str) -> Result<Option<ProgressData>> {
        let documents = self.load_all()?;
        documents
            .into_iter()
            .find(|d| d.id == progress_id)
            .map(ProgressDocument::into_domain)
            .transpose()
    }

    fn find_by_stack_id(&self, stack_id: &str) -> Result<Option<ProgressData>> {
        let documents = self.load_all()?;
        documents
            .into_iter()
            .find(|d| d.stack_id == stack_id)
            .map(ProgressDocument::into_domain)
            .transpose()
    }

    fn list_progress(&self) -> Result<Vec<ProgressData>> {
        self.load_all()?
            .into_iter()
            .map(ProgressDocument::into_domain)
            .collect()
    }

    fn update_progress(&self, progress: &ProgressData) -> Result<()> {
        let mut documents = self.load_all()?;
        match documents.iter_mut().find(|d| d.id == progress.id) {
            Some(document) => {
                *document = ProgressDocument::from_domain(progress);
                self.save_all(&documents)
            }
            None => {
                warn!(
                    "attempted to update a progress record that is not stored: {}",
                    progress.id
                );
                Err(anyhow::anyhow!(
                    "progress record not found for update: {}",
                    progress.id
                ))
            }
        }
    }

    fn delete_progress(&self, progress_id: &str) -> Result<bool> {
        let mut documents = self.load_all()?;
        let before = documents.len();
        documents.retain(|d| d.id != progress_id);
        if documents.len() == before {
            return Ok(false);
        }
        self.save_all(&documents)?;
        Ok(true)
    }

    fn delete_by_stack_id(&self, stack_id: &str) -> Result<bool> {
        let mut documents = self.load_all()?;
        let before = documents.len();
        documents.retain(|d| d.stack_id != stack_id);
        if documents.len() == before {
            return Ok(false);
        }
        self.save_all(&documents)?;
        Ok(true)
    }
}
