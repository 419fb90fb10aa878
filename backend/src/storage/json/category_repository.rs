use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use super::connection::JsonConnection;
use crate::domain::models::category::HabitCategory;
use crate::storage::traits::CategoryStorage;

const COLLECTION: &str = "habit_categories";

/// Document shape stored on disk, with RFC 3339 string dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CategoryDocument {
    id: String,
    name: String,
    color: String,
    icon: String,
    created_at: String,
}

impl CategoryDocument {
    fn from_domain(category: &HabitCategory) -> Self {
        Self {
            id: category.id.clone(),
            name: category.name.clone(),
            color: category.color.clone(),
            icon: category.icon.clone(),
            created_at: category.created_at.to_rfc3339(),
        }
    }

    fn into_domain(self) -> Result<HabitCategory> {
        Ok(HabitCategory {
            id: self.id,
            name: self.name,
            color: self.color,
            icon: self.icon,
            created_at: chrono::DateTime::parse_from_rfc3339(&self.created_at)
                .map_err(|e| anyhow::anyhow!("failed to parse created_at: {}", e))?
                .with_timezone(&chrono::Utc),
        })
    }
}

/// JSON-file repository for habit categories.
#[derive(Clone)]
pub struct CategoryRepository {
    connection: Arc<JsonConnection>,
}

impl CategoryRepository {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self { connection }
    }

    fn load_all(&self) -> Result<Vec<CategoryDocument>> {
        self.connection.load_collection(COLLECTION)
    }

    fn save_all(&self, documents: &[CategoryDocument]) -> Result<()> {
        self.connection.save_collection(COLLECTION, documents)
    }
}

impl CategoryStorage for CategoryRepository {
    fn store_category(&self, category: &HabitCategory) -> Result<()> {
        let mut documents = self.load_all()?;
        documents.push(CategoryDocument::from_domain(category));
        self.save_all(&documents)
    }

    fn get_category(&self, category_id: &str) -> Result<Option<HabitCategory>> {
        let documents = self.load_all()?;
        documents
            .into_iter()
            .find(|d| d.id == category_id)
            .map(CategoryDocument::into_domain)
            .transpose()
    }

    fn get_category_by_name(&self, name: &str) -> Result<Option<HabitCategory>> {
        let documents = self.load_all()?;
        documents
            .into_iter()
            .find(|d| d.name == name)
            .map(CategoryDocument::into_domain)
            .transpose()
    }

    fn list_categories(&self) -> Result<Vec<HabitCategory>> {
        self.load_all()?
            .into_iter()
            .map(CategoryDocument::into_domain)
            .collect()
    }

    fn update_category(&self, category: &HabitCategory) -> Result<()> {
        let mut documents = self.load_all()?;
        match documents.iter_mut().find(|d| d.id == category.id) {
            Some(document) => {
                *document = CategoryDocument::from_domain(category);
                self.save_all(&documents)
            }
            None => {
                warn!(
                    "attempted to update a category that is not stored: {}",
                    category.id
                );
                Err(anyhow::anyhow!(
                    "category not found for update: {}",
                    category.id
                ))
            }
        }
    }

    fn delete_category(&self, category_id: &str) -> Result<bool> {
        let mut documents = self.load_all()?;
        let before = documents.len();
        documents.retain(|d| d.id != category_id);
        if documents.len() == before {
            return Ok(false);
        }
        self.save_all(&documents)?;
        Ok(true)
    }
}
