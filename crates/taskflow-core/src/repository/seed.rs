use crate::error::CoreError;
use crate::models::{Category, Task};
use crate::repository::Tables;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Initial store contents, as read from a JSON seed file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SeedData {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl SeedData {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let seed: SeedData = serde_json::from_str(&contents)?;
        debug!(
            path = %path.display(),
            tasks = seed.tasks.len(),
            categories = seed.categories.len(),
            "seed data loaded"
        );
        Ok(seed)
    }

    /// Move the records into store tables, rejecting duplicate ids.
    pub(crate) fn into_tables(self) -> Result<Tables, CoreError> {
        let mut tables = Tables::default();

        for category in self.categories {
            if tables.categories.contains(&category.id) {
                return Err(CoreError::Seed(format!("duplicate category id '{}'", category.id)));
            }
            tables.categories.insert(category.id.clone(), category);
        }

        for task in self.tasks {
            if tables.tasks.contains(&task.id) {
                return Err(CoreError::Seed(format!("duplicate task id {}", task.id)));
            }
            tables.tasks.insert(task.id, task);
        }

        Ok(tables)
    }
}
