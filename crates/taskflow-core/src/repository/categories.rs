use crate::error::CoreError;
use crate::models::{Category, NewCategoryData, UpdateCategoryData, DEFAULT_CATEGORY_COLOR};
use crate::repository::InMemoryRepository;
use async_trait::async_trait;
use tracing::debug;

fn category_not_found(id: &str) -> CoreError {
    CoreError::NotFound(format!("Category '{}' not found", id))
}

#[async_trait]
impl super::CategoryRepository for InMemoryRepository {
    async fn add_category(&self, data: NewCategoryData) -> Result<Category, CoreError> {
        self.simulate_latency().await;
        if data.name.trim().is_empty() {
            return Err(CoreError::InvalidInput("Category name cannot be empty".to_string()));
        }

        let id = data.id.unwrap_or_else(|| Category::slug(&data.name));
        let mut tables = self.tables().write().await;
        if tables.categories.contains(&id) {
            return Err(CoreError::InvalidInput(format!("Category '{}' already exists", id)));
        }

        let category = Category {
            id: id.clone(),
            name: data.name,
            color: data.color.unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_string()),
        };
        tables.categories.insert(id, category.clone());
        debug!(category_id = %category.id, "category added");
        Ok(category)
    }

    async fn find_categories(&self) -> Result<Vec<Category>, CoreError> {
        self.simulate_latency().await;
        let tables = self.tables().read().await;
        Ok(tables.categories.values().cloned().collect())
    }

    async fn find_category_by_id(&self, id: &str) -> Result<Option<Category>, CoreError> {
        self.simulate_latency().await;
        let tables = self.tables().read().await;
        Ok(tables.categories.get(&id.to_string()).cloned())
    }

    async fn update_category(&self, id: &str, data: UpdateCategoryData) -> Result<Category, CoreError> {
        self.simulate_latency().await;
        let mut tables = self.tables().write().await;
        let category = tables
            .categories
            .get_mut(&id.to_string())
            .ok_or_else(|| category_not_found(id))?;

        if let Some(name) = data.name {
            category.name = name;
        }
        if let Some(color) = data.color {
            category.color = color;
        }
        Ok(category.clone())
    }

    async fn delete_category(&self, id: &str) -> Result<(), CoreError> {
        self.simulate_latency().await;
        let mut tables = self.tables().write().await;
        tables
            .categories
            .remove(&id.to_string())
            .ok_or_else(|| category_not_found(id))?;
        debug!(category_id = %id, "category deleted");
        Ok(())
    }
}
