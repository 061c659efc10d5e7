//! Author management service

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::AppResult,
    models::author::{Author, CreateAuthor, UpdateAuthor},
    repository::CatalogStore,
};

#[derive(Clone)]
pub struct AuthorsService {
    store: Arc<dyn CatalogStore>,
}

impl AuthorsService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, author: CreateAuthor) -> AppResult<Author> {
        author.validate()?;
        let created = self.store.create_author(&author).await?;
        tracing::info!("Created author {} ({})", created.id, created);
        Ok(created)
    }

    pub async fn update(&self, id: i32, author: UpdateAuthor) -> AppResult<Author> {
        author.validate()?;
        let updated = self.store.update_author(id, &author).await?;
        tracing::info!("Updated author {} ({})", updated.id, updated);
        Ok(updated)
    }

    /// Delete an author. Their books stay in the catalog without an author.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.store.delete_author(id).await?;
        tracing::info!("Deleted author {}", id);
        Ok(())
    }
}
