//! Genre resource service.
//!
//! CRUD over [`Genre`] records. Callers reach it only through the
//! authenticated routes; it does no authorization of its own.

use crate::db::GenreStore;
use crate::types::{AppError, Genre, Result};
use std::sync::Arc;
use tracing::info;

/// Longest accepted genre name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// CRUD operations over genres backed by a [`GenreStore`].
pub struct GenreService {
    store: Arc<dyn GenreStore>,
}

impl GenreService {
    pub fn new(store: Arc<dyn GenreStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, name: &str) -> Result<Genre> {
        let name = validate_name(name)?;
        let genre = self.store.create(name).await?;

        info!(genre_id = genre.id, "created genre");
        Ok(genre)
    }

    /// All genres in insertion order.
    pub async fn list(&self) -> Result<Vec<Genre>> {
        self.store.list().await
    }

    pub async fn get(&self, id: i64) -> Result<Genre> {
        self.store.get(id).await?.ok_or_else(not_found)
    }

    pub async fn update(&self, id: i64, name: &str) -> Result<Genre> {
        let name = validate_name(name)?;
        let genre = self.store.update(id, name).await?.ok_or_else(not_found)?;

        info!(genre_id = genre.id, "updated genre");
        Ok(genre)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.store.delete(id).await? {
            return Err(not_found());
        }

        info!(genre_id = id, "deleted genre");
        Ok(())
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Genre".to_string())
}

fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();

    if name.is_empty() {
        return Err(AppError::InvalidInput("Genre name is required".to_string()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::InvalidInput(format!(
            "Genre name must be at most {} characters",
            MAX_NAME_LEN
        )));
    }

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::traits::MockGenreStore;

    fn genre(id: i64, name: &str) -> Genre {
        Genre {
            id,
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_trims_name() {
        let mut store = MockGenreStore::new();
        store
            .expect_create()
            .withf(|name| name == "Fantasy")
            .times(1)
            .returning(|name| Ok(genre(1, name)));

        let created = GenreService::new(Arc::new(store))
            .create("  Fantasy ")
            .await
            .expect("create should succeed");

        assert_eq!(created, genre(1, "Fantasy"));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_and_long_names() {
        let mut store = MockGenreStore::new();
        store.expect_create().never();
        let service = GenreService::new(Arc::new(store));

        assert!(matches!(
            service.create("   ").await,
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            service.create(&"x".repeat(MAX_NAME_LEN + 1)).await,
            Err(AppError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_accepts_name_at_limit() {
        let mut store = MockGenreStore::new();
        store.expect_create().returning(|name| Ok(genre(1, name)));

        let name = "é".repeat(MAX_NAME_LEN);
        let created = GenreService::new(Arc::new(store))
            .create(&name)
            .await
            .expect("a name of exactly the limit is valid");

        assert_eq!(created.name, name);
    }

    #[tokio::test]
    async fn test_missing_genre_is_not_found() {
        let mut store = MockGenreStore::new();
        store.expect_get().returning(|_| Ok(None));
        store.expect_update().returning(|_, _| Ok(None));
        store.expect_delete().returning(|_| Ok(false));
        let service = GenreService::new(Arc::new(store));

        assert!(matches!(service.get(5).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            service.update(5, "Sci-Fi").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(service.delete(5).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_validates_before_touching_store() {
        let mut store = MockGenreStore::new();
        store.expect_update().never();

        let result = GenreService::new(Arc::new(store)).update(1, "").await;

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
