//! Post persistence
//!
//! The [`PostStore`] trait is the seam between the blog and its relational
//! backend. It deals in raw rows only: slugs, timestamps and rendering are
//! decided by the repository above it.

mod sqlite;

pub use sqlite::SqliteStore;

use crate::content::{NewPost, Post};

/// Errors raised by a post store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("database connection lock poisoned")]
    Poisoned,
}

/// Row-level access to the `post` table
pub trait PostStore: Send + Sync {
    /// Insert a post and return its new id
    fn insert(&self, post: &NewPost, slug: &str) -> Result<i64, StoreError>;

    /// Overwrite every column of the row with `post.id`, returning the number
    /// of rows changed
    fn update(&self, post: &Post) -> Result<usize, StoreError>;

    /// All posts, most recent first, optionally restricted to one language
    fn list(&self, language: Option<&str>) -> Result<Vec<Post>, StoreError>;

    /// First row with this slug. Slugs are not unique, so which row wins
    /// among duplicates is up to the backend.
    fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError>;

    fn find_by_id(&self, id: i64) -> Result<Option<Post>, StoreError>;

    /// Delete the row with this id; a missing row is not an error
    fn delete(&self, id: i64) -> Result<(), StoreError>;
}
