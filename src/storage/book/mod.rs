//! Persistence for book records.

use crate::domain::{Book, BookId};
use async_trait::async_trait;

pub mod memory;
pub mod postgres;

pub use memory::MemoryBookStore;
pub use postgres::PgBookStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("no book ids left to assign")]
    IdSpaceExhausted,
}

/// Contract every book store provides.
///
/// `save` is an upsert keyed by id: a book without an id is inserted and gets a fresh id, a book
/// with an id replaces that row (or creates it with that id). `delete` of a missing id is a no-op.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All stored books, ordered by id.
    async fn list_all(&self) -> Result<Vec<Book>, StoreError>;

    async fn find(&self, id: BookId) -> Result<Option<Book>, StoreError>;

    /// Inserts or replaces `book` and returns it as stored (id always set).
    async fn save(&self, book: Book) -> Result<Book, StoreError>;

    async fn save_all(&self, books: Vec<Book>) -> Result<Vec<Book>, StoreError>;

    async fn delete(&self, id: BookId) -> Result<(), StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;
}
