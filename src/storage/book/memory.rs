//! Process-local book store, used by tests and for running the UI without a database.

use super::{BookStore, StoreError};
use crate::domain::{Book, BookId};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    books: BTreeMap<BookId, Book>,
    last_id: BookId,
}

impl Inner {
    fn save(&mut self, mut book: Book) -> Result<Book, StoreError> {
        let id = match book.id {
            Some(id) => id,
            None => self
                .last_id
                .checked_add(1)
                .ok_or(StoreError::IdSpaceExhausted)?,
        };
        // Same rule as a serial sequence: later inserts never reuse an explicit id.
        self.last_id = self.last_id.max(id);
        book.id = Some(id);
        self.books.insert(id, book.clone());
        Ok(book)
    }
}

#[derive(Default)]
pub struct MemoryBookStore {
    inner: RwLock<Inner>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn list_all(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self.inner.read().await.books.values().cloned().collect())
    }

    async fn find(&self, id: BookId) -> Result<Option<Book>, StoreError> {
        Ok(self.inner.read().await.books.get(&id).cloned())
    }

    async fn save(&self, book: Book) -> Result<Book, StoreError> {
        self.inner.write().await.save(book)
    }

    async fn save_all(&self, books: Vec<Book>) -> Result<Vec<Book>, StoreError> {
        let mut inner = self.inner.write().await;
        books.into_iter().map(|b| inner.save(b)).collect()
    }

    async fn delete(&self, id: BookId) -> Result<(), StoreError> {
        self.inner.write().await.books.remove(&id);
        Ok(())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.inner.read().await.books.len() as u64)
    }
}
