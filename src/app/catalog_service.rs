//! Catalog use cases shared by the HTTP handlers.
//!
//! The service owns the store it was constructed with; there is no global persistence context.

use std::sync::Arc;

use tracing::{info, warn};

use crate::codec::{decode_books, encode_books, DecodeError, EncodeError};
use crate::domain::{Book, BookId, ValidationError};
use crate::storage::{BookStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// A decoded row breaks the same rules interactive edits must follow.
    #[error("row {row}: {source}")]
    InvalidRow {
        row: usize,
        #[source]
        source: ValidationError,
    },
}

impl CatalogError {
    /// Whether the caller supplied bad input, as opposed to the service failing.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::InvalidRow { .. })
    }
}

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn BookStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn BookStore> {
        &self.store
    }

    pub async fn list_books(&self) -> Result<Vec<Book>, CatalogError> {
        Ok(self.store.list_all().await?)
    }

    pub async fn find_book(&self, id: BookId) -> Result<Option<Book>, CatalogError> {
        Ok(self.store.find(id).await?)
    }

    /// Stores `book` as a new record, ignoring any id it carries.
    pub async fn create_book(&self, mut book: Book) -> Result<Book, CatalogError> {
        book.id = None;
        let saved = self.store.save(book).await?;
        info!(id = ?saved.id, title = %saved.title, "book created");
        Ok(saved)
    }

    /// Replaces the record `id` with `book` (creating it if it does not exist).
    pub async fn update_book(&self, id: BookId, book: Book) -> Result<Book, CatalogError> {
        let saved = self.store.save(book.with_id(id)).await?;
        info!(id, title = %saved.title, "book updated");
        Ok(saved)
    }

    pub async fn delete_book(&self, id: BookId) -> Result<(), CatalogError> {
        self.store.delete(id).await?;
        info!(id, "book deleted");
        Ok(())
    }

    /// Encodes the whole catalog as an `.xlsx` document.
    pub async fn export_workbook(&self) -> Result<Vec<u8>, CatalogError> {
        let books = self.store.list_all().await?;
        let bytes = encode_books(&books)?;
        info!(books = books.len(), bytes = bytes.len(), "catalog exported");
        Ok(bytes)
    }

    /// Decodes an uploaded workbook and stores every row as a new book.
    ///
    /// Nothing is saved unless every row decodes and validates. Returns the number of books stored.
    pub async fn import_workbook(&self, bytes: &[u8]) -> Result<usize, CatalogError> {
        let books = decode_books(bytes).inspect_err(|e| warn!(error = %e, "import rejected"))?;

        for (idx, book) in books.iter().enumerate() {
            // +2: 1-based numbering plus the header row.
            book.validate().map_err(|source| {
                let row = idx + 2;
                warn!(row, error = %source, "import rejected");
                CatalogError::InvalidRow { row, source }
            })?;
        }

        let saved = self.store.save_all(books).await?;
        info!(books = saved.len(), "catalog imported");
        Ok(saved.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBookStore;

    fn service() -> CatalogService {
        CatalogService::new(Arc::new(MemoryBookStore::new()))
    }

    #[tokio::test]
    async fn create_ignores_client_id_and_update_pins_path_id() {
        let svc = service();
        let created = svc
            .create_book(Book::new("Dune", "Herbert", 12.5).with_id(42))
            .await
            .unwrap();
        assert_eq!(created.id, Some(1));

        let updated = svc
            .update_book(1, Book::new("Dune", "Frank Herbert", 13.0).with_id(77))
            .await
            .unwrap();
        assert_eq!(updated.id, Some(1));
        assert_eq!(svc.list_books().await.unwrap(), vec![updated]);
    }

    #[tokio::test]
    async fn export_then_import_appends_copies() {
        let svc = service();
        svc.create_book(Book::new("Dune", "Herbert", 12.5)).await.unwrap();
        svc.create_book(Book::new("Emma", "Austen", 7.0)).await.unwrap();

        let bytes = svc.export_workbook().await.unwrap();
        assert_eq!(svc.import_workbook(&bytes).await.unwrap(), 2);

        let titles: Vec<_> = svc
            .list_books()
            .await
            .unwrap()
            .into_iter()
            .map(|b| (b.id.unwrap(), b.title))
            .collect();
        assert_eq!(
            titles,
            vec![
                (1, "Dune".to_string()),
                (2, "Emma".to_string()),
                (3, "Dune".to_string()),
                (4, "Emma".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn import_with_invalid_row_saves_nothing() {
        let svc = service();
        let bytes = encode_books(&[
            Book::new("Dune", "Herbert", 12.5),
            Book::new("Free", "Nobody", 0.0),
        ])
        .unwrap();

        let err = svc.import_workbook(&bytes).await.unwrap_err();
        assert!(
            matches!(
                err,
                CatalogError::InvalidRow {
                    row: 3,
                    source: ValidationError::NonPositivePrice(_)
                }
            ),
            "{err:?}"
        );
        assert!(err.is_client_error());
        assert_eq!(svc.store().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn import_of_garbage_is_a_client_error() {
        let svc = service();
        let err = svc.import_workbook(b"PK\x03\x04 nope").await.unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)), "{err:?}");
        assert!(err.is_client_error());
    }
}
