pub mod app;
pub mod codec;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::{CatalogError, CatalogService};
pub use domain::{Book, BookForm, BookId, ValidationError};
pub use storage::{BookStore, MemoryBookStore, PgBookStore, StoreError};
