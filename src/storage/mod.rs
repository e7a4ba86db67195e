//! Persistence layer.

pub mod book;

pub use book::{BookStore, MemoryBookStore, PgBookStore, StoreError};
