//! Domain types for the book catalog.

pub mod book;

pub use book::{Book, BookForm, BookId, ValidationError, MAX_TEXT_CHARS};
