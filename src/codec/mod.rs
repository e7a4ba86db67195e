pub mod spreadsheet;

pub use spreadsheet::{decode_books, encode_books, DecodeError, EncodeError};
