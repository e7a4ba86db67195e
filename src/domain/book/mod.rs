//! The book record and the rules a submitted book must satisfy.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Primary key of a stored book (`books.id`, a Postgres `SERIAL`).
pub type BookId = i32;

/// Longest title or author accepted, in characters. Matches what one `.xlsx` cell can hold, so
/// every stored book can be exported.
pub const MAX_TEXT_CHARS: usize = 32_767;

/// A single catalog entry.
///
/// `id` is `None` for a book that has not been stored yet; the store assigns one on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    #[schema(value_type = Option<i32>)]
    pub id: Option<BookId>,
    pub title: String,
    pub author: String,
    pub price: f64,
}

impl Book {
    /// Builds a book that has no id yet (an insert when saved).
    pub fn new(title: impl Into<String>, author: impl Into<String>, price: f64) -> Self {
        Self {
            id: None,
            title: title.into(),
            author: author.into(),
            price,
        }
    }

    /// Returns the same book targeting the row `id`.
    pub fn with_id(mut self, id: BookId) -> Self {
        self.id = Some(id);
        self
    }

    /// Checks the presence/positivity rules applied at every entry point that accepts user data.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.author.trim().is_empty() {
            return Err(ValidationError::EmptyAuthor);
        }
        for (field, text) in [("title", &self.title), ("author", &self.author)] {
            let chars = text.chars().count();
            if chars > MAX_TEXT_CHARS {
                return Err(ValidationError::TooLong { field, chars });
            }
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(ValidationError::NonPositivePrice(self.price));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("author must not be empty")]
    EmptyAuthor,
    #[error("{field} is {chars} characters long, at most 32767 are allowed")]
    TooLong { field: &'static str, chars: usize },
    #[error("price must be a positive number (got {0})")]
    NonPositivePrice(f64),
    #[error("price '{0}' is not a number")]
    UnparseablePrice(String),
}

/// Raw values of the create/edit form, kept as submitted so an invalid form can be shown again.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(default)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    /// Submitted as text; parsed during validation.
    pub price: String,
}

impl BookForm {
    /// Parses and validates the form into a book without an id.
    pub fn parse(&self) -> Result<Book, ValidationError> {
        let raw_price = self.price.trim();
        let price = raw_price
            .parse::<f64>()
            .map_err(|_| ValidationError::UnparseablePrice(raw_price.to_string()))?;
        let book = Book::new(self.title.clone(), self.author.clone(), price);
        book.validate()?;
        Ok(book)
    }
}

impl From<&Book> for BookForm {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            price: book.price.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, author: &str, price: &str) -> BookForm {
        BookForm {
            title: title.to_string(),
            author: author.to_string(),
            price: price.to_string(),
        }
    }

    #[test]
    fn valid_form_parses_into_new_book() {
        let book = form("Dune", "Herbert", "12.5").parse().unwrap();
        assert_eq!(book, Book::new("Dune", "Herbert", 12.5));
        assert!(book.id.is_none());
    }

    #[test]
    fn blank_title_or_author_is_rejected() {
        assert_eq!(form("", "X", "5").parse(), Err(ValidationError::EmptyTitle));
        assert_eq!(form("   ", "X", "5").parse(), Err(ValidationError::EmptyTitle));
        assert_eq!(form("T", "", "5").parse(), Err(ValidationError::EmptyAuthor));
    }

    #[test]
    fn title_or_author_longer_than_a_cell_is_rejected() {
        let long = "x".repeat(MAX_TEXT_CHARS + 1);
        assert_eq!(
            form(&long, "A", "5").parse(),
            Err(ValidationError::TooLong {
                field: "title",
                chars: MAX_TEXT_CHARS + 1
            })
        );
        assert_eq!(
            form("T", &long, "5").parse(),
            Err(ValidationError::TooLong {
                field: "author",
                chars: MAX_TEXT_CHARS + 1
            })
        );
        assert!(form(&long[1..], "A", "5").parse().is_ok());
    }

    #[test]
    fn price_must_be_positive_and_numeric() {
        assert_eq!(
            form("T", "A", "0").parse(),
            Err(ValidationError::NonPositivePrice(0.0))
        );
        assert_eq!(
            form("T", "A", "-3").parse(),
            Err(ValidationError::NonPositivePrice(-3.0))
        );
        assert!(matches!(
            form("T", "A", "NaN").parse(),
            Err(ValidationError::NonPositivePrice(_))
        ));
        assert_eq!(
            form("T", "A", "cheap").parse(),
            Err(ValidationError::UnparseablePrice("cheap".to_string()))
        );
    }

    #[test]
    fn form_prefills_from_stored_book() {
        let book = Book::new("Emma", "Austen", 7.25).with_id(3);
        let prefilled = BookForm::from(&book);
        assert_eq!(prefilled, form("Emma", "Austen", "7.25"));
    }
}
