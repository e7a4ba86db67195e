//! Converts between books and `.xlsx` workbooks.
//!
//! Layout: one sheet named "Books", a header row `ID | Title | Author | Price`, then one row per
//! book. Decoding reads the first sheet positionally and never looks at the id column, so every
//! decoded book is a new insert.

use std::io::Cursor;

use calamine::{open_workbook_from_rs, Data, Range, Reader, Xlsx};
use rust_xlsxwriter::{Format, Workbook};

use crate::domain::{Book, BookId, MAX_TEXT_CHARS};

pub const SHEET_NAME: &str = "Books";
pub const HEADER: [&str; 4] = ["ID", "Title", "Author", "Price"];

const COL_ID: u16 = 0;
const COL_TITLE: u16 = 1;
const COL_AUTHOR: u16 = 2;
const COL_PRICE: u16 = 3;

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("too many books for one sheet ({0})")]
    TooManyRows(usize),
    #[error(
        "{column} of book {} has {chars} characters, more than the 32767 a cell can hold",
        .id.map_or_else(|| "(unsaved)".to_string(), |id| format!("#{id}"))
    )]
    CellTooLong {
        id: Option<BookId>,
        column: &'static str,
        chars: usize,
    },
    #[error("failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Why an uploaded workbook could not be turned into books.
///
/// Row numbers are 1-based, as shown by spreadsheet applications.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("not a readable .xlsx workbook: {0}")]
    Malformed(String),
    #[error("workbook contains no sheets")]
    NoSheet,
    #[error("sheet has {found} column(s), expected at least 4 (ID, Title, Author, Price)")]
    MissingColumns { found: usize },
    #[error("row {row}: {column} cell is empty")]
    MissingCell { row: u32, column: &'static str },
    #[error("row {row}: {column} cell must be {expected}, found {found}")]
    WrongCellType {
        row: u32,
        column: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

/// Writes `books` (in the given order) into an in-memory `.xlsx` document.
pub fn encode_books(books: &[Book]) -> Result<Vec<u8>, EncodeError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let bold = Format::new().set_bold();
    for (col, name) in (0u16..).zip(HEADER) {
        worksheet.write_string_with_format(0, col, name, &bold)?;
    }

    for (idx, book) in books.iter().enumerate() {
        let row = u32::try_from(idx + 1).map_err(|_| EncodeError::TooManyRows(books.len()))?;
        if let Some(id) = book.id {
            worksheet.write_number(row, COL_ID, f64::from(id))?;
        }
        worksheet.write_string(row, COL_TITLE, fit_cell(book, "Title", &book.title)?)?;
        worksheet.write_string(row, COL_AUTHOR, fit_cell(book, "Author", &book.author)?)?;
        worksheet.write_number(row, COL_PRICE, book.price)?;
    }

    Ok(workbook.save_to_buffer()?)
}

fn fit_cell<'a>(
    book: &Book,
    column: &'static str,
    text: &'a str,
) -> Result<&'a str, EncodeError> {
    let chars = text.chars().count();
    if chars > MAX_TEXT_CHARS {
        return Err(EncodeError::CellTooLong {
            id: book.id,
            column,
            chars,
        });
    }
    Ok(text)
}

/// Reads books from the first sheet of an `.xlsx` document.
///
/// Row 0 is treated as a header and skipped without inspection, so an empty or header-only sheet
/// yields no books. The four-column check only applies once data rows exist. Rows whose four cells are all
/// blank are skipped; any other row must carry text title/author and a numeric price, otherwise
/// the whole decode fails on that row.
pub fn decode_books(bytes: &[u8]) -> Result<Vec<Book>, DecodeError> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))
        .map_err(|e: calamine::XlsxError| DecodeError::Malformed(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(DecodeError::NoSheet)?
        .map_err(|e| DecodeError::Malformed(e.to_string()))?;

    // calamine trims leading empty rows/columns, so cells are addressed by absolute position.
    let Some((last_row, last_col)) = range.end() else {
        return Ok(Vec::new());
    };
    // Header only (whatever its width): nothing to import.
    if last_row == 0 {
        return Ok(Vec::new());
    }
    if last_col < u32::from(COL_PRICE) {
        return Err(DecodeError::MissingColumns {
            found: last_col as usize + 1,
        });
    }

    let mut books = Vec::new();
    for row in 1..=last_row {
        if is_blank_row(&range, row) {
            continue;
        }
        let title = text_cell(&range, row, COL_TITLE, "Title")?;
        let author = text_cell(&range, row, COL_AUTHOR, "Author")?;
        let price = number_cell(&range, row, COL_PRICE, "Price")?;
        books.push(Book::new(title, author, price));
    }
    Ok(books)
}

fn cell(range: &Range<Data>, row: u32, col: u16) -> Option<&Data> {
    range
        .get_value((row, u32::from(col)))
        .filter(|d| !is_blank(d))
}

fn is_blank(data: &Data) -> bool {
    match data {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn is_blank_row(range: &Range<Data>, row: u32) -> bool {
    [COL_ID, COL_TITLE, COL_AUTHOR, COL_PRICE]
        .into_iter()
        .all(|col| cell(range, row, col).is_none())
}

fn text_cell(
    range: &Range<Data>,
    row: u32,
    col: u16,
    column: &'static str,
) -> Result<String, DecodeError> {
    match cell(range, row, col) {
        Some(Data::String(s)) => Ok(s.clone()),
        Some(other) => Err(DecodeError::WrongCellType {
            row: row + 1,
            column,
            expected: "text",
            found: kind(other),
        }),
        None => Err(DecodeError::MissingCell {
            row: row + 1,
            column,
        }),
    }
}

fn number_cell(
    range: &Range<Data>,
    row: u32,
    col: u16,
    column: &'static str,
) -> Result<f64, DecodeError> {
    match cell(range, row, col) {
        Some(Data::Float(f)) => Ok(*f),
        Some(Data::Int(i)) => Ok(*i as f64),
        Some(other) => Err(DecodeError::WrongCellType {
            row: row + 1,
            column,
            expected: "a number",
            found: kind(other),
        }),
        None => Err(DecodeError::MissingCell {
            row: row + 1,
            column,
        }),
    }
}

fn kind(data: &Data) -> &'static str {
    match data {
        Data::Int(_) | Data::Float(_) => "a number",
        Data::String(_) => "text",
        Data::Bool(_) => "a boolean",
        Data::DateTime(_) | Data::DateTimeIso(_) => "a date",
        Data::DurationIso(_) => "a duration",
        Data::Error(_) => "an error value",
        Data::Empty => "nothing",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn books() -> Vec<Book> {
        vec![
            Book::new("Dune", "Herbert", 12.5).with_id(7),
            Book::new("Emma", "Austen", 7.0).with_id(3),
            Book::new("Ulysses", "Joyce", 20.99).with_id(11),
        ]
    }

    #[test]
    fn decode_of_encode_keeps_fields_and_order_but_drops_ids() {
        let bytes = encode_books(&books()).unwrap();
        let decoded = decode_books(&bytes).unwrap();

        let expected: Vec<Book> = books()
            .into_iter()
            .map(|b| Book::new(b.title, b.author, b.price))
            .collect();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn encoded_sheet_has_header_and_numeric_id_cells() {
        let bytes = encode_books(&books()).unwrap();
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names(), vec![SHEET_NAME.to_string()]);

        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        let header: Vec<String> = (0..4)
            .map(|c| range.get_value((0, c)).unwrap().to_string())
            .collect();
        assert_eq!(header, HEADER);
        assert_eq!(range.get_value((1, 0)), Some(&Data::Float(7.0)));
        assert_eq!(range.get_value((3, 3)), Some(&Data::Float(20.99)));
    }

    #[test]
    fn empty_catalog_encodes_to_header_only_and_decodes_to_nothing() {
        let bytes = encode_books(&[]).unwrap();
        assert!(decode_books(&bytes).unwrap().is_empty());
    }

    #[test]
    fn oversized_text_names_the_book_and_column() {
        let books = vec![
            Book::new("Dune", "Herbert", 12.5).with_id(1),
            Book::new("x".repeat(40_000), "Anon", 1.0).with_id(2),
        ];
        let err = encode_books(&books).unwrap_err();
        assert!(
            matches!(
                err,
                EncodeError::CellTooLong {
                    id: Some(2),
                    column: "Title",
                    chars: 40_000
                }
            ),
            "{err:?}"
        );
        assert!(err.to_string().starts_with("Title of book #2 has 40000 characters"));

        let at_limit = vec![Book::new("y".repeat(MAX_TEXT_CHARS), "Anon", 1.0)];
        let decoded = decode_books(&encode_books(&at_limit).unwrap()).unwrap();
        assert_eq!(decoded[0].title.chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn garbage_bytes_are_malformed() {
        let err = decode_books(b"definitely not a zip archive").unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)), "{err:?}");
    }

    #[test]
    fn narrow_sheet_is_rejected() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "ID").unwrap();
        sheet.write_string(0, 1, "Title").unwrap();
        sheet.write_string(0, 2, "Author").unwrap();
        sheet.write_string(1, 1, "Dune").unwrap();
        sheet.write_string(1, 2, "Herbert").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let err = decode_books(&bytes).unwrap_err();
        assert!(matches!(err, DecodeError::MissingColumns { found: 3 }), "{err:?}");
    }

    #[test]
    fn header_only_sheet_of_any_width_decodes_to_nothing() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "ID").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        assert!(decode_books(&bytes).unwrap().is_empty());
    }

    #[test]
    fn text_price_names_row_and_column() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, name) in (0u16..).zip(HEADER) {
            sheet.write_string(0, col, name).unwrap();
        }
        sheet.write_string(1, 1, "Dune").unwrap();
        sheet.write_string(1, 2, "Herbert").unwrap();
        sheet.write_number(1, 3, 12.5).unwrap();
        sheet.write_string(2, 1, "Emma").unwrap();
        sheet.write_string(2, 2, "Austen").unwrap();
        sheet.write_string(2, 3, "seven").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let err = decode_books(&bytes).unwrap_err();
        assert!(
            matches!(
                err,
                DecodeError::WrongCellType {
                    row: 3,
                    column: "Price",
                    ..
                }
            ),
            "{err:?}"
        );
    }

    #[test]
    fn missing_author_is_reported() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, name) in (0u16..).zip(HEADER) {
            sheet.write_string(0, col, name).unwrap();
        }
        sheet.write_string(1, 1, "Dune").unwrap();
        sheet.write_number(1, 3, 12.5).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let err = decode_books(&bytes).unwrap_err();
        assert!(
            matches!(err, DecodeError::MissingCell { row: 2, column: "Author" }),
            "{err:?}"
        );
    }

    #[test]
    fn blank_rows_and_blank_id_column_are_tolerated() {
        // No ID values at all: the used range starts at column 1.
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 1, "Title").unwrap();
        sheet.write_string(0, 2, "Author").unwrap();
        sheet.write_string(0, 3, "Price").unwrap();
        sheet.write_string(1, 1, "Dune").unwrap();
        sheet.write_string(1, 2, "Herbert").unwrap();
        sheet.write_number(1, 3, 12).unwrap();
        sheet.write_string(4, 1, "Emma").unwrap();
        sheet.write_string(4, 2, "Austen").unwrap();
        sheet.write_number(4, 3, 7.5).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let decoded = decode_books(&bytes).unwrap();
        assert_eq!(
            decoded,
            vec![Book::new("Dune", "Herbert", 12.0), Book::new("Emma", "Austen", 7.5)]
        );
    }
}
