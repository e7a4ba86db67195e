//! Minimal server-side HTML for the list and form pages.

use crate::domain::{Book, BookForm, BookId};
use std::fmt::Write;

/// Which form is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(BookId),
}

/// Banner shown above the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Imported(usize),
    ImportFailed(String),
}

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}</body>\n</html>\n",
        escape(title),
        body
    )
}

pub fn render_list(books: &[Book], notice: Option<&Notice>) -> String {
    let mut body = String::from("<h1>Books</h1>\n");
    match notice {
        Some(Notice::Imported(n)) => {
            let _ = writeln!(body, "<p class=\"notice\">Imported {n} book(s).</p>");
        }
        Some(Notice::ImportFailed(msg)) => {
            let _ = writeln!(
                body,
                "<p class=\"error\">Import failed: {}</p>",
                escape(msg)
            );
        }
        None => {}
    }

    body.push_str(
        "<p><a href=\"/book/create\">Add book</a> | <a href=\"/book/export\">Export to Excel</a></p>\n",
    );
    body.push_str(
        "<form method=\"post\" action=\"/book/import\" enctype=\"multipart/form-data\">\
         <input type=\"file\" name=\"file\" accept=\".xlsx\"> <button type=\"submit\">Import</button></form>\n",
    );

    body.push_str("<table>\n<tr><th>ID</th><th>Title</th><th>Author</th><th>Price</th><th></th></tr>\n");
    for book in books {
        let id = book.id.map(|id| id.to_string()).unwrap_or_default();
        let _ = writeln!(
            body,
            "<tr><td>{id}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td><a href=\"/book/edit/{id}\">Edit</a> <a href=\"/book/delete/{id}\">Delete</a></td></tr>",
            escape(&book.title),
            escape(&book.author),
            book.price
        );
    }
    body.push_str("</table>\n");

    page("Books", &body)
}

pub fn render_form(mode: FormMode, form: &BookForm, error: Option<&str>) -> String {
    let (heading, action) = match mode {
        FormMode::Create => ("Add book".to_string(), "/book/create".to_string()),
        FormMode::Edit(id) => (format!("Edit book #{id}"), format!("/book/update/{id}")),
    };

    let mut body = format!("<h1>{}</h1>\n", escape(&heading));
    if let Some(msg) = error {
        let _ = writeln!(body, "<p class=\"error\">{}</p>", escape(msg));
    }
    let _ = write!(
        body,
        "<form method=\"post\" action=\"{action}\">\n\
         <label>Title <input name=\"title\" value=\"{}\"></label>\n\
         <label>Author <input name=\"author\" value=\"{}\"></label>\n\
         <label>Price <input name=\"price\" value=\"{}\"></label>\n\
         <button type=\"submit\">Save</button>\n\
         </form>\n\
         <p><a href=\"/book/\">Back to list</a></p>\n",
        escape(&form.title),
        escape(&form.author),
        escape(&form.price)
    );

    page(&heading, &body)
}

pub fn render_error(message: &str) -> String {
    page(
        "Error",
        &format!(
            "<h1>Something went wrong</h1>\n<p>{}</p>\n<p><a href=\"/book/\">Back to list</a></p>\n",
            escape(message)
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_text_is_escaped() {
        let books = vec![Book::new("<script>", "O'Brien & Co", 3.5).with_id(1)];
        let html = render_list(&books, None);
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("O&#39;Brien &amp; Co"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn edit_form_posts_to_update_path_and_shows_error() {
        let form = BookForm {
            title: String::new(),
            author: "X".to_string(),
            price: "5".to_string(),
        };
        let html = render_form(FormMode::Edit(4), &form, Some("title must not be empty"));
        assert!(html.contains("action=\"/book/update/4\""));
        assert!(html.contains("class=\"error\""));
        assert!(html.contains("value=\"X\""));
    }
}
