use crate::domain::{BookForm, BookId};
use crate::transport::http::handlers::common::{internal_error, redirect_to_list};
use crate::transport::http::types::{AppState, ListQuery};
use crate::transport::http::views::{self, FormMode, Notice};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;

#[utoipa::path(
    get,
    path = "/book/",
    params(ListQuery),
    responses(
        (status = 200, description = "All books", content_type = "text/html", body = String),
        (status = 500, description = "Store unavailable", content_type = "text/html", body = String)
    )
)]
pub async fn list_handler(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Response {
    let books = match state.catalog.list_books().await {
        Ok(books) => books,
        Err(e) => return internal_error(e),
    };

    let notice = match (query.import_error, query.imported) {
        (Some(msg), _) => Some(Notice::ImportFailed(msg)),
        (None, Some(n)) => Some(Notice::Imported(n)),
        (None, None) => None,
    };
    Html(views::render_list(&books, notice.as_ref())).into_response()
}

#[utoipa::path(
    get,
    path = "/book/create",
    responses((status = 200, description = "Empty book form", content_type = "text/html", body = String))
)]
pub async fn create_form_handler() -> Html<String> {
    Html(views::render_form(FormMode::Create, &BookForm::default(), None))
}

#[utoipa::path(
    post,
    path = "/book/create",
    request_body(content = BookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Book created, redirect to the list"),
        (status = 422, description = "Invalid input, form shown again", content_type = "text/html", body = String),
        (status = 500, description = "Store unavailable", content_type = "text/html", body = String)
    )
)]
pub async fn create_handler(State(state): State<AppState>, Form(form): Form<BookForm>) -> Response {
    let book = match form.parse() {
        Ok(book) => book,
        Err(e) => return invalid_form(FormMode::Create, &form, &e.to_string()),
    };

    match state.catalog.create_book(book).await {
        Ok(_) => redirect_to_list(),
        Err(e) => internal_error(e),
    }
}

#[utoipa::path(
    get,
    path = "/book/edit/{id}",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "Pre-filled edit form", content_type = "text/html", body = String),
        (status = 303, description = "No such book, redirect to the list"),
        (status = 500, description = "Store unavailable", content_type = "text/html", body = String)
    )
)]
pub async fn edit_form_handler(State(state): State<AppState>, Path(id): Path<BookId>) -> Response {
    match state.catalog.find_book(id).await {
        Ok(Some(book)) => {
            Html(views::render_form(FormMode::Edit(id), &BookForm::from(&book), None)).into_response()
        }
        Ok(None) => {
            tracing::debug!(id, "edit requested for missing book");
            redirect_to_list()
        }
        Err(e) => internal_error(e),
    }
}

#[utoipa::path(
    post,
    path = "/book/update/{id}",
    params(("id" = i32, Path, description = "Book id")),
    request_body(content = BookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Book saved, redirect to the list"),
        (status = 422, description = "Invalid input, form shown again", content_type = "text/html", body = String),
        (status = 500, description = "Store unavailable", content_type = "text/html", body = String)
    )
)]
pub async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<BookId>,
    Form(form): Form<BookForm>,
) -> Response {
    let book = match form.parse() {
        Ok(book) => book,
        Err(e) => return invalid_form(FormMode::Edit(id), &form, &e.to_string()),
    };

    match state.catalog.update_book(id, book).await {
        Ok(_) => redirect_to_list(),
        Err(e) => internal_error(e),
    }
}

#[utoipa::path(
    get,
    path = "/book/delete/{id}",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 303, description = "Deleted (or already absent), redirect to the list"),
        (status = 500, description = "Store unavailable", content_type = "text/html", body = String)
    )
)]
pub async fn delete_handler(State(state): State<AppState>, Path(id): Path<BookId>) -> Response {
    match state.catalog.delete_book(id).await {
        Ok(()) => redirect_to_list(),
        Err(e) => internal_error(e),
    }
}

fn invalid_form(mode: FormMode, form: &BookForm, message: &str) -> Response {
    tracing::debug!(?mode, error = message, "book form rejected");
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Html(views::render_form(mode, form, Some(message))),
    )
        .into_response()
}
