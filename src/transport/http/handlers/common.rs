use crate::app::CatalogError;
use crate::transport::http::types::LIST_PATH;
use crate::transport::http::views;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};

/// 500 page for failures that are not the caller's fault. Details go to the log only.
pub fn internal_error(err: CatalogError) -> Response {
    tracing::error!(error = %err, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(views::render_error("The catalog is temporarily unavailable.")),
    )
        .into_response()
}

pub fn redirect_to_list() -> Response {
    Redirect::to(LIST_PATH).into_response()
}

/// Redirects to the list with the import failure reason in the query string.
pub fn redirect_with_import_error(message: &str) -> Response {
    let location = format!(
        "{}?import_error={}",
        LIST_PATH,
        urlencoding::encode(message)
    );
    Redirect::to(&location).into_response()
}
