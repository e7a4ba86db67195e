//! Spreadsheet export and import.

use crate::transport::http::handlers::common::{internal_error, redirect_with_import_error};
use crate::transport::http::types::{AppState, ImportUpload, LIST_PATH};
use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::{IntoResponse, Redirect, Response};

pub const EXPORT_FILENAME: &str = "books.xlsx";

/// Multipart field carrying the workbook.
const FILE_FIELD: &str = "file";

#[utoipa::path(
    get,
    path = "/book/export",
    responses(
        (status = 200, description = "All books as an .xlsx attachment", content_type = "application/octet-stream", body = Vec<u8>),
        (status = 500, description = "Store or encoder failure", content_type = "text/html", body = String)
    )
)]
pub async fn export_handler(State(state): State<AppState>) -> Response {
    match state.catalog.export_workbook().await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "application/octet-stream".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename={EXPORT_FILENAME}"),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => internal_error(e),
    }
}

#[utoipa::path(
    post,
    path = "/book/import",
    request_body(content = ImportUpload, content_type = "multipart/form-data"),
    responses(
        (status = 303, description = "Redirect to the list with `imported=<n>` or `import_error=<reason>`"),
        (status = 500, description = "Store failure", content_type = "text/html", body = String)
    )
)]
pub async fn import_handler(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let upload = loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return redirect_with_import_error("no file uploaded"),
            Err(e) => {
                tracing::warn!(error = %e, "unreadable import upload");
                return redirect_with_import_error(&format!("upload could not be read: {e}"));
            }
        };
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        match field.bytes().await {
            Ok(bytes) => break bytes,
            Err(e) => {
                tracing::warn!(error = %e, "unreadable import upload");
                return redirect_with_import_error(&format!("upload could not be read: {e}"));
            }
        }
    };

    if upload.is_empty() {
        return redirect_with_import_error("no file uploaded");
    }

    match state.catalog.import_workbook(&upload).await {
        Ok(count) => Redirect::to(&format!("{LIST_PATH}?imported={count}")).into_response(),
        Err(e) if e.is_client_error() => redirect_with_import_error(&e.to_string()),
        Err(e) => internal_error(e),
    }
}
