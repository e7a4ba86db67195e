use crate::domain::{Book, BookForm};
use crate::transport::http::handlers::{books, health, transfer};
use crate::transport::http::types::{ApiResponse, AppState, ImportUpload, LIST_PATH};
use axum::extract::DefaultBodyLimit;
use axum::response::Redirect;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        books::list_handler,
        books::create_form_handler,
        books::create_handler,
        books::edit_form_handler,
        books::update_handler,
        books::delete_handler,
        transfer::export_handler,
        transfer::import_handler
    ),
    components(schemas(ApiResponse, Book, BookForm, ImportUpload))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(app_state.max_upload_bytes);

    Router::new()
        .route("/", get(|| async { Redirect::to(LIST_PATH) }))
        .route("/book", get(|| async { Redirect::to(LIST_PATH) }))
        .route("/health", get(health::healthcheck_handler))
        .route(LIST_PATH, get(books::list_handler))
        .route(
            "/book/create",
            get(books::create_form_handler).post(books::create_handler),
        )
        .route("/book/edit/:id", get(books::edit_form_handler))
        .route("/book/update/:id", post(books::update_handler))
        .route("/book/delete/:id", get(books::delete_handler))
        .route("/book/export", get(transfer::export_handler))
        .route(
            "/book/import",
            post(transfer::import_handler).layer(upload_limit),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
