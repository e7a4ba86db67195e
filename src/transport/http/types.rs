use crate::app::CatalogService;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::{IntoParams, ToSchema};

/// Path of the book list; every successful mutation redirects here.
pub const LIST_PATH: &str = "/book/";

#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    /// Body limit applied to `POST /book/import`.
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(catalog: CatalogService, max_upload_bytes: usize) -> Self {
        Self {
            catalog,
            max_upload_bytes,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of a previous import, carried to the list page through the redirect.
#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Number of books stored by the last import.
    pub imported: Option<usize>,
    /// Why the last import was rejected.
    pub import_error: Option<String>,
}

/// Multipart body of `POST /book/import`.
#[derive(ToSchema)]
pub struct ImportUpload {
    /// The `.xlsx` workbook to import.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}
