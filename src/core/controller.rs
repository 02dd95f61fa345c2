use std::sync::Arc;
use axum::body::{boxed, Empty};
use axum::extract::rejection::BytesRejection;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;
use tracing::error;
use crate::catalog::domain::CatalogService;
use crate::core::command::CommandError;
use crate::core::domain::Configuration;
use crate::core::library::LibraryError;
use crate::utils::assets::StaticAssets;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogService>,
    pub assets: Arc<StaticAssets>,
}

impl AppState {
    pub fn new(config: &Configuration, catalog: Arc<dyn CatalogService>) -> AppState {
        AppState {
            catalog,
            assets: Arc::new(StaticAssets::new(config.client_dir.clone())),
        }
    }
}

// ServerError is the request-boundary form of every failure; it renders as `{"message": ...}`.
#[derive(Debug, PartialEq)]
pub struct ServerError {
    pub status: StatusCode,
    pub message: String,
}

impl ServerError {
    pub fn new(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
        }
    }
}

pub fn body_to_server_error(err: BytesRejection) -> ServerError {
    ServerError::new(StatusCode::BAD_REQUEST, format!("Unable to read request body: {}", err).as_str())
}

impl From<CommandError> for ServerError {
    fn from(err: CommandError) -> Self {
        let status = match err {
            CommandError::Validation { .. } => StatusCode::BAD_REQUEST,
            CommandError::Serialization { .. } => StatusCode::BAD_REQUEST,
            CommandError::DuplicateKey { .. } => StatusCode::CONFLICT,
            CommandError::NotFound { .. } => StatusCode::NOT_FOUND,
            CommandError::Runtime { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ServerError::new(status, err.message())
    }
}

impl From<LibraryError> for ServerError {
    fn from(err: LibraryError) -> Self {
        ServerError::from(CommandError::from(err))
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        json_response(self.status, &json!({ "message": self.message }))
    }
}

/// Builds a response with an explicit `Content-Type` and an exact `Content-Length`.
pub fn content_response(status: StatusCode, content_type: &'static str, content: Vec<u8>) -> Response {
    let length = HeaderValue::from(content.len());
    (
        status,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (header::CONTENT_LENGTH, length),
        ],
        content,
    ).into_response()
}

pub fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(bytes) => content_response(status, "application/json", bytes),
        Err(err) => {
            error!("failed to encode response body {:?}", err);
            content_response(StatusCode::INTERNAL_SERVER_ERROR, "text/plain",
                             b"Internal Server Error".to_vec())
        }
    }
}

// HEAD responses keep status and headers, including the GET body length.
pub fn without_body(response: Response) -> Response {
    let (parts, _) = response.into_parts();
    Response::from_parts(parts, boxed(Empty::new()))
}
