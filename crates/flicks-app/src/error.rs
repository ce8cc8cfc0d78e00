use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde_json::json;
use tracing::error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Movie not found")]
    RecordNotFound,

    #[error("Store error: {0}")]
    Store(flicks_dal::Error),
}

impl From<flicks_dal::Error> for ApiError {
    fn from(value: flicks_dal::Error) -> Self {
        match value {
            flicks_dal::Error::RecordNotFound(_) => ApiError::RecordNotFound,
            other => ApiError::Store(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::RecordNotFound => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Internal error in handler: {self}");
        }
        (status, Json(json!({"message": self.to_string()}))).into_response()
    }
}
