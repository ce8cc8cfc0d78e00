use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::{header, StatusCode};
use serde_json::json;
use tracing::debug;

use crate::state::AppState;

/// Rejects cross-origin requests from origins outside the allow-list.
///
/// Requests without an `Origin` header (same-origin, curl, server-to-server)
/// pass through untouched. Preflights never reach this layer, the CORS layer
/// in front answers them itself.
pub async fn origin_gate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok());

    if let Some(origin) = origin {
        let allowed = state
            .config()
            .allowed_origins
            .iter()
            .any(|candidate| candidate == origin);
        if !allowed {
            debug!("Blocked request from origin {origin}");
            return (
                StatusCode::FORBIDDEN,
                Json(json!({"message": "Not allowed by CORS"})),
            )
                .into_response();
        }
    }

    next.run(request).await
}
