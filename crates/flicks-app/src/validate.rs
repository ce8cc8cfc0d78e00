use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use axum::Json;
use garde::{Report, Validate};
use http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Extractor wrapper that runs garde validation after deserialization.
///
/// `Garde(Json(payload))` either yields a payload that passed its schema,
/// or short-circuits the handler with a structured rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct Garde<E>(pub E);

impl<E> Garde<E> {
    pub fn into_inner(self) -> E {
        self.0
    }
}

#[derive(Debug)]
pub enum ValidationRejection {
    /// Payload deserialized but failed schema validation.
    Invalid(Report),
    /// The `Json` extractor failed before validation could run.
    Json(JsonRejection),
}

impl Display for ValidationRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationRejection::Invalid(report) => write!(f, "{report}"),
            ValidationRejection::Json(rejection) => write!(f, "{rejection}"),
        }
    }
}

impl Error for ValidationRejection {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ValidationRejection::Invalid(report) => Some(report),
            ValidationRejection::Json(rejection) => Some(rejection),
        }
    }
}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        match self {
            ValidationRejection::Invalid(report) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({"error": report})),
            )
                .into_response(),
            // A well-formed body with values outside the schema (e.g. an
            // unknown genre) is a validation failure too, report it in the
            // same shape.
            ValidationRejection::Json(rejection @ JsonRejection::JsonDataError(_)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({"error": rejection.body_text()})),
            )
                .into_response(),
            ValidationRejection::Json(rejection) => rejection.into_response(),
        }
    }
}

impl<T, S> FromRequest<S> for Garde<Json<T>>
where
    T: DeserializeOwned + Validate<Context = ()>,
    S: Send + Sync,
{
    type Rejection = ValidationRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidationRejection::Json)?;

        payload
            .validate()
            .map_err(ValidationRejection::Invalid)?;
        Ok(Garde(Json(payload)))
    }
}
