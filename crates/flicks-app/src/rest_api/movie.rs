use crate::error::{ApiError, ApiResult};
use crate::repository_from_request;
use crate::state::AppState;
use crate::validate::Garde;
use flicks_dal::movie::{CreateMovie, MovieRepository, UpdateMovie};

use axum::extract::{Path, Query};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;
use http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

repository_from_request!(MovieRepository);

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    genre: Option<String>,
}

/// Route parameters are plain strings; anything that is not a UUID cannot
/// name a stored movie, so it maps to not-found rather than bad-request.
fn parse_movie_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::try_parse(raw).map_err(|_| ApiError::RecordNotFound)
}

pub async fn list(
    repository: MovieRepository,
    Query(query): Query<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    let movies = repository.list(query.genre.as_deref())?;
    Ok((StatusCode::OK, Json(movies)))
}

pub async fn get_one(
    Path(id): Path<String>,
    repository: MovieRepository,
) -> ApiResult<impl IntoResponse> {
    let record = repository.get(parse_movie_id(&id)?)?;

    Ok((StatusCode::OK, Json(record)))
}

pub async fn create(
    repository: MovieRepository,
    Garde(Json(payload)): Garde<Json<CreateMovie>>,
) -> ApiResult<impl IntoResponse> {
    let record = repository.create(payload)?;

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update(
    Path(id): Path<String>,
    repository: MovieRepository,
    Garde(Json(payload)): Garde<Json<UpdateMovie>>,
) -> ApiResult<impl IntoResponse> {
    let record = repository.update(parse_movie_id(&id)?, payload)?;

    Ok((StatusCode::OK, Json(record)))
}

pub async fn delete(
    Path(id): Path<String>,
    repository: MovieRepository,
) -> ApiResult<impl IntoResponse> {
    repository.delete(parse_movie_id(&id)?)?;

    Ok((StatusCode::NO_CONTENT, ()))
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).patch(update).delete(delete))
}
