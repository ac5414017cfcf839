use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use log::info;
use std::sync::Arc;

use crate::error::ApiError;
use crate::metrics::{POST_COUNT, REQUEST_TOTAL};
use crate::models::{Post, PostDraft};
use crate::state::AppState;

pub async fn list_posts(State(state): State<Arc<AppState>>) -> Json<Vec<Post>> {
    REQUEST_TOTAL.inc();
    Json(state.posts.list())
}

pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Post>, ApiError> {
    REQUEST_TOTAL.inc();
    state.posts.get(id).map(Json).ok_or(ApiError::PostNotFound(id))
}

pub async fn create_post(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<PostDraft>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    REQUEST_TOTAL.inc();
    draft.validate()?;

    let post = state.posts.create(draft);
    POST_COUNT.set(state.posts.len() as f64);
    info!("created post {}", post.id);

    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(draft): Json<PostDraft>,
) -> Result<Json<Post>, ApiError> {
    REQUEST_TOTAL.inc();
    draft.validate()?;

    state
        .posts
        .update(id, draft)
        .map(Json)
        .ok_or(ApiError::PostNotFound(id))
}

pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    REQUEST_TOTAL.inc();

    if state.posts.delete(id) {
        POST_COUNT.set(state.posts.len() as f64);
        info!("deleted post {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::PostNotFound(id))
    }
}
