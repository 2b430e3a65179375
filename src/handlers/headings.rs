use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Extension, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    models::heading::{CreateHeadingDto, UpdateHeadingDto},
    AppState, Result,
};

use super::extract::{Json, Path};

pub fn admin_headings_handler() -> Router {
    Router::new()
        .route(
            "/posts/{id}/headings/",
            get(list_headings).post(create_heading),
        )
        .route(
            "/headings/{id}/",
            get(get_heading).patch(update_heading).delete(delete_heading),
        )
}

async fn list_headings(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let headings = app_state.headings_service.list_headings(post_id).await?;
    Ok((StatusCode::OK, Json(headings)))
}

async fn create_heading(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
    Json(new_heading): Json<CreateHeadingDto>,
) -> Result<impl IntoResponse> {
    new_heading.validate()?;

    let heading = app_state
        .headings_service
        .create_heading(post_id, new_heading)
        .await?;
    Ok((StatusCode::CREATED, Json(heading)))
}

async fn get_heading(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(heading_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let heading = app_state.headings_service.get_heading(heading_id).await?;
    Ok((StatusCode::OK, Json(heading)))
}

async fn update_heading(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(heading_id): Path<Uuid>,
    Json(changes): Json<UpdateHeadingDto>,
) -> Result<impl IntoResponse> {
    changes.validate()?;

    let heading = app_state
        .headings_service
        .update_heading(heading_id, changes)
        .await?;
    Ok((StatusCode::OK, Json(heading)))
}

async fn delete_heading(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(heading_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    app_state.headings_service.delete_heading(heading_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
