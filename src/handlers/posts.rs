use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Extension, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    models::post::{CreatePostDto, PostFilter, UpdatePostDto},
    AppState, Result,
};

use super::{
    extract::{Json, Path, Query},
    UPLOAD_LIMIT,
};

/// Public, read-only routes. Only published posts are reachable here.
pub fn posts_handler() -> Router {
    Router::new()
        .route("/posts/", get(list_published_posts))
        .route("/post/{slug}/", get(get_published_post))
}

pub fn admin_posts_handler() -> Router {
    Router::new()
        .route("/posts/", get(list_posts).post(create_post))
        .route(
            "/posts/{id}/",
            get(get_post).patch(update_post).delete(delete_post),
        )
        .route(
            "/posts/{id}/thumbnail/{filename}",
            put(upload_thumbnail).layer(DefaultBodyLimit::max(UPLOAD_LIMIT)),
        )
}

async fn list_published_posts(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse> {
    let posts = app_state.posts_service.published_posts().await?;
    Ok((StatusCode::OK, Json(posts)))
}

async fn get_published_post(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let post = app_state.posts_service.published_post(&slug).await?;
    Ok((StatusCode::OK, Json(post)))
}

async fn list_posts(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(filter): Query<PostFilter>,
) -> Result<impl IntoResponse> {
    let posts = app_state.posts_service.list_posts(&filter).await?;
    Ok((StatusCode::OK, Json(posts)))
}

async fn get_post(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let post = app_state.posts_service.get_post(post_id).await?;
    Ok((StatusCode::OK, Json(post)))
}

async fn create_post(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(new_post): Json<CreatePostDto>,
) -> Result<impl IntoResponse> {
    new_post.validate()?;

    let post = app_state.posts_service.create_post(new_post).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

async fn update_post(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
    Json(changes): Json<UpdatePostDto>,
) -> Result<impl IntoResponse> {
    changes.validate()?;

    let post = app_state
        .posts_service
        .update_post(post_id, changes)
        .await?;
    Ok((StatusCode::OK, Json(post)))
}

async fn delete_post(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    app_state.posts_service.delete_post(post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn upload_thumbnail(
    Extension(app_state): Extension<Arc<AppState>>,
    Path((post_id, filename)): Path<(Uuid, String)>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let post = app_state
        .posts_service
        .upload_thumbnail(post_id, &filename, &body)
        .await?;
    Ok((StatusCode::OK, Json(post)))
}
