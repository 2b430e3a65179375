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
    models::category::{CategoryDto, CategoryFilter},
    AppState, Result,
};

use super::{
    extract::{Json, Path, Query},
    UPLOAD_LIMIT,
};

pub fn admin_categories_handler() -> Router {
    Router::new()
        .route("/categories/", get(list_categories).post(create_category))
        .route(
            "/categories/{id}/",
            get(get_category)
                .put(replace_category)
                .delete(delete_category),
        )
        .route(
            "/categories/{id}/thumbnail/{filename}",
            put(upload_thumbnail).layer(DefaultBodyLimit::max(UPLOAD_LIMIT)),
        )
}

async fn list_categories(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(filter): Query<CategoryFilter>,
) -> Result<impl IntoResponse> {
    let categories = app_state.categories_service.list_categories(&filter).await?;
    Ok((StatusCode::OK, Json(categories)))
}

async fn get_category(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(category_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let category = app_state.categories_service.get_category(category_id).await?;
    Ok((StatusCode::OK, Json(category)))
}

async fn create_category(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(new_category): Json<CategoryDto>,
) -> Result<impl IntoResponse> {
    new_category.validate()?;

    let category = app_state
        .categories_service
        .create_category(new_category)
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

async fn replace_category(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(category_id): Path<Uuid>,
    Json(replacement): Json<CategoryDto>,
) -> Result<impl IntoResponse> {
    replacement.validate()?;

    let category = app_state
        .categories_service
        .replace_category(category_id, replacement)
        .await?;
    Ok((StatusCode::OK, Json(category)))
}

async fn delete_category(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(category_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    app_state
        .categories_service
        .delete_category(category_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn upload_thumbnail(
    Extension(app_state): Extension<Arc<AppState>>,
    Path((category_id, filename)): Path<(Uuid, String)>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let category = app_state
        .categories_service
        .upload_thumbnail(category_id, &filename, &body)
        .await?;
    Ok((StatusCode::OK, Json(category)))
}
