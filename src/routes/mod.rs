use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Router};
use tower_http::trace::TraceLayer;

use crate::{
    handlers::{
        categories::admin_categories_handler,
        headings::admin_headings_handler,
        posts::{admin_posts_handler, posts_handler},
    },
    middleware::{configure_cors, require_api_key},
    AppState,
};

pub fn create_routes(app_state: Arc<AppState>) -> Router {
    let admin_route = Router::new()
        .merge(admin_categories_handler())
        .merge(admin_posts_handler())
        .merge(admin_headings_handler())
        .layer(middleware::from_fn(require_api_key));

    let api_route = Router::new()
        .nest("/blog", posts_handler())
        .nest("/admin/blog", admin_route);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api_route)
        .layer(TraceLayer::new_for_http())
        .layer(configure_cors())
        .layer(Extension(app_state))
}

async fn health() -> &'static str {
    "OK"
}
