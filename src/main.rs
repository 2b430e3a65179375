use std::sync::Arc;

use anyhow::Context;
use config::Config;
use media::MediaStorage;
use repositories::PostgresRepo;
use routes::create_routes;
use secrecy::ExposeSecret;
use services::{categories::CategoriesService, headings::HeadingsService, posts::PostsService};
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use self::errors::{Error, Result};

mod config;
mod errors;
mod handlers;
mod media;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod slug;
#[cfg(test)]
mod test_support;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub categories_service: CategoriesService,
    pub posts_service: PostsService,
    pub headings_service: HeadingsService,
}

fn init_tracing(json_logs: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,blog_backend=debug,tower_http=debug"));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::init()?;
    init_tracing(config.json_logs);

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(config.database_url.expose_secret())
        .await
        .context("Failed to connect to the database")?;
    info!("Connection to the database is successful");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let repo = Arc::new(PostgresRepo::new(pool));
    let media = MediaStorage::new(config.media_root.clone());

    let app_state = AppState {
        config: config.clone(),
        categories_service: CategoriesService::new(repo.clone(), media.clone()),
        posts_service: PostsService::new(repo.clone(), media, config.media_url.clone()),
        headings_service: HeadingsService::new(repo.clone(), repo),
    };

    let app = create_routes(Arc::new(app_state));

    let listener = tokio::net::TcpListener::bind(format!("[::]:{}", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    info!(port = config.port, "Listening");

    axum::serve(listener, app).await?;
    Ok(())
}
