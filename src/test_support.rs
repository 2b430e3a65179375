use std::{io::Cursor, path::Path, sync::Arc};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use crate::{
    config::Config,
    media::MediaStorage,
    middleware::API_KEY_HEADER,
    models::{
        category::{Category, CategoryDto},
        post::{CreatePostDto, Post, PostStatus},
    },
    repositories::memory::InMemoryRepo,
    routes::create_routes,
    services::{categories::CategoriesService, headings::HeadingsService, posts::PostsService},
    AppState,
};

/// A complete 1x1 PNG.
pub fn png_bytes() -> Vec<u8> {
    let pixel = image::RgbImage::from_pixel(1, 1, image::Rgb([200, 80, 40]));
    let mut bytes = Cursor::new(Vec::new());
    pixel.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
    bytes.into_inner()
}

const API_KEY: &str = "test-admin-key";

pub fn new_post(category_id: Uuid, title: &str) -> CreatePostDto {
    CreatePostDto {
        category: category_id,
        title: title.to_string(),
        description: format!("About {title}"),
        content: format!("Body of {title}"),
        thumbnail: format!("blog/{title}/cover.png"),
        keywords: "rust".to_string(),
        slug: None,
        status: None,
        created_at: None,
    }
}

pub struct TestContext {
    pub state: AppState,
    media: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        let media = tempfile::tempdir().unwrap();
        let repo = Arc::new(InMemoryRepo::new());
        let storage = MediaStorage::new(media.path());
        let config = Config {
            database_url: SecretString::from("postgres://unused"),
            max_connections: 1,
            port: 0,
            admin_api_key: SecretString::from(API_KEY),
            media_root: media.path().to_path_buf(),
            media_url: "/media/".to_string(),
            json_logs: false,
        };

        let state = AppState {
            categories_service: CategoriesService::new(repo.clone(), storage.clone()),
            posts_service: PostsService::new(repo.clone(), storage, config.media_url.clone()),
            headings_service: HeadingsService::new(repo.clone(), repo),
            config,
        };

        Self { state, media }
    }

    pub fn media_root(&self) -> &Path {
        self.media.path()
    }

    pub async fn category(&self, name: &str) -> Category {
        self.state
            .categories_service
            .create_category(CategoryDto {
                name: name.to_string(),
                ..Default::default()
            })
            .await
            .unwrap()
    }

    pub async fn published(&self, category_id: Uuid, title: &str, created_at: DateTime<Utc>) -> Post {
        self.state
            .posts_service
            .create_post(CreatePostDto {
                status: Some(PostStatus::Published),
                created_at: Some(created_at),
                ..new_post(category_id, title)
            })
            .await
            .unwrap()
    }

    fn router(&self) -> Router {
        create_routes(Arc::new(self.state.clone()))
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn admin(&self, method: Method, uri: &str, json: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(API_KEY_HEADER, API_KEY);
        let request = match json {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn upload(&self, uri: &str, bytes: Vec<u8>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::PUT)
            .uri(uri)
            .header(API_KEY_HEADER, API_KEY)
            .header(header::CONTENT_TYPE, "image/png")
            .body(Body::from(bytes))
            .unwrap();
        self.send(request).await
    }
}
