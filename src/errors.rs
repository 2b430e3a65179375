use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::error::ErrorKind;
use tracing::{error, warn};
use validator::ValidationErrors;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Resource not found")]
    NotFound,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),
    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Maps a foreign-key violation raised by a DELETE to `Conflict`.
    /// Used where a restrict-on-delete reference blocks the write.
    pub fn protected(err: sqlx::Error, message: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if matches!(db_err.kind(), ErrorKind::ForeignKeyViolation) {
                warn!(constraint = ?db_err.constraint(), "Delete blocked: {}", message);
                return Self::Conflict(message.to_string());
            }
        }

        err.into()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Self::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ),
            Self::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Storage error".to_string(),
            ),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or_default();
            match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    return Self::BadRequest(unique_violation_message(constraint).to_string());
                }
                ErrorKind::ForeignKeyViolation => {
                    return Self::BadRequest(format!(
                        "Referenced row does not exist ({constraint})"
                    ));
                }
                ErrorKind::CheckViolation => {
                    return Self::BadRequest(check_violation_message(constraint));
                }
                _ => {}
            }
            // 22001: value too long for the column
            if db_err.code().as_deref() == Some("22001") {
                return Self::BadRequest("Value exceeds the maximum length".to_string());
            }
        }

        error!("Database error: {:?}", err);
        Self::DatabaseError(err)
    }
}

impl From<ValidationErrors> for Error {
    fn from(err: ValidationErrors) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

fn check_violation_message(constraint: &str) -> String {
    match constraint {
        "blog_posts_slug_not_blank" | "blog_categories_slug_not_blank" => {
            "Slug is required".to_string()
        }
        _ => format!("Invalid value ({constraint})"),
    }
}

fn unique_violation_message(constraint: &str) -> &'static str {
    match constraint {
        "blog_posts_slug_key" => "Post with this slug already exists.",
        "blog_headings_post_slug_key" => "Heading with this post and slug already exists.",
        "blog_headings_post_order_key" => "Heading with this post and order already exists.",
        _ => "Duplicate value.",
    }
}
