use sqlx::PgPool;

pub mod category_repo;
pub mod heading_repo;
#[cfg(test)]
pub mod memory;
pub mod posts_repo;

#[derive(Clone)]
pub struct PostgresRepo {
    pool: PgPool,
}

impl PostgresRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `%term%` for ILIKE with the pattern metacharacters escaped.
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
