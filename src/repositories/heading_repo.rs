use async_trait::async_trait;
use uuid::Uuid;

use crate::{models::heading::Heading, Result};

use super::PostgresRepo;

const HEADING_COLUMNS: &str = r#"id, post_id, title, slug, level, "order""#;

#[async_trait]
pub trait HeadingRepository: Send + Sync {
    async fn list_headings(&self, post_id: Uuid) -> Result<Vec<Heading>>;
    async fn get_heading(&self, heading_id: Uuid) -> Result<Option<Heading>>;
    async fn create_heading(&self, heading: &Heading) -> Result<Heading>;
    async fn update_heading(&self, heading: &Heading) -> Result<Option<Heading>>;
    async fn delete_heading(&self, heading_id: Uuid) -> Result<bool>;
}

#[async_trait]
impl HeadingRepository for PostgresRepo {
    async fn list_headings(&self, post_id: Uuid) -> Result<Vec<Heading>> {
        let headings = sqlx::query_as::<_, Heading>(&format!(
            r#"
            SELECT {HEADING_COLUMNS}
            FROM blog_headings
            WHERE post_id = $1
            ORDER BY "order" ASC
            "#
        ))
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(headings)
    }

    async fn get_heading(&self, heading_id: Uuid) -> Result<Option<Heading>> {
        let heading = sqlx::query_as::<_, Heading>(&format!(
            "SELECT {HEADING_COLUMNS} FROM blog_headings WHERE id = $1"
        ))
        .bind(heading_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(heading)
    }

    async fn create_heading(&self, heading: &Heading) -> Result<Heading> {
        let heading = sqlx::query_as::<_, Heading>(&format!(
            r#"
            INSERT INTO blog_headings (id, post_id, title, slug, level, "order")
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {HEADING_COLUMNS}
            "#
        ))
        .bind(heading.id)
        .bind(heading.post_id)
        .bind(&heading.title)
        .bind(&heading.slug)
        .bind(heading.level)
        .bind(heading.order)
        .fetch_one(&self.pool)
        .await?;

        Ok(heading)
    }

    async fn update_heading(&self, heading: &Heading) -> Result<Option<Heading>> {
        let heading = sqlx::query_as::<_, Heading>(&format!(
            r#"
            UPDATE blog_headings
            SET title = $2,
                slug = $3,
                level = $4,
                "order" = $5
            WHERE id = $1
            RETURNING {HEADING_COLUMNS}
            "#
        ))
        .bind(heading.id)
        .bind(&heading.title)
        .bind(&heading.slug)
        .bind(heading.level)
        .bind(heading.order)
        .fetch_optional(&self.pool)
        .await?;

        Ok(heading)
    }

    async fn delete_heading(&self, heading_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM blog_headings WHERE id = $1")
            .bind(heading_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
