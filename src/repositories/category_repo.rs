use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::{
    models::category::{Category, CategoryFilter},
    Error, Result,
};

use super::{like_pattern, PostgresRepo};

const CATEGORY_COLUMNS: &str = "id, parent_id, name, title, description, thumbnail, slug";

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list_categories(&self, filter: &CategoryFilter) -> Result<Vec<Category>>;
    async fn get_category(&self, category_id: Uuid) -> Result<Option<Category>>;
    async fn create_category(&self, category: &Category) -> Result<Category>;
    async fn update_category(&self, category: &Category) -> Result<Option<Category>>;
    /// Removes the category and, through the parent reference, all of its
    /// descendants. Fails with `Conflict` while any of them owns posts.
    async fn delete_category(&self, category_id: Uuid) -> Result<bool>;
}

#[async_trait]
impl CategoryRepository for PostgresRepo {
    #[instrument(skip(self))]
    async fn list_categories(&self, filter: &CategoryFilter) -> Result<Vec<Category>> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {CATEGORY_COLUMNS} FROM blog_categories WHERE TRUE"
        ));

        if let Some(parent_id) = filter.parent {
            query.push(" AND parent_id = ").push_bind(parent_id);
        }

        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = like_pattern(search.trim());
            query.push(" AND (");
            let mut columns = query.separated(" OR ");
            for column in ["name", "title", "description", "slug"] {
                columns
                    .push(format!("{column} ILIKE "))
                    .push_bind_unseparated(pattern.clone());
            }
            query.push(")");
        }

        query.push(" ORDER BY name ASC");

        let categories = query
            .build_query_as::<Category>()
            .fetch_all(&self.pool)
            .await?;

        debug!(count = categories.len(), "Listed categories");
        Ok(categories)
    }

    async fn get_category(&self, category_id: Uuid) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM blog_categories WHERE id = $1"
        ))
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn create_category(&self, category: &Category) -> Result<Category> {
        let category = sqlx::query_as::<_, Category>(&format!(
            r#"
            INSERT INTO blog_categories (id, parent_id, name, title, description, thumbnail, slug)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(category.id)
        .bind(category.parent_id)
        .bind(&category.name)
        .bind(&category.title)
        .bind(&category.description)
        .bind(&category.thumbnail)
        .bind(&category.slug)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    async fn update_category(&self, category: &Category) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(&format!(
            r#"
            UPDATE blog_categories
            SET parent_id = $2,
                name = $3,
                title = $4,
                description = $5,
                thumbnail = $6,
                slug = $7
            WHERE id = $1
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(category.id)
        .bind(category.parent_id)
        .bind(&category.name)
        .bind(&category.title)
        .bind(&category.description)
        .bind(&category.thumbnail)
        .bind(&category.slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn delete_category(&self, category_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM blog_categories WHERE id = $1")
            .bind(category_id)
            .execute(&self.pool)
            .await
            .map_err(|err| {
                Error::protected(
                    err,
                    "Cannot delete this category because posts still reference it or one of its subcategories.",
                )
            })?;

        Ok(result.rows_affected() > 0)
    }
}
