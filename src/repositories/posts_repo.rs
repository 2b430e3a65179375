use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::{
    models::post::{Post, PostFilter, PostOrdering, Visibility},
    Error, Result,
};

use super::{like_pattern, PostgresRepo};

const POST_COLUMNS: &str = "id, category_id, title, description, content, thumbnail, keywords, \
                            slug, status, created_at, updated_at";

#[async_trait]
pub trait PostsRepository: Sync + Send {
    async fn list_posts(
        &self,
        visibility: Visibility,
        filter: &PostFilter,
        ordering: PostOrdering,
    ) -> Result<Vec<Post>>;
    async fn find_post_by_slug(&self, slug: &str, visibility: Visibility) -> Result<Option<Post>>;
    async fn get_post(&self, post_id: Uuid) -> Result<Option<Post>>;
    async fn create_post(&self, post: &Post) -> Result<Post>;
    /// Persists every editable column and stamps `updated_at`.
    /// `created_at` is left untouched.
    async fn update_post(&self, post: &Post) -> Result<Option<Post>>;
    async fn delete_post(&self, post_id: Uuid) -> Result<bool>;
}

fn push_visibility(query: &mut QueryBuilder<'_, Postgres>, visibility: Visibility) {
    match visibility {
        Visibility::Published => {
            query.push(" AND status = 'published'");
        }
        Visibility::All => {}
    }
}

#[async_trait]
impl PostsRepository for PostgresRepo {
    #[instrument(skip(self))]
    async fn list_posts(
        &self,
        visibility: Visibility,
        filter: &PostFilter,
        ordering: PostOrdering,
    ) -> Result<Vec<Post>> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {POST_COLUMNS} FROM blog_posts WHERE TRUE"));

        push_visibility(&mut query, visibility);

        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status);
        }
        if let Some(category_id) = filter.category {
            query.push(" AND category_id = ").push_bind(category_id);
        }
        if let Some(since) = filter.updated_since {
            query.push(" AND updated_at >= ").push_bind(since);
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = like_pattern(search.trim());
            query.push(" AND (");
            let mut columns = query.separated(" OR ");
            for column in ["title", "description", "content", "keywords", "slug"] {
                columns
                    .push(format!("{column} ILIKE "))
                    .push_bind_unseparated(pattern.clone());
            }
            query.push(")");
        }

        query.push(match ordering {
            PostOrdering::StatusThenNewest => " ORDER BY status ASC, created_at DESC",
            PostOrdering::Newest => " ORDER BY created_at DESC",
        });

        let posts = query.build_query_as::<Post>().fetch_all(&self.pool).await?;

        debug!(count = posts.len(), "Listed posts");
        Ok(posts)
    }

    #[instrument(skip(self))]
    async fn find_post_by_slug(&self, slug: &str, visibility: Visibility) -> Result<Option<Post>> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {POST_COLUMNS} FROM blog_posts WHERE slug = "));
        query.push_bind(slug);
        push_visibility(&mut query, visibility);

        let post = query
            .build_query_as::<Post>()
            .fetch_optional(&self.pool)
            .await?;

        debug!(found = post.is_some(), "Post lookup by slug");
        Ok(post)
    }

    async fn get_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM blog_posts WHERE id = $1"
        ))
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn create_post(&self, post: &Post) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            INSERT INTO blog_posts
                (id, category_id, title, description, content, thumbnail, keywords, slug, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW())
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(post.id)
        .bind(post.category_id)
        .bind(&post.title)
        .bind(&post.description)
        .bind(&post.content)
        .bind(&post.thumbnail)
        .bind(&post.keywords)
        .bind(&post.slug)
        .bind(post.status)
        .bind(post.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    async fn update_post(&self, post: &Post) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            UPDATE blog_posts
            SET category_id = $2,
                title = $3,
                description = $4,
                content = $5,
                thumbnail = $6,
                keywords = $7,
                slug = $8,
                status = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(post.id)
        .bind(post.category_id)
        .bind(&post.title)
        .bind(&post.description)
        .bind(&post.content)
        .bind(&post.thumbnail)
        .bind(&post.keywords)
        .bind(&post.slug)
        .bind(post.status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn delete_post(&self, post_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(post_id)
            .execute(&self.pool)
            .await
            .map_err(|err| {
                Error::protected(
                    err,
                    "Cannot delete this post because headings still reference it.",
                )
            })?;

        Ok(result.rows_affected() > 0)
    }
}
