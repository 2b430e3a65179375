use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::{
    media::{self, MediaStorage},
    models::post::{
        CreatePostDto, Post, PostDetail, PostFilter, PostOrdering, PostSummary, UpdatePostDto,
        Visibility,
    },
    repositories::posts_repo::PostsRepository,
    slug::required_slug,
    Error, Result,
};

const SLUG_MAX_LEN: usize = 128;

#[derive(Clone)]
pub struct PostsService {
    repo: Arc<dyn PostsRepository>,
    media: MediaStorage,
    media_url: String,
}

impl PostsService {
    pub fn new(repo: Arc<dyn PostsRepository>, media: MediaStorage, media_url: String) -> Self {
        Self {
            repo,
            media,
            media_url,
        }
    }

    pub async fn published_posts(&self) -> Result<Vec<PostSummary>> {
        let posts = self
            .repo
            .list_posts(
                Visibility::Published,
                &PostFilter::default(),
                PostOrdering::StatusThenNewest,
            )
            .await?;

        Ok(posts
            .into_iter()
            .map(|post| PostSummary::from_post(post, &self.media_url))
            .collect())
    }

    /// Drafts and unknown slugs both come back as `NotFound`.
    pub async fn published_post(&self, slug: &str) -> Result<PostDetail> {
        let post = self
            .repo
            .find_post_by_slug(slug, Visibility::Published)
            .await?
            .ok_or(Error::NotFound)?;

        Ok(PostDetail::from_post(post, &self.media_url))
    }

    pub async fn list_posts(&self, filter: &PostFilter) -> Result<Vec<Post>> {
        self.repo
            .list_posts(Visibility::All, filter, PostOrdering::Newest)
            .await
    }

    pub async fn get_post(&self, post_id: Uuid) -> Result<Post> {
        self.repo.get_post(post_id).await?.ok_or(Error::NotFound)
    }

    pub async fn create_post(&self, new_post: CreatePostDto) -> Result<Post> {
        let now = Utc::now();
        let post = Post {
            id: Uuid::now_v7(),
            category_id: new_post.category,
            slug: required_slug(new_post.slug.as_deref(), &new_post.title, SLUG_MAX_LEN)?,
            title: new_post.title,
            description: new_post.description,
            content: new_post.content,
            thumbnail: new_post.thumbnail,
            keywords: new_post.keywords,
            status: new_post.status.unwrap_or_default(),
            created_at: new_post.created_at.unwrap_or(now),
            updated_at: now,
        };

        let post = self.repo.create_post(&post).await?;
        info!(post_id = %post.id, slug = %post.slug, status = ?post.status, "Post created");
        Ok(post)
    }

    pub async fn update_post(&self, post_id: Uuid, changes: UpdatePostDto) -> Result<Post> {
        let mut post = self.get_post(post_id).await?;

        if let Some(category) = changes.category {
            post.category_id = category;
        }
        if let Some(title) = changes.title {
            post.title = title;
        }
        if let Some(description) = changes.description {
            post.description = description;
        }
        if let Some(content) = changes.content {
            post.content = content;
        }
        if let Some(thumbnail) = changes.thumbnail {
            post.thumbnail = thumbnail;
        }
        if let Some(keywords) = changes.keywords {
            post.keywords = keywords;
        }
        if let Some(slug) = changes.slug {
            post.slug = required_slug(Some(slug.as_str()), &post.title, SLUG_MAX_LEN)?;
        }
        if let Some(status) = changes.status {
            post.status = status;
        }

        let post = self
            .repo
            .update_post(&post)
            .await?
            .ok_or(Error::NotFound)?;
        info!(post_id = %post.id, status = ?post.status, "Post updated");
        Ok(post)
    }

    pub async fn delete_post(&self, post_id: Uuid) -> Result<()> {
        if !self.repo.delete_post(post_id).await? {
            return Err(Error::NotFound);
        }
        info!(%post_id, "Post deleted");
        Ok(())
    }

    /// Stores the image under `blog/{title}/{filename}` and points the post
    /// at it.
    pub async fn upload_thumbnail(
        &self,
        post_id: Uuid,
        filename: &str,
        bytes: &[u8],
    ) -> Result<Post> {
        media::ensure_image(bytes)?;
        let filename = media::clean_filename(filename)?;
        let mut post = self.get_post(post_id).await?;

        let path = media::post_thumbnail_path(&post.title, &filename);
        media::ensure_path_fits(&path)?;
        self.media.save(&path, bytes).await?;

        post.thumbnail = path;
        self.repo.update_post(&post).await?.ok_or(Error::NotFound)
    }
}
