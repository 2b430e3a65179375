use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::{
    models::heading::{CreateHeadingDto, Heading, UpdateHeadingDto},
    repositories::{heading_repo::HeadingRepository, posts_repo::PostsRepository},
    slug::slug_or_derive,
    Error, Result,
};

const SLUG_MAX_LEN: usize = 255;

#[derive(Clone)]
pub struct HeadingsService {
    repo: Arc<dyn HeadingRepository>,
    posts: Arc<dyn PostsRepository>,
}

impl HeadingsService {
    pub fn new(repo: Arc<dyn HeadingRepository>, posts: Arc<dyn PostsRepository>) -> Self {
        Self { repo, posts }
    }

    async fn ensure_post(&self, post_id: Uuid) -> Result<()> {
        self.posts
            .get_post(post_id)
            .await?
            .map(|_| ())
            .ok_or(Error::NotFound)
    }

    pub async fn list_headings(&self, post_id: Uuid) -> Result<Vec<Heading>> {
        self.ensure_post(post_id).await?;
        self.repo.list_headings(post_id).await
    }

    pub async fn get_heading(&self, heading_id: Uuid) -> Result<Heading> {
        self.repo
            .get_heading(heading_id)
            .await?
            .ok_or(Error::NotFound)
    }

    /// A blank slug is derived from the title. Collisions are not renamed;
    /// they fail on the (post, slug) key.
    pub async fn create_heading(&self, post_id: Uuid, new_heading: CreateHeadingDto) -> Result<Heading> {
        self.ensure_post(post_id).await?;

        let heading = Heading {
            id: Uuid::now_v7(),
            post_id,
            slug: slug_or_derive(new_heading.slug.as_deref(), &new_heading.title, SLUG_MAX_LEN),
            title: new_heading.title,
            level: new_heading.level,
            order: new_heading.order,
        };

        let heading = self.repo.create_heading(&heading).await?;
        info!(heading_id = %heading.id, %post_id, slug = %heading.slug, "Heading created");
        Ok(heading)
    }

    pub async fn update_heading(
        &self,
        heading_id: Uuid,
        changes: UpdateHeadingDto,
    ) -> Result<Heading> {
        let mut heading = self.get_heading(heading_id).await?;

        if let Some(title) = changes.title {
            heading.title = title;
        }
        if let Some(slug) = changes.slug {
            heading.slug = slug;
        }
        if let Some(level) = changes.level {
            heading.level = level;
        }
        if let Some(order) = changes.order {
            heading.order = order;
        }
        heading.slug = slug_or_derive(Some(heading.slug.as_str()), &heading.title, SLUG_MAX_LEN);

        self.repo
            .update_heading(&heading)
            .await?
            .ok_or(Error::NotFound)
    }

    pub async fn delete_heading(&self, heading_id: Uuid) -> Result<()> {
        if !self.repo.delete_heading(heading_id).await? {
            return Err(Error::NotFound);
        }
        info!(%heading_id, "Heading deleted");
        Ok(())
    }
}
