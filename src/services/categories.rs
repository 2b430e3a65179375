use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::{
    media::{self, MediaStorage},
    models::category::{Category, CategoryDto, CategoryFilter},
    repositories::category_repo::CategoryRepository,
    slug::required_slug,
    Error, Result,
};

const SLUG_MAX_LEN: usize = 128;

#[derive(Clone)]
pub struct CategoriesService {
    repo: Arc<dyn CategoryRepository>,
    media: MediaStorage,
}

impl CategoriesService {
    pub fn new(repo: Arc<dyn CategoryRepository>, media: MediaStorage) -> Self {
        Self { repo, media }
    }

    pub async fn list_categories(&self, filter: &CategoryFilter) -> Result<Vec<Category>> {
        self.repo.list_categories(filter).await
    }

    pub async fn get_category(&self, category_id: Uuid) -> Result<Category> {
        self.repo
            .get_category(category_id)
            .await?
            .ok_or(Error::NotFound)
    }

    pub async fn create_category(&self, new_category: CategoryDto) -> Result<Category> {
        let category = Category {
            id: Uuid::now_v7(),
            parent_id: new_category.parent,
            slug: required_slug(new_category.slug.as_deref(), &new_category.name, SLUG_MAX_LEN)?,
            name: new_category.name,
            title: new_category.title,
            description: new_category.description,
            thumbnail: None,
        };

        let category = self.repo.create_category(&category).await?;
        info!(category_id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    /// Replaces every editable field. The stored thumbnail is kept.
    pub async fn replace_category(
        &self,
        category_id: Uuid,
        replacement: CategoryDto,
    ) -> Result<Category> {
        let existing = self.get_category(category_id).await?;

        let category = Category {
            id: existing.id,
            parent_id: replacement.parent,
            slug: required_slug(replacement.slug.as_deref(), &replacement.name, SLUG_MAX_LEN)?,
            name: replacement.name,
            title: replacement.title,
            description: replacement.description,
            thumbnail: existing.thumbnail,
        };

        self.repo
            .update_category(&category)
            .await?
            .ok_or(Error::NotFound)
    }

    /// Child categories go with their parent.
    pub async fn delete_category(&self, category_id: Uuid) -> Result<()> {
        if !self.repo.delete_category(category_id).await? {
            return Err(Error::NotFound);
        }
        info!(%category_id, "Category deleted with its subcategories");
        Ok(())
    }

    /// Stores the image under `blog_categories/{name}/{filename}`.
    pub async fn upload_thumbnail(
        &self,
        category_id: Uuid,
        filename: &str,
        bytes: &[u8],
    ) -> Result<Category> {
        media::ensure_image(bytes)?;
        let filename = media::clean_filename(filename)?;
        let mut category = self.get_category(category_id).await?;

        let path = media::category_thumbnail_path(&category.name, &filename);
        media::ensure_path_fits(&path)?;
        self.media.save(&path, bytes).await?;

        category.thumbnail = Some(path);
        self.repo
            .update_category(&category)
            .await?
            .ok_or(Error::NotFound)
    }
}
