//! In-process repository used by tests. It enforces the same uniqueness,
//! restrict and cascade rules as the Postgres schema.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    models::{
        category::{Category, CategoryFilter},
        heading::Heading,
        post::{Post, PostFilter, PostOrdering, Visibility},
    },
    Error, Result,
};

use super::{
    category_repo::CategoryRepository, heading_repo::HeadingRepository,
    posts_repo::PostsRepository,
};

#[derive(Default)]
struct Tables {
    categories: Vec<Category>,
    posts: Vec<Post>,
    headings: Vec<Heading>,
}

#[derive(Clone, Default)]
pub struct InMemoryRepo {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn check_not_blank(slug: &str) -> Result<()> {
    if slug.is_empty() {
        return Err(Error::BadRequest("Slug is required".to_string()));
    }
    Ok(())
}

fn missing_reference(what: &str) -> Error {
    Error::BadRequest(format!("Referenced row does not exist ({what})"))
}

impl Tables {
    fn category_exists(&self, id: Uuid) -> bool {
        self.categories.iter().any(|c| c.id == id)
    }

    fn descendants_of(&self, root: Uuid) -> HashSet<Uuid> {
        let mut ids = HashSet::from([root]);
        loop {
            let before = ids.len();
            for category in &self.categories {
                if category.parent_id.is_some_and(|p| ids.contains(&p)) {
                    ids.insert(category.id);
                }
            }
            if ids.len() == before {
                return ids;
            }
        }
    }

    fn check_post_slug(&self, post: &Post) -> Result<()> {
        check_not_blank(&post.slug)?;
        if self
            .posts
            .iter()
            .any(|p| p.id != post.id && p.slug == post.slug)
        {
            return Err(Error::BadRequest(
                "Post with this slug already exists.".to_string(),
            ));
        }
        Ok(())
    }

    fn check_heading_keys(&self, heading: &Heading) -> Result<()> {
        let siblings = self
            .headings
            .iter()
            .filter(|h| h.post_id == heading.post_id && h.id != heading.id);
        for sibling in siblings {
            if sibling.slug == heading.slug {
                return Err(Error::BadRequest(
                    "Heading with this post and slug already exists.".to_string(),
                ));
            }
            if sibling.order == heading.order {
                return Err(Error::BadRequest(
                    "Heading with this post and order already exists.".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryRepo {
    async fn list_categories(&self, filter: &CategoryFilter) -> Result<Vec<Category>> {
        let search = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let mut categories: Vec<Category> = self
            .tables()
            .categories
            .iter()
            .filter(|c| filter.parent.is_none() || c.parent_id == filter.parent)
            .filter(|c| {
                search.map_or(true, |term| {
                    contains_ci(&c.name, term)
                        || c.title.as_deref().is_some_and(|t| contains_ci(t, term))
                        || c.description.as_deref().is_some_and(|d| contains_ci(d, term))
                        || contains_ci(&c.slug, term)
                })
            })
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn get_category(&self, category_id: Uuid) -> Result<Option<Category>> {
        Ok(self
            .tables()
            .categories
            .iter()
            .find(|c| c.id == category_id)
            .cloned())
    }

    async fn create_category(&self, category: &Category) -> Result<Category> {
        check_not_blank(&category.slug)?;
        let mut tables = self.tables();
        if let Some(parent_id) = category.parent_id {
            if !tables.category_exists(parent_id) {
                return Err(missing_reference("parent"));
            }
        }
        tables.categories.push(category.clone());
        Ok(category.clone())
    }

    async fn update_category(&self, category: &Category) -> Result<Option<Category>> {
        check_not_blank(&category.slug)?;
        let mut tables = self.tables();
        if let Some(parent_id) = category.parent_id {
            if !tables.category_exists(parent_id) {
                return Err(missing_reference("parent"));
            }
        }
        let Some(slot) = tables.categories.iter_mut().find(|c| c.id == category.id) else {
            return Ok(None);
        };
        *slot = category.clone();
        Ok(Some(category.clone()))
    }

    async fn delete_category(&self, category_id: Uuid) -> Result<bool> {
        let mut tables = self.tables();
        if !tables.category_exists(category_id) {
            return Ok(false);
        }
        let doomed = tables.descendants_of(category_id);
        if tables.posts.iter().any(|p| doomed.contains(&p.category_id)) {
            return Err(Error::Conflict(
                "Cannot delete this category because posts still reference it or one of its subcategories."
                    .to_string(),
            ));
        }
        tables.categories.retain(|c| !doomed.contains(&c.id));
        Ok(true)
    }
}

#[async_trait]
impl PostsRepository for InMemoryRepo {
    async fn list_posts(
        &self,
        visibility: Visibility,
        filter: &PostFilter,
        ordering: PostOrdering,
    ) -> Result<Vec<Post>> {
        let search = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let mut posts: Vec<Post> = self
            .tables()
            .posts
            .iter()
            .filter(|p| visibility.admits(p.status))
            .filter(|p| filter.status.map_or(true, |s| p.status == s))
            .filter(|p| filter.category.map_or(true, |c| p.category_id == c))
            .filter(|p| filter.updated_since.map_or(true, |since| p.updated_at >= since))
            .filter(|p| {
                search.map_or(true, |term| {
                    [&p.title, &p.description, &p.content, &p.keywords, &p.slug]
                        .iter()
                        .any(|field| contains_ci(field, term))
                })
            })
            .cloned()
            .collect();

        match ordering {
            PostOrdering::StatusThenNewest => posts.sort_by(|a, b| {
                a.status
                    .cmp(&b.status)
                    .then_with(|| b.created_at.cmp(&a.created_at))
            }),
            PostOrdering::Newest => posts.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }
        Ok(posts)
    }

    async fn find_post_by_slug(&self, slug: &str, visibility: Visibility) -> Result<Option<Post>> {
        Ok(self
            .tables()
            .posts
            .iter()
            .find(|p| p.slug == slug && visibility.admits(p.status))
            .cloned())
    }

    async fn get_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        Ok(self.tables().posts.iter().find(|p| p.id == post_id).cloned())
    }

    async fn create_post(&self, post: &Post) -> Result<Post> {
        let mut tables = self.tables();
        if !tables.category_exists(post.category_id) {
            return Err(missing_reference("category"));
        }
        tables.check_post_slug(post)?;

        let mut stored = post.clone();
        stored.updated_at = Utc::now();
        tables.posts.push(stored.clone());
        Ok(stored)
    }

    async fn update_post(&self, post: &Post) -> Result<Option<Post>> {
        let mut tables = self.tables();
        if !tables.category_exists(post.category_id) {
            return Err(missing_reference("category"));
        }
        tables.check_post_slug(post)?;

        let Some(slot) = tables.posts.iter_mut().find(|p| p.id == post.id) else {
            return Ok(None);
        };
        let created_at = slot.created_at;
        *slot = Post {
            created_at,
            updated_at: Utc::now(),
            ..post.clone()
        };
        Ok(Some(slot.clone()))
    }

    async fn delete_post(&self, post_id: Uuid) -> Result<bool> {
        let mut tables = self.tables();
        if tables.headings.iter().any(|h| h.post_id == post_id) {
            return Err(Error::Conflict(
                "Cannot delete this post because headings still reference it.".to_string(),
            ));
        }
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != post_id);
        Ok(tables.posts.len() < before)
    }
}

#[async_trait]
impl HeadingRepository for InMemoryRepo {
    async fn list_headings(&self, post_id: Uuid) -> Result<Vec<Heading>> {
        let mut headings: Vec<Heading> = self
            .tables()
            .headings
            .iter()
            .filter(|h| h.post_id == post_id)
            .cloned()
            .collect();
        headings.sort_by_key(|h| h.order);
        Ok(headings)
    }

    async fn get_heading(&self, heading_id: Uuid) -> Result<Option<Heading>> {
        Ok(self
            .tables()
            .headings
            .iter()
            .find(|h| h.id == heading_id)
            .cloned())
    }

    async fn create_heading(&self, heading: &Heading) -> Result<Heading> {
        let mut tables = self.tables();
        if !tables.posts.iter().any(|p| p.id == heading.post_id) {
            return Err(missing_reference("post"));
        }
        tables.check_heading_keys(heading)?;
        tables.headings.push(heading.clone());
        Ok(heading.clone())
    }

    async fn update_heading(&self, heading: &Heading) -> Result<Option<Heading>> {
        let mut tables = self.tables();
        tables.check_heading_keys(heading)?;
        let Some(slot) = tables.headings.iter_mut().find(|h| h.id == heading.id) else {
            return Ok(None);
        };
        *slot = heading.clone();
        Ok(Some(heading.clone()))
    }

    async fn delete_heading(&self, heading_id: Uuid) -> Result<bool> {
        let mut tables = self.tables();
        let before = tables.headings.len();
        tables.headings.retain(|h| h.id != heading_id);
        Ok(tables.headings.len() < before)
    }
}
