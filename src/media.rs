//! Thumbnail storage.
//!
//! Upload paths are derived from the owner's display field (`title` for
//! posts, `name` for categories), not from its id, so two owners sharing a
//! name share a directory.

use std::path::{Component, Path, PathBuf};

use tokio::fs;
use tracing::info;

use crate::{Error, Result};

/// Width of the `thumbnail` columns.
pub const THUMBNAIL_MAX_LEN: usize = 255;

pub fn post_thumbnail_path(title: &str, filename: &str) -> String {
    format!("blog/{title}/{filename}")
}

pub fn category_thumbnail_path(name: &str, filename: &str) -> String {
    format!("blog_categories/{name}/{filename}")
}

/// Public URL for a stored relative path, each segment percent-encoded.
pub fn media_url(base: &str, path: &str) -> String {
    let encoded = path
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    format!("{base}{encoded}")
}

/// Keeps only the final component of a client-supplied file name.
pub fn clean_filename(filename: &str) -> Result<String> {
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if name.is_empty() || name == "." || name == ".." {
        return Err(Error::BadRequest("Invalid file name".to_string()));
    }
    Ok(name.to_string())
}

/// Rejects a derived path that would not fit the `thumbnail` column.
pub fn ensure_path_fits(path: &str) -> Result<()> {
    if path.chars().count() > THUMBNAIL_MAX_LEN {
        return Err(Error::BadRequest(format!(
            "Thumbnail path must be at most {THUMBNAIL_MAX_LEN} characters"
        )));
    }
    Ok(())
}

/// Rejects bodies that are not a complete image in a format we can decode.
pub fn ensure_image(bytes: &[u8]) -> Result<image::ImageFormat> {
    let invalid = || {
        Error::BadRequest(
            "Upload a valid image. The file you uploaded was either not an image or a corrupted image."
                .to_string(),
        )
    };

    let format = image::guess_format(bytes).map_err(|_| invalid())?;
    image::load_from_memory_with_format(bytes, format).map_err(|_| invalid())?;
    Ok(format)
}

#[derive(Clone, Debug)]
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, relative: &str) -> Result<PathBuf> {
        // `components()` folds away `.` and empty segments, check the raw text too
        let irregular = relative
            .split('/')
            .any(|segment| matches!(segment, "" | "." | ".."));
        let relative = Path::new(relative);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if irregular || escapes {
            return Err(Error::BadRequest(format!(
                "Refusing to store outside the media root: {}",
                relative.display()
            )));
        }
        Ok(self.root.join(relative))
    }

    /// Writes `bytes` at `relative` under the media root, replacing any
    /// existing file there.
    pub async fn save(&self, relative: &str, bytes: &[u8]) -> Result<()> {
        let target = self.resolve(relative)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&target, bytes).await?;

        info!(path = %target.display(), size = bytes.len(), "Stored upload");
        Ok(())
    }
}
