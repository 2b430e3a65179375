//! URL slugs derived from human-readable text.

use unicode_normalization::UnicodeNormalization;

use crate::{Error, Result};

/// Converts `value` into a URL-safe slug.
///
/// Accents are decomposed and dropped along with any other non-ASCII
/// character, the text is lowercased, everything but letters, digits,
/// underscores, hyphens and whitespace is removed, and runs of whitespace or
/// hyphens collapse to a single `-`. Leading and trailing `-`/`_` are
/// stripped. Applying it to its own output returns the same string.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_separator = false;

    for c in value.nfkd().filter(char::is_ascii) {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_separator {
                slug.push('-');
                pending_separator = false;
            }
            slug.push(c);
        } else if c == '-' || c.is_ascii_whitespace() {
            pending_separator = true;
        }
    }

    slug.trim_matches(|c: char| c == '-' || c == '_').to_string()
}

/// Slug for a column limited to `max_len` characters.
pub fn slugify_truncated(value: &str, max_len: usize) -> String {
    let slug = slugify(value);
    if slug.len() <= max_len {
        return slug;
    }
    // slugs are ASCII, byte indexing is safe
    slug[..max_len]
        .trim_end_matches(|c: char| c == '-' || c == '_')
        .to_string()
}

/// An explicitly supplied slug wins; a missing or blank one is derived
/// from `source`.
pub fn slug_or_derive(explicit: Option<&str>, source: &str, max_len: usize) -> String {
    match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) => slug.to_string(),
        None => slugify_truncated(source, max_len),
    }
}

/// Like [`slug_or_derive`], for slugs that must not come out empty.
/// A title made only of symbols or non-Latin script derives to nothing.
pub fn required_slug(explicit: Option<&str>, source: &str, max_len: usize) -> Result<String> {
    let slug = slug_or_derive(explicit, source, max_len);
    if slug.is_empty() {
        return Err(Error::BadRequest("Slug is required".to_string()));
    }
    Ok(slug)
}
