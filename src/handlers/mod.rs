pub mod categories;
mod extract;
pub mod headings;
pub mod posts;

/// Upper bound for raw thumbnail bodies.
pub const UPLOAD_LIMIT: usize = 10 * 1024 * 1024;
