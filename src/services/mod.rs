pub mod categories;
pub mod headings;
pub mod posts;
