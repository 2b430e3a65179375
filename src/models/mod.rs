pub mod category;
pub mod heading;
pub mod post;
