//! Identifier helpers: slugs for new objects and helper id parsing

mod platform;
mod slug;

pub use platform::{parse_helper_id, HelperPlatform};
pub use slug::slugify;
