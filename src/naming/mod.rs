//! Item naming: filesystem-safe names and rename templating

pub mod sanitize;
pub mod template;

pub use sanitize::filename_safe;
pub use template::{is_valid_item_name, NameTemplate};
