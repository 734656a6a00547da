//! Filesystem-safe item names
//!
//! Display names on the controller are free-form; the local store derives
//! filenames from them. The lowercased variant feeds collision detection
//! across an index.

use std::sync::OnceLock;

use regex::Regex;

fn unsafe_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s-]").expect("valid unsafe-chars pattern"))
}

/// Replace every character in `name` that is not a word character,
/// whitespace, or hyphen with `_`. Lowercase the result if `lower`.
///
/// Pure and total; applying it twice yields the same string.
pub fn filename_safe(name: &str, lower: bool) -> String {
    let cleaned = unsafe_chars().replace_all(name, "_");
    if lower {
        cleaned.to_lowercase()
    } else {
        cleaned.into_owned()
    }
}
