//! Rename templates
//!
//! A rename template derives a new item name from an existing one. The
//! `{name}` placeholder is replaced with the current name; `{name <regex>}`
//! first filters the current name through a user-supplied regular expression,
//! keeping the concatenation of its capture groups. Example:
//!
//! ```text
//! migrated_{name Branch_184_(.*)}
//! ```
//!
//! applied to `Branch_184_west` yields `migrated_west`.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{VaultError, VaultResult};

// The placeholder ends at the first closing brace, so the embedded regex
// cannot itself contain '}'.
fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{name(?:\s+(?P<regex>.*?))?\}").expect("valid placeholder pattern")
    })
}

/// A parsed-on-apply rename template.
///
/// Applying the same template to the same name always yields the same
/// output; no state persists across calls.
#[derive(Debug, Clone)]
pub struct NameTemplate {
    template: String,
}

impl NameTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Substitute every `{name}` placeholder with (a filtered form of)
    /// `name`, leaving surrounding template text literal.
    ///
    /// # Errors
    ///
    /// `VaultError::Template` if the template contains no `{name}`
    /// placeholder, or an attached regex does not compile or has no
    /// capturing group.
    pub fn apply(&self, name: &str) -> VaultResult<String> {
        let mut result = String::new();
        let mut last_end = 0;
        let mut substitutions = 0;

        for caps in placeholder_regex().captures_iter(&self.template) {
            let placeholder = match caps.get(0) {
                Some(m) => m,
                None => continue,
            };

            result.push_str(&self.template[last_end..placeholder.start()]);

            let extracted = match caps.name("regex") {
                Some(expr) => filter_name(expr.as_str(), name)?,
                None => name.to_string(),
            };
            result.push_str(&extracted);

            last_end = placeholder.end();
            substitutions += 1;
        }

        if substitutions == 0 {
            return Err(VaultError::Template(
                "template must include {name} variable".into(),
            ));
        }

        result.push_str(&self.template[last_end..]);
        Ok(result)
    }
}

/// Replace every match of `expr` in `name` with the concatenation of its
/// capture groups. No match at all extracts the empty string.
fn filter_name(expr: &str, name: &str) -> VaultResult<String> {
    let filter = Regex::new(expr)
        .map_err(|e| VaultError::Template(format!("invalid name filter '{}': {}", expr, e)))?;

    // captures_len counts the implicit whole-match group
    if filter.captures_len() < 2 {
        return Err(VaultError::Template(
            "regular expression must include at least one capturing group".into(),
        ));
    }

    if filter.find(name).is_none() {
        return Ok(String::new());
    }

    let replaced = filter.replace_all(name, |caps: &regex::Captures| {
        let mut joined = String::new();
        for i in 1..caps.len() {
            if let Some(group) = caps.get(i) {
                joined.push_str(group.as_str());
            }
        }
        joined
    });

    Ok(replaced.into_owned())
}

/// Whether a derived name is acceptable to the controller: 1-128 characters,
/// none of `& < > ! "` or literal space.
///
/// An invalid name is an expected, recoverable outcome, not an error.
pub fn is_valid_item_name(name: &str) -> bool {
    let len = name.chars().count();
    (1..=128).contains(&len)
        && !name
            .chars()
            .any(|c| matches!(c, '&' | '<' | '>' | '!' | '"' | ' '))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_placeholder_is_identity() {
        let template = NameTemplate::new("{name}");
        assert_eq!(template.apply("Branch_A").unwrap(), "Branch_A");
    }

    #[test]
    fn test_literal_text_kept_around_placeholder() {
        let template = NameTemplate::new("migrated_{name}_v2");
        assert_eq!(template.apply("Branch_A").unwrap(), "migrated_Branch_A_v2");
    }

    #[test]
    fn test_regex_filter_strips_prefix() {
        let template = NameTemplate::new("prefix_{name abc(.*)}");
        assert_eq!(template.apply("abcXYZ").unwrap(), "prefix_XYZ");
    }

    #[test]
    fn test_regex_filter_concatenates_groups() {
        let template = NameTemplate::new("prefix_{name (abc)(.*)}");
        assert_eq!(template.apply("abcXYZ").unwrap(), "prefix_abcXYZ");
    }

    #[test]
    fn test_regex_no_match_extracts_empty() {
        let template = NameTemplate::new("prefix_{name abc(.*)}");
        assert_eq!(template.apply("zzz").unwrap(), "prefix_");
    }

    #[test]
    fn test_regex_replaces_within_name() {
        // Text outside the match survives, the match collapses to its groups
        let template = NameTemplate::new("{name Branch_184_(.*)}");
        assert_eq!(template.apply("G_Branch_184_west").unwrap(), "G_west");
    }

    #[test]
    fn test_multiple_placeholders() {
        let template = NameTemplate::new("{name}_copy_of_{name}");
        assert_eq!(template.apply("X").unwrap(), "X_copy_of_X");
    }

    #[test]
    fn test_missing_placeholder_is_error() {
        let template = NameTemplate::new("no_placeholder_here");
        let err = template.apply("Branch_A").unwrap_err();
        assert!(err.is_template());
    }

    #[test]
    fn test_regex_without_group_is_error() {
        let template = NameTemplate::new("{name abc.*}");
        let err = template.apply("abcXYZ").unwrap_err();
        assert!(err.is_template());
    }

    #[test]
    fn test_invalid_regex_is_error() {
        let template = NameTemplate::new("{name ([unclosed}");
        let err = template.apply("whatever").unwrap_err();
        assert!(err.is_template());
    }

    #[test]
    fn test_deterministic() {
        let template = NameTemplate::new("new_{name (B.*)}");
        let first = template.apply("Branch").unwrap();
        let second = template.apply("Branch").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_valid_item_names() {
        assert!(is_valid_item_name("Branch_A"));
        assert!(is_valid_item_name("a"));
        assert!(is_valid_item_name(&"x".repeat(128)));
    }

    #[test]
    fn test_invalid_item_names() {
        assert!(!is_valid_item_name(""));
        assert!(!is_valid_item_name(&"x".repeat(129)));
        assert!(!is_valid_item_name("has space"));
        assert!(!is_valid_item_name("has\"quote"));
        assert!(!is_valid_item_name("a&b"));
        assert!(!is_valid_item_name("a<b"));
        assert!(!is_valid_item_name("a>b"));
        assert!(!is_valid_item_name("a!b"));
    }
}
