//! Remote API collaborator seam
//!
//! The actual HTTP transport lives outside this crate. Model code only sees
//! the [`RestClient`] trait and the per-operation URL paths grouped in a
//! [`ResourcePath`].

use serde_json::Value;
use thiserror::Error;

/// Error raised by the transport collaborator.
///
/// Model-level fetch helpers either propagate it (`fetch_required`) or
/// swallow it into `None` (`fetch`).
#[derive(Error, Debug, Clone)]
pub enum TransportError {
    /// The controller answered with a non-success HTTP status
    #[error("HTTP status {status}: {message}")]
    Status { status: u16, message: String },

    /// The request never completed (connection, TLS, timeout, ...)
    #[error("{0}")]
    Connection(String),
}

/// Remote controller API abstraction.
///
/// `path_args` fill positional segments the transport appends to `path`.
pub trait RestClient {
    fn get(&self, path: &str, path_args: &[&str]) -> Result<Value, TransportError>;
}

/// Groups the URL paths for the operations available on an API resource.
///
/// A verb not supplied falls back to the last path that was: with no extra
/// paths every verb uses the get path, with one extra path create, update and
/// delete all share it, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourcePath {
    pub get: &'static str,
    pub create: &'static str,
    pub update: &'static str,
    pub delete: &'static str,
}

impl ResourcePath {
    /// Build a path set from the get path plus further paths in
    /// create, update, delete order.
    pub const fn new(get: &'static str, other_ops: &'static [&'static str]) -> Self {
        let last = if other_ops.is_empty() {
            get
        } else {
            other_ops[other_ops.len() - 1]
        };
        Self {
            get,
            create: if !other_ops.is_empty() { other_ops[0] } else { last },
            update: if other_ops.len() > 1 { other_ops[1] } else { last },
            delete: if other_ops.len() > 2 { other_ops[2] } else { last },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_only_defaults_all_verbs() {
        let path = ResourcePath::new("template/device", &[]);
        assert_eq!(path.get, "template/device");
        assert_eq!(path.create, "template/device");
        assert_eq!(path.update, "template/device");
        assert_eq!(path.delete, "template/device");
    }

    #[test]
    fn test_single_extra_path_shared_by_later_verbs() {
        let path = ResourcePath::new("template/device/object", &["template/device"]);
        assert_eq!(path.get, "template/device/object");
        assert_eq!(path.create, "template/device");
        assert_eq!(path.update, "template/device");
        assert_eq!(path.delete, "template/device");
    }

    #[test]
    fn test_two_extra_paths_fill_delete_from_update() {
        let path = ResourcePath::new("a", &["b", "c"]);
        assert_eq!(path.create, "b");
        assert_eq!(path.update, "c");
        assert_eq!(path.delete, "c");
    }

    #[test]
    fn test_all_verbs_explicit() {
        let path = ResourcePath::new("a", &["b", "c", "d"]);
        assert_eq!(path.get, "a");
        assert_eq!(path.create, "b");
        assert_eq!(path.update, "c");
        assert_eq!(path.delete, "d");
    }

    #[test]
    fn test_usable_in_const_context() {
        static PATH: ResourcePath = ResourcePath::new("x", &["y"]);
        assert_eq!(PATH.delete, "y");
    }
}
