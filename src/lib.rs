//! netvault - local modeling layer for controller backup/restore automation
//!
//! This library represents remote configuration objects (templates,
//! policies, device settings) fetched from a REST-based network controller,
//! persists them to a local file-backed store, and supports re-creating
//! them, with identifier remapping and renaming, against the same or a
//! different controller instance.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `api`: the remote API collaborator seam (trait + per-verb paths)
//! - `config`: data store root and node directory resolution
//! - `error`: custom error types
//! - `models`: resource descriptors, items, indexes, id rewriting
//! - `naming`: filesystem-safe names and rename templating
//! - `storage`: JSON file storage layer
//!
//! Transport, authentication, CLI handling, and workflow sequencing live in
//! the surrounding application, not here.
//!
//! # Example
//!
//! ```rust,ignore
//! use netvault::config::StorePaths;
//! use netvault::models::{catalog, ConfigResource};
//!
//! let paths = StorePaths::new();
//! let item = ConfigResource::load_required(
//!     &paths, &catalog::DEVICE_TEMPLATE, "vmanage1",
//!     false, Some("Branch_A"), Some(template_id), true,
//! )?;
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod naming;
pub mod storage;

pub use error::{VaultError, VaultResult};
