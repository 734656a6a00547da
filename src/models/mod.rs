//! Core data models
//!
//! The configuration item model: descriptors describing each controller
//! resource type, the generic resource and index representations built on
//! them, identifier-reference rewriting, and the per-node server info
//! record.

pub mod catalog;
pub mod descriptor;
pub mod ids;
pub mod index;
pub mod resource;
pub mod server_info;
pub mod update_eval;

pub use descriptor::{IndexDescriptor, IterFields, ResourceDescriptor};
pub use ids::{id_references, rewrite_ids};
pub use index::ResourceIndex;
pub use resource::ConfigResource;
pub use server_info::ServerInfo;
pub use update_eval::UpdateResponse;
