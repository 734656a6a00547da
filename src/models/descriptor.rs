//! Resource descriptors
//!
//! One controller resource type differs from another only in data: API
//! paths, which payload fields carry its identifier and display name, where
//! its files live, and which fields are filtered when comparing or
//! re-creating items. A [`ResourceDescriptor`] captures that data so the
//! generic load/save/rewrite machinery in this module tree stays free of
//! per-type code. Descriptors are plain `static` values; see
//! [`crate::models::catalog`].

use crate::api::ResourcePath;

/// Describes one controller resource type.
#[derive(Debug, Clone, Copy)]
pub struct ResourceDescriptor {
    /// Human-readable type label used in error context
    pub type_name: &'static str,

    /// Per-verb API paths
    pub api_path: ResourcePath,

    /// Payload field carrying the item identifier, if the type has one
    pub id_field: Option<&'static str>,

    /// Payload field carrying the item display name, if the type has one
    pub name_field: Option<&'static str>,

    /// Directory segments under the node directory where files of this
    /// type live
    pub store_segments: &'static [&'static str],

    /// Filename template; `{item_name}` and `{item_id}` are substituted
    pub store_filename: &'static str,

    /// Flag field marking factory-default items
    pub factory_default_field: &'static str,

    /// Flag field marking read-only items
    pub readonly_field: &'static str,

    /// Field naming the owning subsystem
    pub owner_field: &'static str,

    /// Informational tag field
    pub info_field: &'static str,

    /// Field carrying the item sub-type, if the type has one
    pub type_field: Option<&'static str>,

    /// Top-level fields ignored by payload comparison
    pub skip_compare_fields: &'static [&'static str],

    /// Extra top-level fields stripped from create payloads
    pub create_filtered_fields: &'static [&'static str],
}

impl ResourceDescriptor {
    /// Descriptor with the controller's conventional sentinel fields and no
    /// id/name projection.
    pub const fn new(
        type_name: &'static str,
        api_path: ResourcePath,
        store_segments: &'static [&'static str],
        store_filename: &'static str,
    ) -> Self {
        Self {
            type_name,
            api_path,
            id_field: None,
            name_field: None,
            store_segments,
            store_filename,
            factory_default_field: "factoryDefault",
            readonly_field: "readOnly",
            owner_field: "owner",
            info_field: "infoTag",
            type_field: None,
            skip_compare_fields: &[],
            create_filtered_fields: &[],
        }
    }

    pub const fn with_id_name(mut self, id_field: &'static str, name_field: &'static str) -> Self {
        self.id_field = Some(id_field);
        self.name_field = Some(name_field);
        self
    }

    pub const fn with_type_field(mut self, type_field: &'static str) -> Self {
        self.type_field = Some(type_field);
        self
    }

    pub const fn with_skip_compare(mut self, fields: &'static [&'static str]) -> Self {
        self.skip_compare_fields = fields;
        self
    }

    pub const fn with_create_filtered(mut self, fields: &'static [&'static str]) -> Self {
        self.create_filtered_fields = fields;
        self
    }
}

/// Fields projected when iterating an index.
///
/// `IdName` marks the conventional (identifier, display name) pair and
/// additionally arms sanitized-name collision detection on the index.
#[derive(Debug, Clone, Copy)]
pub enum IterFields {
    Fields(&'static [&'static str]),
    IdName {
        id: &'static str,
        name: &'static str,
    },
}

impl IterFields {
    /// The projected field names, in order.
    pub fn field_names(&self) -> Vec<&'static str> {
        match *self {
            Self::Fields(fields) => fields.to_vec(),
            Self::IdName { id, name } => vec![id, name],
        }
    }
}

/// Describes one listing-type resource.
#[derive(Debug, Clone, Copy)]
pub struct IndexDescriptor {
    /// Persistence and API description; index files conventionally live
    /// under an `inventory` store segment
    pub resource: ResourceDescriptor,

    /// Fields projected per entry during configured iteration
    pub iter_fields: IterFields,

    /// Additional fields for tolerant extended iteration
    pub extended_iter_fields: &'static [&'static str],
}

impl IndexDescriptor {
    pub const fn new(resource: ResourceDescriptor, iter_fields: IterFields) -> Self {
        Self {
            resource,
            iter_fields,
            extended_iter_fields: &[],
        }
    }

    pub const fn with_extended(mut self, fields: &'static [&'static str]) -> Self {
        self.extended_iter_fields = fields;
        self
    }
}
