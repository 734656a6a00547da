//! Descriptor catalog
//!
//! Static descriptors for the controller resource types the backup/restore
//! workflows operate on. Adding a type is a matter of adding an entry here;
//! the generic machinery in [`crate::models`] does the rest.

use crate::api::ResourcePath;
use crate::models::descriptor::{IndexDescriptor, IterFields, ResourceDescriptor};

// Stamp fields the controller maintains on template items; irrelevant when
// deciding whether a local copy is stale.
const TEMPLATE_STAMP_FIELDS: &[&str] = &[
    "createdBy",
    "createdOn",
    "lastUpdatedBy",
    "lastUpdatedOn",
    "@rid",
];

/// Device template, fetched and re-created one item at a time.
pub static DEVICE_TEMPLATE: ResourceDescriptor = ResourceDescriptor::new(
    "device template",
    ResourcePath::new("template/device/object", &["template/device"]),
    &["device_templates"],
    "{item_name}.json",
)
.with_id_name("templateId", "templateName")
.with_type_field("configType")
.with_skip_compare(TEMPLATE_STAMP_FIELDS)
// Attached-feature bookkeeping is controller-managed; never sent on create
.with_create_filtered(&["feature"]);

/// Listing of all device templates.
pub static DEVICE_TEMPLATE_INDEX: IndexDescriptor = IndexDescriptor::new(
    ResourceDescriptor::new(
        "device template index",
        ResourcePath::new("template/device", &[]),
        &["inventory"],
        "device_templates.json",
    ),
    IterFields::IdName {
        id: "templateId",
        name: "templateName",
    },
)
.with_extended(&["devicesAttached", "configType"]);

/// Feature template.
pub static FEATURE_TEMPLATE: ResourceDescriptor = ResourceDescriptor::new(
    "feature template",
    ResourcePath::new("template/feature/object", &["template/feature"]),
    &["feature_templates"],
    "{item_name}.json",
)
.with_id_name("templateId", "templateName")
.with_type_field("templateType")
.with_skip_compare(TEMPLATE_STAMP_FIELDS);

/// Listing of all feature templates.
pub static FEATURE_TEMPLATE_INDEX: IndexDescriptor = IndexDescriptor::new(
    ResourceDescriptor::new(
        "feature template index",
        ResourcePath::new("template/feature", &[]),
        &["inventory"],
        "feature_templates.json",
    ),
    IterFields::IdName {
        id: "templateId",
        name: "templateName",
    },
)
.with_extended(&["attachedMastersCount", "templateType"]);

/// Centralized (vSmart) policy.
pub static VSMART_POLICY: ResourceDescriptor = ResourceDescriptor::new(
    "vSmart policy",
    ResourcePath::new("template/policy/vsmart/definition", &["template/policy/vsmart"]),
    &["vsmart_policies"],
    "{item_name}.json",
)
.with_id_name("policyId", "policyName")
.with_type_field("policyType")
.with_skip_compare(TEMPLATE_STAMP_FIELDS);

/// Listing of all centralized policies.
pub static VSMART_POLICY_INDEX: IndexDescriptor = IndexDescriptor::new(
    ResourceDescriptor::new(
        "vSmart policy index",
        ResourcePath::new("template/policy/vsmart", &[]),
        &["inventory"],
        "vsmart_policies.json",
    ),
    IterFields::IdName {
        id: "policyId",
        name: "policyName",
    },
)
.with_extended(&["isPolicyActivated"]);
