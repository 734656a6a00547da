//! Index resources
//!
//! An index is the controller's listing of all items of one type: a
//! sequence of summary entries, possibly wrapped in a `{"data": [...]}`
//! envelope. Indexes drive backup iteration and decide, once per type,
//! whether sanitized item names collide and extended filenames are needed.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

use crate::api::RestClient;
use crate::config::StorePaths;
use crate::error::{VaultError, VaultResult};
use crate::models::descriptor::{IndexDescriptor, IterFields};
use crate::models::resource::ConfigResource;
use crate::naming::filename_safe;

/// A listing-type resource.
#[derive(Debug, Clone)]
pub struct ResourceIndex {
    descriptor: &'static IndexDescriptor,
    entries: Vec<Value>,
    need_extended_name: bool,
}

impl ResourceIndex {
    /// Wrap an index payload.
    ///
    /// A `{"data": [...]}` envelope is unwrapped, a bare array is taken as
    /// the raw sequence, and `null` yields an empty index. When the
    /// descriptor's iter fields are an id/name pair, name collision across
    /// entries (after sanitizing and lowercasing) is computed here, once.
    pub fn new(descriptor: &'static IndexDescriptor, payload: Value) -> VaultResult<Self> {
        let type_name = descriptor.resource.type_name;
        let entries = match payload {
            Value::Object(mut map) => match map.remove("data") {
                Some(Value::Array(items)) => items,
                Some(_) => {
                    return Err(VaultError::Payload(format!(
                        "{} index envelope 'data' is not a sequence",
                        type_name
                    )))
                }
                None => {
                    return Err(VaultError::Payload(format!(
                        "{} index payload has no 'data' envelope",
                        type_name
                    )))
                }
            },
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            _ => {
                return Err(VaultError::Payload(format!(
                    "{} index payload is not a sequence",
                    type_name
                )))
            }
        };

        let need_extended_name = match descriptor.iter_fields {
            IterFields::IdName { name, .. } => {
                let mut safe_names = HashSet::new();
                for entry in &entries {
                    let item_name = entry.get(name).and_then(Value::as_str).ok_or_else(|| {
                        VaultError::MissingField {
                            field: name.to_string(),
                            context: "index entry",
                        }
                    })?;
                    safe_names.insert(filename_safe(item_name, true));
                }
                safe_names.len() != entries.len()
            }
            IterFields::Fields(_) => false,
        };

        Ok(Self {
            descriptor,
            entries,
            need_extended_name,
        })
    }

    /// Fetch the index from the controller, swallowing transport failures
    /// into `None`. Payload-shape failures still propagate.
    pub fn fetch(
        client: &dyn RestClient,
        descriptor: &'static IndexDescriptor,
        path_args: &[&str],
    ) -> VaultResult<Option<Self>> {
        match client.get(descriptor.resource.api_path.get, path_args) {
            Ok(payload) => Ok(Some(Self::new(descriptor, payload)?)),
            Err(_) => Ok(None),
        }
    }

    /// Fetch the index from the controller, propagating transport failures.
    pub fn fetch_required(
        client: &dyn RestClient,
        descriptor: &'static IndexDescriptor,
        path_args: &[&str],
    ) -> VaultResult<Self> {
        let payload = client
            .get(descriptor.resource.api_path.get, path_args)
            .map_err(VaultError::Transport)?;
        Self::new(descriptor, payload)
    }

    /// Build an index from full items, for item types whose controller API
    /// has no listing endpoint. A field absent from an item's payload falls
    /// back to `id_hints[item name]`, then to `null`.
    pub fn build(
        descriptor: &'static IndexDescriptor,
        items: &[ConfigResource],
        id_hints: &HashMap<String, String>,
    ) -> VaultResult<Self> {
        let fields = descriptor.iter_fields.field_names();

        let entries: Vec<Value> = items
            .iter()
            .map(|item| {
                let mut entry = Map::new();
                for field in &fields {
                    let value = item
                        .payload()
                        .and_then(|payload| payload.get(*field))
                        .cloned()
                        .or_else(|| {
                            let hint = id_hints.get(item.item_name()?)?;
                            Some(Value::String(hint.clone()))
                        })
                        .unwrap_or(Value::Null);
                    entry.insert(field.to_string(), value);
                }
                Value::Object(entry)
            })
            .collect();

        Self::new(descriptor, Value::Array(entries))
    }

    pub fn descriptor(&self) -> &'static IndexDescriptor {
        self.descriptor
    }

    pub fn entries(&self) -> &[Value] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when sanitized item names collide and consumers must append the
    /// item id to filenames and labels.
    pub fn need_extended_name(&self) -> bool {
        self.need_extended_name
    }

    /// Lazily project the named fields out of each entry. Strict: an entry
    /// missing a requested field yields an error.
    pub fn iter<'a>(
        &'a self,
        fields: &'a [&'a str],
    ) -> impl Iterator<Item = VaultResult<Vec<Value>>> + 'a {
        self.entries.iter().map(move |entry| {
            fields
                .iter()
                .map(|field| {
                    entry
                        .get(*field)
                        .cloned()
                        .ok_or_else(|| VaultError::MissingField {
                            field: field.to_string(),
                            context: "index entry",
                        })
                })
                .collect()
        })
    }

    /// Strict projection of the descriptor's configured iter fields.
    pub fn iter_configured(&self) -> impl Iterator<Item = VaultResult<Vec<Value>>> + '_ {
        let fields = self.descriptor.iter_fields.field_names();
        self.entries.iter().map(move |entry| {
            fields
                .iter()
                .map(|field| {
                    entry
                        .get(*field)
                        .cloned()
                        .ok_or_else(|| VaultError::MissingField {
                            field: field.to_string(),
                            context: "index entry",
                        })
                })
                .collect()
        })
    }

    /// Lazily project the configured iter fields combined with the extended
    /// fields. Tolerant: missing fields project as `null`.
    pub fn iter_extended(&self) -> impl Iterator<Item = Vec<Value>> + '_ {
        let mut fields = self.descriptor.iter_fields.field_names();
        fields.extend_from_slice(self.descriptor.extended_iter_fields);

        self.entries.iter().map(move |entry| {
            fields
                .iter()
                .map(|field| entry.get(*field).cloned().unwrap_or(Value::Null))
                .collect()
        })
    }

    /// (id, name) string pairs for an index whose iter fields are the
    /// conventional pair. Strict on both fields.
    pub fn id_name_pairs(&self) -> VaultResult<Vec<(String, String)>> {
        let (id_field, name_field) = match self.descriptor.iter_fields {
            IterFields::IdName { id, name } => (id, name),
            IterFields::Fields(_) => {
                return Err(VaultError::Payload(format!(
                    "{} index does not project id/name pairs",
                    self.descriptor.resource.type_name
                )))
            }
        };

        self.entries
            .iter()
            .map(|entry| {
                let id = entry_str(entry, id_field)?;
                let name = entry_str(entry, name_field)?;
                Ok((id.to_string(), name.to_string()))
            })
            .collect()
    }

    /// Load the index from its JSON file; `Ok(None)` when absent.
    pub fn load(
        paths: &StorePaths,
        descriptor: &'static IndexDescriptor,
        node_dir: &str,
        use_root_dir: bool,
    ) -> VaultResult<Option<Self>> {
        let resource = ConfigResource::load(
            paths,
            &descriptor.resource,
            node_dir,
            false,
            None,
            None,
            use_root_dir,
        )?;
        match resource.and_then(|resource| resource.payload().cloned()) {
            Some(payload) => Ok(Some(Self::new(descriptor, payload)?)),
            None => Ok(None),
        }
    }

    /// Load an index that must exist.
    pub fn load_required(
        paths: &StorePaths,
        descriptor: &'static IndexDescriptor,
        node_dir: &str,
        use_root_dir: bool,
    ) -> VaultResult<Self> {
        Self::load(paths, descriptor, node_dir, use_root_dir)?
            .ok_or_else(|| VaultError::item_not_found(descriptor.resource.type_name, None, None))
    }

    /// Save the entry sequence to the index file. Returns `false` without
    /// touching the filesystem when the index is empty.
    pub fn save(&self, paths: &StorePaths, node_dir: &str) -> VaultResult<bool> {
        ConfigResource::new(&self.descriptor.resource, Value::Array(self.entries.clone()))
            .save(paths, node_dir, false, None, None)
    }
}

fn entry_str<'a>(entry: &'a Value, field: &'static str) -> VaultResult<&'a str> {
    entry
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| VaultError::MissingField {
            field: field.to_string(),
            context: "index entry",
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ResourcePath, TransportError};
    use crate::models::descriptor::ResourceDescriptor;
    use serde_json::json;
    use tempfile::TempDir;

    const ID_1: &str = "11111111-1111-1111-1111-111111111111";
    const ID_2: &str = "22222222-2222-2222-2222-222222222222";

    static TEMPLATE_INDEX: IndexDescriptor = IndexDescriptor::new(
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
    .with_extended(&["devicesAttached"]);

    static EVENT_INDEX: IndexDescriptor = IndexDescriptor::new(
        ResourceDescriptor::new(
            "event index",
            ResourcePath::new("event", &[]),
            &["inventory"],
            "events.json",
        ),
        IterFields::Fields(&["eventName", "severity"]),
    );

    static TEMPLATE: ResourceDescriptor = ResourceDescriptor::new(
        "device template",
        ResourcePath::new("template/device/object", &[]),
        &["device_templates"],
        "{item_name}.json",
    )
    .with_id_name("templateId", "templateName");

    struct FakeClient {
        response: Option<Value>,
    }

    impl RestClient for FakeClient {
        fn get(&self, _path: &str, _path_args: &[&str]) -> Result<Value, TransportError> {
            match &self.response {
                Some(value) => Ok(value.clone()),
                None => Err(TransportError::Connection("connection refused".into())),
            }
        }
    }

    #[test]
    fn test_envelope_unwrapped() {
        let index = ResourceIndex::new(
            &TEMPLATE_INDEX,
            json!({"data": [{"templateId": ID_1, "templateName": "A"}]}),
        )
        .unwrap();
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_raw_sequence_accepted() {
        let index = ResourceIndex::new(
            &TEMPLATE_INDEX,
            json!([{"templateId": ID_1, "templateName": "A"}]),
        )
        .unwrap();
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_null_payload_is_empty_index() {
        let index = ResourceIndex::new(&TEMPLATE_INDEX, Value::Null).unwrap();
        assert!(index.is_empty());
        assert!(!index.need_extended_name());
    }

    #[test]
    fn test_envelope_without_data_rejected() {
        let err = ResourceIndex::new(&TEMPLATE_INDEX, json!({"rows": []})).unwrap_err();
        assert!(matches!(err, VaultError::Payload(_)));
    }

    #[test]
    fn test_scalar_payload_rejected() {
        let err = ResourceIndex::new(&TEMPLATE_INDEX, json!(17)).unwrap_err();
        assert!(matches!(err, VaultError::Payload(_)));
    }

    #[test]
    fn test_name_collision_sets_extended_flag() {
        let index = ResourceIndex::new(
            &TEMPLATE_INDEX,
            json!([
                {"templateId": ID_1, "templateName": "Branch/A"},
                {"templateId": ID_2, "templateName": "branch_a"}
            ]),
        )
        .unwrap();
        assert!(index.need_extended_name());
    }

    #[test]
    fn test_distinct_names_need_no_extension() {
        let index = ResourceIndex::new(
            &TEMPLATE_INDEX,
            json!([
                {"templateId": ID_1, "templateName": "Branch_A"},
                {"templateId": ID_2, "templateName": "Branch_B"}
            ]),
        )
        .unwrap();
        assert!(!index.need_extended_name());
    }

    #[test]
    fn test_opaque_fields_skip_collision_check() {
        // Identical names, but no IdName pair configured
        let index = ResourceIndex::new(
            &EVENT_INDEX,
            json!([{"eventName": "up"}, {"eventName": "up"}]),
        )
        .unwrap();
        assert!(!index.need_extended_name());
    }

    #[test]
    fn test_collision_check_requires_names() {
        let err =
            ResourceIndex::new(&TEMPLATE_INDEX, json!([{"templateId": ID_1}])).unwrap_err();
        assert!(matches!(err, VaultError::MissingField { .. }));
    }

    #[test]
    fn test_strict_iter() {
        let index = ResourceIndex::new(
            &EVENT_INDEX,
            json!([
                {"eventName": "up", "severity": "info", "extra": 1},
                {"eventName": "down", "severity": "major"}
            ]),
        )
        .unwrap();

        let rows: VaultResult<Vec<Vec<Value>>> = index.iter_configured().collect();
        assert_eq!(
            rows.unwrap(),
            vec![
                vec![json!("up"), json!("info")],
                vec![json!("down"), json!("major")]
            ]
        );
    }

    #[test]
    fn test_strict_iter_missing_field_fails() {
        let index = ResourceIndex::new(
            &EVENT_INDEX,
            json!([{"eventName": "up", "severity": "info"}, {"eventName": "down"}]),
        )
        .unwrap();

        let rows: Vec<VaultResult<Vec<Value>>> = index.iter(&["severity"]).collect();
        assert!(rows[0].is_ok());
        assert!(matches!(
            rows[1].as_ref().unwrap_err(),
            VaultError::MissingField { .. }
        ));
    }

    #[test]
    fn test_extended_iter_tolerates_missing_fields() {
        let index = ResourceIndex::new(
            &TEMPLATE_INDEX,
            json!([
                {"templateId": ID_1, "templateName": "A", "devicesAttached": 3},
                {"templateId": ID_2, "templateName": "B"}
            ]),
        )
        .unwrap();

        let rows: Vec<Vec<Value>> = index.iter_extended().collect();
        assert_eq!(rows[0], vec![json!(ID_1), json!("A"), json!(3)]);
        assert_eq!(rows[1], vec![json!(ID_2), json!("B"), Value::Null]);
    }

    #[test]
    fn test_id_name_pairs() {
        let index = ResourceIndex::new(
            &TEMPLATE_INDEX,
            json!([{"templateId": ID_1, "templateName": "A"}]),
        )
        .unwrap();
        assert_eq!(
            index.id_name_pairs().unwrap(),
            vec![(ID_1.to_string(), "A".to_string())]
        );

        let opaque = ResourceIndex::new(&EVENT_INDEX, json!([])).unwrap();
        assert!(opaque.id_name_pairs().is_err());
    }

    #[test]
    fn test_build_with_id_hints() {
        let items = vec![
            ConfigResource::new(
                &TEMPLATE,
                json!({"templateId": ID_1, "templateName": "A"}),
            ),
            // No id in the payload; supplied through the hint map
            ConfigResource::new(&TEMPLATE, json!({"templateName": "B"})),
            // No id and no hint
            ConfigResource::new(&TEMPLATE, json!({"templateName": "C"})),
        ];
        let hints: HashMap<String, String> =
            [("B".to_string(), ID_2.to_string())].into_iter().collect();

        let index = ResourceIndex::build(&TEMPLATE_INDEX, &items, &hints).unwrap();
        assert_eq!(
            index.entries()[0],
            json!({"templateId": ID_1, "templateName": "A"})
        );
        assert_eq!(
            index.entries()[1],
            json!({"templateId": ID_2, "templateName": "B"})
        );
        assert_eq!(
            index.entries()[2],
            json!({"templateId": null, "templateName": "C"})
        );
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StorePaths::with_root(temp_dir.path());
        let index = ResourceIndex::new(
            &TEMPLATE_INDEX,
            json!({"data": [{"templateId": ID_1, "templateName": "A"}]}),
        )
        .unwrap();

        assert!(index.save(&paths, "node1").unwrap());
        assert!(temp_dir
            .path()
            .join("node1")
            .join("inventory")
            .join("device_templates.json")
            .exists());

        let loaded = ResourceIndex::load(&paths, &TEMPLATE_INDEX, "node1", true)
            .unwrap()
            .unwrap();
        assert_eq!(loaded.entries(), index.entries());
    }

    #[test]
    fn test_save_empty_index_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StorePaths::with_root(temp_dir.path());
        let index = ResourceIndex::new(&TEMPLATE_INDEX, json!([])).unwrap();

        assert!(!index.save(&paths, "node1").unwrap());
        assert!(!temp_dir.path().join("node1").exists());
    }

    #[test]
    fn test_load_missing_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StorePaths::with_root(temp_dir.path());

        assert!(ResourceIndex::load(&paths, &TEMPLATE_INDEX, "node1", true)
            .unwrap()
            .is_none());

        let err =
            ResourceIndex::load_required(&paths, &TEMPLATE_INDEX, "node1", true).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_fetch_swallows_transport_errors() {
        let client = FakeClient { response: None };
        assert!(ResourceIndex::fetch(&client, &TEMPLATE_INDEX, &[])
            .unwrap()
            .is_none());

        let err = ResourceIndex::fetch_required(&client, &TEMPLATE_INDEX, &[]).unwrap_err();
        assert!(matches!(err, VaultError::Transport(_)));
    }

    #[test]
    fn test_fetch_wraps_response() {
        let client = FakeClient {
            response: Some(json!({"data": [{"templateId": ID_1, "templateName": "A"}]})),
        };
        let index = ResourceIndex::fetch(&client, &TEMPLATE_INDEX, &[])
            .unwrap()
            .unwrap();
        assert_eq!(index.len(), 1);
    }
}
