//! Configuration resource model
//!
//! A [`ConfigResource`] holds one remote configuration object as fetched
//! from the controller or loaded from the local store: an arbitrary JSON
//! payload plus a static [`ResourceDescriptor`] telling the generic
//! machinery how to project, persist, compare, and re-create it.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::api::RestClient;
use crate::config::StorePaths;
use crate::error::{VaultError, VaultResult};
use crate::models::descriptor::ResourceDescriptor;
use crate::models::ids;
use crate::naming::{filename_safe, is_valid_item_name, NameTemplate};
use crate::storage::file_io;

// Fields the controller stamps onto stored items; never sent back on
// create or update calls.
const VOLATILE_FIELDS: [&str; 3] = ["@rid", "createdOn", "lastUpdatedOn"];

/// One remote configuration object held locally.
///
/// Instances are constructed fresh per fetch-or-load call; the persisted
/// file is the durable anchor.
#[derive(Debug, Clone)]
pub struct ConfigResource {
    descriptor: &'static ResourceDescriptor,
    payload: Option<Value>,
}

impl ConfigResource {
    /// Wrap a payload. JSON `null` means "no data".
    pub fn new(descriptor: &'static ResourceDescriptor, payload: Value) -> Self {
        let payload = match payload {
            Value::Null => None,
            other => Some(other),
        };
        Self {
            descriptor,
            payload,
        }
    }

    /// A resource with no data.
    pub fn empty(descriptor: &'static ResourceDescriptor) -> Self {
        Self {
            descriptor,
            payload: None,
        }
    }

    pub fn descriptor(&self) -> &'static ResourceDescriptor {
        self.descriptor
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// The item identifier, when the payload is an object and the type
    /// projects one.
    pub fn item_id(&self) -> Option<&str> {
        self.field_str(self.descriptor.id_field?)
    }

    /// The item display name, when the payload is an object and the type
    /// projects one.
    pub fn item_name(&self) -> Option<&str> {
        self.field_str(self.descriptor.name_field?)
    }

    /// True when there is no payload or the payload has zero length.
    pub fn is_empty(&self) -> bool {
        match &self.payload {
            None => true,
            Some(Value::Object(map)) => map.is_empty(),
            Some(Value::Array(items)) => items.is_empty(),
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        }
    }

    /// Fetch from the controller, swallowing transport failures into `None`.
    pub fn fetch(
        client: &dyn RestClient,
        descriptor: &'static ResourceDescriptor,
        path_args: &[&str],
    ) -> Option<Self> {
        Self::fetch_required(client, descriptor, path_args).ok()
    }

    /// Fetch from the controller, propagating transport failures.
    pub fn fetch_required(
        client: &dyn RestClient,
        descriptor: &'static ResourceDescriptor,
        path_args: &[&str],
    ) -> VaultResult<Self> {
        let payload = client
            .get(descriptor.api_path.get, path_args)
            .map_err(VaultError::Transport)?;
        Ok(Self::new(descriptor, payload))
    }

    /// Compute the store filename for an item of this type.
    ///
    /// With either the name or the id absent the template is returned
    /// verbatim (a fixed filename). With `ext_name` the name component is
    /// extended with the item id to stay unique across sanitized-name
    /// collisions.
    pub fn filename(
        descriptor: &ResourceDescriptor,
        ext_name: bool,
        item_name: Option<&str>,
        item_id: Option<&str>,
    ) -> String {
        let (name, id) = match (item_name, item_id) {
            (Some(name), Some(id)) => (name, id),
            _ => return descriptor.store_filename.to_string(),
        };

        let safe_name = if ext_name {
            format!("{}_{}", filename_safe(name, false), id)
        } else {
            filename_safe(name, false)
        };

        descriptor
            .store_filename
            .replace("{item_name}", &safe_name)
            .replace("{item_id}", id)
    }

    fn store_file_path(
        paths: &StorePaths,
        descriptor: &ResourceDescriptor,
        node_dir: &str,
        ext_name: bool,
        item_name: Option<&str>,
        item_id: Option<&str>,
        use_root_dir: bool,
    ) -> PathBuf {
        let mut dir = if use_root_dir {
            paths.node_dir(node_dir)
        } else {
            PathBuf::from(node_dir)
        };
        for segment in descriptor.store_segments {
            dir.push(segment);
        }
        dir.join(Self::filename(descriptor, ext_name, item_name, item_id))
    }

    /// Load an item of this type from its JSON file.
    ///
    /// Returns `Ok(None)` when the file does not exist. A file that exists
    /// but is not valid JSON always fails with
    /// [`VaultError::InvalidFormat`]. When `use_root_dir` is false,
    /// `node_dir` is taken as a standalone directory instead of a directory
    /// under the store root.
    #[allow(clippy::too_many_arguments)]
    pub fn load(
        paths: &StorePaths,
        descriptor: &'static ResourceDescriptor,
        node_dir: &str,
        ext_name: bool,
        item_name: Option<&str>,
        item_id: Option<&str>,
        use_root_dir: bool,
    ) -> VaultResult<Option<Self>> {
        let file_path = Self::store_file_path(
            paths,
            descriptor,
            node_dir,
            ext_name,
            item_name,
            item_id,
            use_root_dir,
        );
        match file_io::read_json_value(file_path)? {
            Some(payload) => Ok(Some(Self::new(descriptor, payload))),
            None => Ok(None),
        }
    }

    /// Load an item that must exist; an absent file is a
    /// [`VaultError::NotFound`] carrying type/name/id context.
    #[allow(clippy::too_many_arguments)]
    pub fn load_required(
        paths: &StorePaths,
        descriptor: &'static ResourceDescriptor,
        node_dir: &str,
        ext_name: bool,
        item_name: Option<&str>,
        item_id: Option<&str>,
        use_root_dir: bool,
    ) -> VaultResult<Self> {
        Self::load(
            paths,
            descriptor,
            node_dir,
            ext_name,
            item_name,
            item_id,
            use_root_dir,
        )?
        .ok_or_else(|| VaultError::item_not_found(descriptor.type_name, item_name, item_id))
    }

    /// Save the payload as pretty-printed JSON under the node directory,
    /// creating parent directories as needed and overwriting
    /// unconditionally.
    ///
    /// Returns `false` without touching the filesystem when there is no
    /// data to save.
    pub fn save(
        &self,
        paths: &StorePaths,
        node_dir: &str,
        ext_name: bool,
        item_name: Option<&str>,
        item_id: Option<&str>,
    ) -> VaultResult<bool> {
        let payload = match &self.payload {
            Some(payload) if !self.is_empty() => payload,
            _ => return Ok(false),
        };

        let file_path = Self::store_file_path(
            paths,
            self.descriptor,
            node_dir,
            ext_name,
            item_name,
            item_id,
            true,
        );
        file_io::write_json_value(file_path, payload)?;
        Ok(true)
    }

    fn payload_object(&self) -> VaultResult<&Map<String, Value>> {
        match &self.payload {
            Some(Value::Object(map)) => Ok(map),
            _ => Err(VaultError::Payload(format!(
                "{} has no object payload",
                self.descriptor.type_name
            ))),
        }
    }

    /// Build the payload for a create call against the controller: strip
    /// the identifier, volatile fields, and type-specific filtered fields;
    /// apply `new_name` when renaming; substitute identifier references
    /// per `id_map`.
    pub fn create_payload(
        &self,
        id_map: &HashMap<String, String>,
        new_name: Option<&str>,
    ) -> VaultResult<Value> {
        let source = self.payload_object()?;

        let mut filtered: Map<String, Value> = source
            .iter()
            .filter(|(key, _)| {
                let key = key.as_str();
                self.descriptor.id_field != Some(key)
                    && !VOLATILE_FIELDS.contains(&key)
                    && !self.descriptor.create_filtered_fields.contains(&key)
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        if let (Some(new_name), Some(name_field)) = (new_name, self.descriptor.name_field) {
            filtered.insert(name_field.to_string(), Value::String(new_name.to_string()));
        }

        ids::rewrite_ids(id_map, &Value::Object(filtered))
    }

    /// Build the payload for an update call: like [`Self::create_payload`]
    /// but the identifier is retained (updates target a specific id) and
    /// only the volatile fields are stripped.
    pub fn update_payload(&self, id_map: &HashMap<String, String>) -> VaultResult<Value> {
        let source = self.payload_object()?;

        let filtered: Map<String, Value> = source
            .iter()
            .filter(|(key, _)| !VOLATILE_FIELDS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        ids::rewrite_ids(id_map, &Value::Object(filtered))
    }

    /// Compare against a freshly fetched payload, ignoring the identifier
    /// and the descriptor's excluded fields.
    ///
    /// Both sides, after top-level filtering, are serialized and compared
    /// as sorted character sequences. This is a cheap canonicalization, not
    /// structural equality: payloads whose serializations are anagrams of
    /// each other compare equal.
    pub fn is_equal(&self, other: &Value) -> bool {
        let local = match &self.payload {
            Some(Value::Object(map)) => map,
            _ => return false,
        };
        let other = match other {
            Value::Object(map) => map,
            _ => return false,
        };

        let skip: HashSet<&str> = self
            .descriptor
            .skip_compare_fields
            .iter()
            .copied()
            .chain(self.descriptor.id_field)
            .collect();

        sorted_payload_chars(local, &skip) == sorted_payload_chars(other, &skip)
    }

    /// True when the factory-default or read-only flag is set.
    pub fn is_readonly(&self) -> bool {
        self.flag_set(self.descriptor.factory_default_field)
            || self.flag_set(self.descriptor.readonly_field)
    }

    /// True when the item is owned by the system rather than an operator.
    pub fn is_system_owned(&self) -> bool {
        self.field_str(self.descriptor.owner_field) == Some("system")
            || self.field_str(self.descriptor.info_field) == Some("aci")
    }

    /// The item sub-type, when the type projects one.
    pub fn type_value(&self) -> Option<&str> {
        self.field_str(self.descriptor.type_field?)
    }

    /// Every distinct identifier this item references, excluding its own.
    pub fn id_references(&self) -> HashSet<String> {
        match &self.payload {
            Some(payload) => ids::id_references(payload, self.descriptor.id_field),
            None => HashSet::new(),
        }
    }

    /// Derive a new name for this item from a rename template.
    ///
    /// Template errors propagate; an out-of-whitelist result is reported
    /// through the boolean, which the caller must branch on.
    pub fn derive_new_name(&self, template: &str) -> VaultResult<(String, bool)> {
        let name_field = self
            .descriptor
            .name_field
            .ok_or_else(|| VaultError::MissingField {
                field: "name".to_string(),
                context: "resource descriptor",
            })?;
        let current = self.item_name().ok_or_else(|| VaultError::MissingField {
            field: name_field.to_string(),
            context: "item payload",
        })?;

        let new_name = NameTemplate::new(template).apply(current)?;
        let is_valid = is_valid_item_name(&new_name);
        Ok((new_name, is_valid))
    }

    /// Every scalar value stored under `key` anywhere in the payload, or
    /// within the subtree at top-level `from_key` when given. Matched
    /// containers and nulls are not collected.
    pub fn find_field_values(&self, key: &str, from_key: Option<&str>) -> Vec<Value> {
        let root = match (&self.payload, from_key) {
            (Some(payload), None) => Some(payload),
            (Some(payload), Some(from_key)) => payload.get(from_key),
            (None, _) => None,
        };

        let mut matches = Vec::new();
        if let Some(root) = root {
            collect_field_values(root, key, &mut matches);
        }
        matches
    }

    fn field_str(&self, field: &str) -> Option<&str> {
        self.payload.as_ref()?.get(field)?.as_str()
    }

    fn flag_set(&self, field: &str) -> bool {
        match self.payload.as_ref().and_then(|payload| payload.get(field)) {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(flag)) => flag == "true",
            _ => false,
        }
    }
}

impl fmt::Display for ConfigResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Some(payload) => {
                let pretty = serde_json::to_string_pretty(payload).map_err(|_| fmt::Error)?;
                write!(f, "{}", pretty)
            }
            None => write!(f, "null"),
        }
    }
}

fn sorted_payload_chars(map: &Map<String, Value>, skip: &HashSet<&str>) -> Vec<char> {
    let filtered: Map<String, Value> = map
        .iter()
        .filter(|(key, _)| !skip.contains(key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let mut chars: Vec<char> = serde_json::to_string(&Value::Object(filtered))
        .unwrap_or_default()
        .chars()
        .collect();
    chars.sort_unstable();
    chars
}

fn collect_field_values(value: &Value, key: &str, matches: &mut Vec<Value>) {
    match value {
        Value::Object(map) => {
            if let Some(matched) = map.get(key) {
                if !matched.is_object() && !matched.is_array() && !matched.is_null() {
                    matches.push(matched.clone());
                }
            }
            for nested in map.values() {
                collect_field_values(nested, key, matches);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_field_values(item, key, matches);
            }
        }
        _ => {}
    }
}
