//! Server info record
//!
//! A small key-value record describing the controller node a backup was
//! taken from (version, hostname, and similar), persisted as
//! `server_info.json` directly under the node directory.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::StorePaths;
use crate::error::{VaultError, VaultResult};
use crate::storage::file_io;

/// Filename under the node directory
pub const SERVER_INFO_FILE: &str = "server_info.json";

/// Open-ended key-value record about one controller node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerInfo {
    fields: Map<String, Value>,
}

impl ServerInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// A record stamped with the current UTC time under `collected_at`.
    pub fn collected_now() -> Self {
        let mut info = Self::new();
        info.set("collected_at", Value::String(Utc::now().to_rfc3339()));
        info
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    /// Look up a key. Absent keys (and keys explicitly set to `null`) fail
    /// with [`VaultError::MissingKey`].
    pub fn get(&self, key: &str) -> VaultResult<&Value> {
        match self.fields.get(key) {
            Some(value) if !value.is_null() => Ok(value),
            _ => Err(VaultError::MissingKey(key.to_string())),
        }
    }

    /// Look up a key that must hold a string.
    pub fn get_str(&self, key: &str) -> VaultResult<&str> {
        let value = self.get(key)?;
        value.as_str().ok_or_else(|| {
            VaultError::Payload(format!("server info entry '{}' is not a string", key))
        })
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Load the record for a node; `Ok(None)` when the file does not exist.
    pub fn load(paths: &StorePaths, node_dir: &str) -> VaultResult<Option<Self>> {
        let file_path = paths.node_dir(node_dir).join(SERVER_INFO_FILE);
        match file_io::read_json_value(file_path)? {
            Some(Value::Object(fields)) => Ok(Some(Self { fields })),
            Some(_) => Err(VaultError::Payload(
                "server info file is not a JSON object".to_string(),
            )),
            None => Ok(None),
        }
    }

    /// Save the record for a node, creating the node directory as needed.
    pub fn save(&self, paths: &StorePaths, node_dir: &str) -> VaultResult<bool> {
        let file_path = paths.node_dir(node_dir).join(SERVER_INFO_FILE);
        file_io::write_json_value(file_path, &serde_json::to_value(self)?)?;
        Ok(true)
    }
}
