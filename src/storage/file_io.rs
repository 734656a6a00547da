//! File I/O utilities with atomic writes
//!
//! Item files are UTF-8 JSON, pretty-printed with 2-space indentation.
//! An absent file and a malformed file are distinct conditions: callers may
//! tolerate the former, the latter is always surfaced.

use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

use serde_json::Value;

use crate::error::{VaultError, VaultResult};

/// Read a JSON value from a file.
///
/// Returns `Ok(None)` if the file does not exist. A file that exists but is
/// not valid JSON fails with [`VaultError::InvalidFormat`].
pub fn read_json_value<P: AsRef<Path>>(path: P) -> VaultResult<Option<Value>> {
    let path = path.as_ref();

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(VaultError::Io(format!(
                "failed to read {}: {}",
                path.display(),
                e
            )))
        }
    };

    let value = serde_json::from_str(&contents).map_err(|e| VaultError::InvalidFormat {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    Ok(Some(value))
}

/// Write a JSON value to a file atomically (write to temp, then rename)
///
/// Creates parent directories as needed and overwrites an existing file
/// unconditionally. The rename keeps last-writer-wins semantics for
/// concurrent writers while individual files stay complete.
pub fn write_json_value<P: AsRef<Path>>(path: P, value: &Value) -> VaultResult<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            VaultError::Io(format!(
                "failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Temp file in the same directory, required for an atomic rename
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| VaultError::Io(format!("failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .map_err(|e| VaultError::Json(format!("failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| VaultError::Io(format!("failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| VaultError::Io(format!("failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        VaultError::Io(format!("failed to rename temp file: {}", e))
    })?;

    Ok(())
}
