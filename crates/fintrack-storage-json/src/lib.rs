//! fintrack-storage-json
//!
//! Filesystem-backed key-value store: one JSON document per scope and key,
//! laid out as `<root>/<scope>/<key>.json`.

use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use fintrack_core::{CoreError, KeyValueStore, DEFAULT_SCOPE};
use tracing::debug;

const DOCUMENT_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: PathBuf) -> Result<Self, CoreError> {
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn document_path(&self, scope: &str, key: &str) -> PathBuf {
        self.scope_dir(scope)
            .join(format!("{}.{}", canonical_name(key, "document"), DOCUMENT_EXTENSION))
    }

    /// Scopes with a directory under the root, decoded and sorted.
    pub fn list_scopes(&self) -> Result<Vec<String>, CoreError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut scopes = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            match decode_name(name) {
                Some(scope) => scopes.push(scope),
                None => debug!(dir = name, "skipping directory that is not a scope"),
            }
        }
        scopes.sort();
        Ok(scopes)
    }

    fn scope_dir(&self, scope: &str) -> PathBuf {
        self.root.join(canonical_name(scope, DEFAULT_SCOPE))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, scope: &str, key: &str) -> Result<Option<String>, CoreError> {
        let path = self.document_path(scope, key);
        match fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, scope: &str, key: &str, value: &str) -> Result<(), CoreError> {
        let path = self.document_path(scope, key);
        let tmp = tmp_path(&path);
        write_atomic(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), bytes = value.len(), "stored document");
        Ok(())
    }

    fn remove(&self, scope: &str, key: &str) -> Result<(), CoreError> {
        let path = self.document_path(scope, key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Directory or file name for `name`. Lowercase ASCII letters, digits and `-`
/// pass through; every other byte becomes `_xx` (lowercase hex), so distinct
/// names never share a path. Blank names map to `fallback`.
fn canonical_name(name: &str, fallback: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        return fallback.into();
    }
    let mut encoded = String::with_capacity(name.len());
    for byte in name.bytes() {
        match byte {
            b'a'..=b'z' | b'0'..=b'9' | b'-' => encoded.push(char::from(byte)),
            _ => encoded.push_str(&format!("_{byte:02x}")),
        }
    }
    encoded
}

/// Inverse of [`canonical_name`]. `None` for names it could not have produced.
fn decode_name(encoded: &str) -> Option<String> {
    let bytes = encoded.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while index < bytes.len() {
        match bytes[index] {
            b'_' => {
                let hex = encoded.get(index + 1..index + 3)?;
                if hex.bytes().any(|b| b.is_ascii_uppercase()) {
                    return None;
                }
                decoded.push(u8::from_str_radix(hex, 16).ok()?);
                index += 3;
            }
            byte @ (b'a'..=b'z' | b'0'..=b'9' | b'-') => {
                decoded.push(byte);
                index += 1;
            }
            _ => return None,
        }
    }
    String::from_utf8(decoded).ok()
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
