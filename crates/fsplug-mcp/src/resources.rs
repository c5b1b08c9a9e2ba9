use std::path::PathBuf;

use fsplug_core::ops::Encoding;
use fsplug_core::FileSystem;
use serde_json::{json, Value};

use crate::mime::mime_type_for;

pub const INFO_URI: &str = "filesystem://info";
pub const FILE_URI_PREFIX: &str = "filesystem://file";
pub const FILE_URI_TEMPLATE: &str = "filesystem://file/{path}";

#[derive(Debug)]
pub enum ResourceError {
    /// The URI does not name a resource this server provides.
    Unknown(String),
    /// The resource exists but could not be produced.
    Failed(String),
}

pub fn list() -> Value {
    json!({
        "resources": [{
            "uri": INFO_URI,
            "name": "filesystem-info",
            "description": "Filesystem plugin information",
            "mimeType": "application/json"
        }]
    })
}

pub fn templates() -> Value {
    json!({
        "resourceTemplates": [{
            "uriTemplate": FILE_URI_TEMPLATE,
            "name": "file-content",
            "title": "File content",
            "description": "Read a file's content by path"
        }]
    })
}

pub fn plugin_info(features: &[&str]) -> Value {
    json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Filesystem listing, search and file operations",
        "features": features,
        "status": "active"
    })
}

pub async fn read(uri: &str, fs: &FileSystem, features: &[&str]) -> Result<Value, ResourceError> {
    if uri == INFO_URI {
        let text = serde_json::to_string_pretty(&plugin_info(features))
            .map_err(|e| ResourceError::Failed(e.to_string()))?;
        return Ok(json!({
            "contents": [{ "uri": uri, "mimeType": "application/json", "text": text }]
        }));
    }

    let path = file_path_from_uri(uri).ok_or_else(|| ResourceError::Unknown(uri.to_string()))?;
    let file = fs
        .read_file(&path, Encoding::Utf8)
        .await
        .map_err(|e| ResourceError::Failed(format!("cannot read file: {e}")))?;
    Ok(json!({
        "contents": [{
            "uri": uri,
            "mimeType": mime_type_for(&path),
            "text": file.content,
            "size": file.size
        }]
    }))
}

/// `filesystem://file/<percent-encoded path>` → path. The separator after
/// `file` is kept, so `filesystem://file/etc/hosts` names `/etc/hosts`.
fn file_path_from_uri(uri: &str) -> Option<PathBuf> {
    let rest = uri.strip_prefix(FILE_URI_PREFIX)?;
    if !rest.starts_with('/') || rest.len() < 2 {
        return None;
    }
    let decoded = percent_decode(rest)?;
    Some(PathBuf::from(decoded))
}

fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = input.get(i + 1..i + 3)?;
            if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return None;
            }
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}
