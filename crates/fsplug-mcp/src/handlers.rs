use std::path::PathBuf;

use futures::future::{BoxFuture, FutureExt};
use fsplug_core::error::FsError;
use fsplug_core::ops::Encoding;
use fsplug_core::FileSystem;
use serde_json::{json, Value};

pub type ToolOutcome = Result<Value, String>;

/// Extract a required string parameter.
fn get_str(args: &Value, key: &str) -> Result<String, String> {
    get_opt_str(args, key)?.ok_or_else(|| format!("missing required parameter: {key}"))
}

/// Extract an optional string parameter; present-but-not-a-string is an error.
fn get_opt_str(args: &Value, key: &str) -> Result<Option<String>, String> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(format!("invalid parameter {key}: expected a string")),
    }
}

fn get_bool(args: &Value, key: &str, default: bool) -> Result<bool, String> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(format!("invalid parameter {key}: expected a boolean")),
    }
}

/// Optional positive integer.
fn get_opt_depth(args: &Value, key: &str) -> Result<Option<usize>, String> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => match v.as_u64() {
            Some(n) if n >= 1 => Ok(Some(usize::try_from(n).unwrap_or(usize::MAX))),
            _ => Err(format!("invalid parameter {key}: expected a positive integer")),
        },
    }
}

fn get_encoding(args: &Value) -> Result<Encoding, String> {
    match get_opt_str(args, "encoding")? {
        Some(name) => name.parse().map_err(|e: FsError| e.to_string()),
        None => Ok(Encoding::Utf8),
    }
}

fn fail(action: &str) -> impl FnOnce(FsError) -> String + '_ {
    move |e| format!("cannot {action}: {e}")
}

fn to_json<T: serde::Serialize>(value: &T) -> ToolOutcome {
    serde_json::to_value(value).map_err(|e| format!("failed to encode result: {e}"))
}

pub fn list_directory<'a>(fs: &'a FileSystem, args: &'a Value) -> BoxFuture<'a, ToolOutcome> {
    async move {
        let path = get_opt_str(args, "dirPath")?.unwrap_or_else(|| ".".to_string());
        let show_hidden = get_bool(args, "showHidden", false)?;
        let recursive = get_bool(args, "recursive", false)?;
        let nodes = fs
            .list_directory(&path, show_hidden, recursive)
            .await
            .map_err(fail("list directory"))?;
        to_json(&nodes)
    }
    .boxed()
}

pub fn read_file<'a>(fs: &'a FileSystem, args: &'a Value) -> BoxFuture<'a, ToolOutcome> {
    async move {
        let path = PathBuf::from(get_str(args, "filePath")?);
        let encoding = get_encoding(args)?;
        let content = fs
            .read_file(&path, encoding)
            .await
            .map_err(fail("read file"))?;
        to_json(&content)
    }
    .boxed()
}

pub fn write_file<'a>(fs: &'a FileSystem, args: &'a Value) -> BoxFuture<'a, ToolOutcome> {
    async move {
        let path = PathBuf::from(get_str(args, "filePath")?);
        let content = get_str(args, "content")?;
        let encoding = get_encoding(args)?;
        let create_directories = get_bool(args, "createDirectories", true)?;
        let receipt = fs
            .write_file(&path, &content, encoding, create_directories)
            .await
            .map_err(fail("write file"))?;
        Ok(json!({
            "message": "file written",
            "path": receipt.path,
            "size": receipt.size,
            "modified": receipt.modified,
        }))
    }
    .boxed()
}

pub fn create_directory<'a>(fs: &'a FileSystem, args: &'a Value) -> BoxFuture<'a, ToolOutcome> {
    async move {
        let path = PathBuf::from(get_str(args, "dirPath")?);
        let recursive = get_bool(args, "recursive", true)?;
        fs.create_directory(&path, recursive)
            .await
            .map_err(fail("create directory"))?;
        Ok(json!({ "message": "directory created", "path": path }))
    }
    .boxed()
}

pub fn delete_file<'a>(fs: &'a FileSystem, args: &'a Value) -> BoxFuture<'a, ToolOutcome> {
    async move {
        let path = PathBuf::from(get_str(args, "filePath")?);
        fs.delete_file(&path).await.map_err(fail("delete file"))?;
        Ok(json!({ "message": "file deleted", "path": path }))
    }
    .boxed()
}

pub fn delete_directory<'a>(fs: &'a FileSystem, args: &'a Value) -> BoxFuture<'a, ToolOutcome> {
    async move {
        let path = PathBuf::from(get_str(args, "dirPath")?);
        let recursive = get_bool(args, "recursive", false)?;
        fs.delete_directory(&path, recursive)
            .await
            .map_err(fail("delete directory"))?;
        Ok(json!({ "message": "directory deleted", "path": path }))
    }
    .boxed()
}

pub fn copy_file<'a>(fs: &'a FileSystem, args: &'a Value) -> BoxFuture<'a, ToolOutcome> {
    async move {
        let source = PathBuf::from(get_str(args, "source")?);
        let destination = PathBuf::from(get_str(args, "destination")?);
        let overwrite = get_bool(args, "overwrite", false)?;
        let receipt = fs
            .copy_file(&source, &destination, overwrite)
            .await
            .map_err(fail("copy file"))?;
        Ok(json!({
            "message": "file copied",
            "source": receipt.source,
            "destination": receipt.destination,
            "size": receipt.size,
        }))
    }
    .boxed()
}

pub fn move_file<'a>(fs: &'a FileSystem, args: &'a Value) -> BoxFuture<'a, ToolOutcome> {
    async move {
        let source = PathBuf::from(get_str(args, "source")?);
        let destination = PathBuf::from(get_str(args, "destination")?);
        let overwrite = get_bool(args, "overwrite", false)?;
        let receipt = fs
            .move_file(&source, &destination, overwrite)
            .await
            .map_err(fail("move file"))?;
        Ok(json!({
            "message": "file moved",
            "source": receipt.source,
            "destination": receipt.destination,
            "size": receipt.size,
        }))
    }
    .boxed()
}

pub fn get_file_stats<'a>(fs: &'a FileSystem, args: &'a Value) -> BoxFuture<'a, ToolOutcome> {
    async move {
        let path = PathBuf::from(get_str(args, "filePath")?);
        let st = fs.stat(&path).await.map_err(fail("stat"))?;
        to_json(&st)
    }
    .boxed()
}

pub fn search_files<'a>(fs: &'a FileSystem, args: &'a Value) -> BoxFuture<'a, ToolOutcome> {
    async move {
        let directory = get_str(args, "directory")?;
        let pattern = get_str(args, "pattern")?;
        // An empty needle means no content filter.
        let content = get_opt_str(args, "content")?.filter(|c| !c.is_empty());
        let max_depth = get_opt_depth(args, "maxDepth")?;
        let results = fs
            .search(&directory, &pattern, content.as_deref(), max_depth)
            .await
            .map_err(fail("search"))?;
        Ok(json!({ "searchResults": results, "total": results.len() }))
    }
    .boxed()
}
