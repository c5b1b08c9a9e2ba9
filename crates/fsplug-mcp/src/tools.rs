use futures::future::BoxFuture;
use fsplug_core::FileSystem;
use serde_json::{json, Value};

use crate::handlers::{self, ToolOutcome};

/// A tool handler: validated-by-itself arguments in, JSON value or error text out.
pub type Handler = for<'a> fn(&'a FileSystem, &'a Value) -> BoxFuture<'a, ToolOutcome>;

pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
    pub handler: Handler,
}

impl ToolSpec {
    /// The entry advertised in `tools/list`.
    pub fn definition(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.input_schema
        })
    }
}

/// Name → handler table, in declaration order.
pub struct ToolRegistry {
    tools: Vec<ToolSpec>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    pub fn register(
        &mut self,
        name: &'static str,
        description: &'static str,
        input_schema: Value,
        handler: Handler,
    ) -> &mut Self {
        self.tools.retain(|t| t.name != name);
        self.tools.push(ToolSpec {
            name,
            description,
            input_schema,
            handler,
        });
        self
    }

    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name).collect()
    }

    pub fn definitions(&self) -> Vec<Value> {
        self.tools.iter().map(ToolSpec::definition).collect()
    }

    /// Run a tool by name.
    pub async fn call(&self, name: &str, fs: &FileSystem, args: &Value) -> ToolOutcome {
        match self.get(name) {
            Some(tool) => (tool.handler)(fs, args).await,
            None => Err(format!("unknown tool: {name}")),
        }
    }

    /// The full filesystem tool set.
    pub fn filesystem() -> Self {
        let mut registry = Self::new();
        registry
            .register(
                "list-directory",
                "List the files and subdirectories of a directory. Recursive listings stop five levels down.",
                json!({
                    "type": "object",
                    "properties": {
                        "dirPath": { "type": "string", "description": "Directory to list", "default": "." },
                        "showHidden": { "type": "boolean", "description": "Include entries whose name starts with '.'", "default": false },
                        "recursive": { "type": "boolean", "description": "Attach children to directory entries", "default": false }
                    }
                }),
                handlers::list_directory,
            )
            .register(
                "read-file",
                "Read a file's content together with its size and modification time.",
                json!({
                    "type": "object",
                    "properties": {
                        "filePath": { "type": "string", "description": "File to read" },
                        "encoding": { "type": "string", "enum": ["utf8", "utf-8", "base64"], "default": "utf8" }
                    },
                    "required": ["filePath"]
                }),
                handlers::read_file,
            )
            .register(
                "write-file",
                "Write content to a file, replacing it if present.",
                json!({
                    "type": "object",
                    "properties": {
                        "filePath": { "type": "string", "description": "File to write" },
                        "content": { "type": "string", "description": "Content to write" },
                        "encoding": { "type": "string", "enum": ["utf8", "utf-8", "base64"], "default": "utf8" },
                        "createDirectories": { "type": "boolean", "description": "Create missing parent directories", "default": true }
                    },
                    "required": ["filePath", "content"]
                }),
                handlers::write_file,
            )
            .register(
                "create-directory",
                "Create a directory.",
                json!({
                    "type": "object",
                    "properties": {
                        "dirPath": { "type": "string", "description": "Directory to create" },
                        "recursive": { "type": "boolean", "description": "Create missing parents as well", "default": true }
                    },
                    "required": ["dirPath"]
                }),
                handlers::create_directory,
            )
            .register(
                "delete-file",
                "Delete a file.",
                json!({
                    "type": "object",
                    "properties": {
                        "filePath": { "type": "string", "description": "File to delete" }
                    },
                    "required": ["filePath"]
                }),
                handlers::delete_file,
            )
            .register(
                "delete-directory",
                "Delete a directory.",
                json!({
                    "type": "object",
                    "properties": {
                        "dirPath": { "type": "string", "description": "Directory to delete" },
                        "recursive": { "type": "boolean", "description": "Delete contents as well", "default": false }
                    },
                    "required": ["dirPath"]
                }),
                handlers::delete_directory,
            )
            .register(
                "copy-file",
                "Copy a file. Fails if the destination exists unless overwrite is set.",
                json!({
                    "type": "object",
                    "properties": {
                        "source": { "type": "string", "description": "Source file" },
                        "destination": { "type": "string", "description": "Destination file" },
                        "overwrite": { "type": "boolean", "description": "Replace an existing destination", "default": false }
                    },
                    "required": ["source", "destination"]
                }),
                handlers::copy_file,
            )
            .register(
                "move-file",
                "Move or rename a file. Fails if the destination exists unless overwrite is set.",
                json!({
                    "type": "object",
                    "properties": {
                        "source": { "type": "string", "description": "Source file" },
                        "destination": { "type": "string", "description": "Destination file" },
                        "overwrite": { "type": "boolean", "description": "Replace an existing destination", "default": false }
                    },
                    "required": ["source", "destination"]
                }),
                handlers::move_file,
            )
            .register(
                "get-file-stats",
                "Get type, size, timestamps and permission bits of a file or directory.",
                json!({
                    "type": "object",
                    "properties": {
                        "filePath": { "type": "string", "description": "File or directory" }
                    },
                    "required": ["filePath"]
                }),
                handlers::get_file_stats,
            )
            .register(
                "search-files",
                "Find files by name pattern (* and ?) and optional case-insensitive content substring.",
                json!({
                    "type": "object",
                    "properties": {
                        "directory": { "type": "string", "description": "Root directory of the search" },
                        "pattern": { "type": "string", "description": "File name pattern, e.g. *.log" },
                        "content": { "type": "string", "description": "Substring the file content must contain" },
                        "maxDepth": { "type": "integer", "minimum": 1, "description": "Maximum directory depth", "default": 10 }
                    },
                    "required": ["directory", "pattern"]
                }),
                handlers::search_files,
            );
        registry
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::filesystem()
    }
}
