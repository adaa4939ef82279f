//! The static tool catalog advertised on `tools/list`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// One advertised tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// The four note operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Search,
    Read,
    Write,
    ListFiles,
}

impl ToolKind {
    pub const ALL: [ToolKind; 4] = [
        ToolKind::Search,
        ToolKind::Read,
        ToolKind::Write,
        ToolKind::ListFiles,
    ];

    /// Unqualified tool name, appended to the application prefix.
    pub fn suffix(self) -> &'static str {
        match self {
            ToolKind::Search => "search",
            ToolKind::Read => "read",
            ToolKind::Write => "write",
            ToolKind::ListFiles => "list.files",
        }
    }

    fn description(self) -> &'static str {
        match self {
            ToolKind::Search => "Search Obsidian notes by text query.",
            ToolKind::Read => "Read a note by relative path (e.g., 'Magic/Boros.md').",
            ToolKind::Write => "Write (create/overwrite) a note at relative path.",
            ToolKind::ListFiles => {
                "List files under a directory (relative). If omitted, may list vault root(s) if supported."
            }
        }
    }

    fn input_schema(self) -> Value {
        match self {
            ToolKind::Search => json!({
                "type": "object",
                "properties": { "query": { "type": "string" } },
                "required": ["query"]
            }),
            ToolKind::Read => json!({
                "type": "object",
                "properties": { "path": { "type": "string" } },
                "required": ["path"]
            }),
            ToolKind::Write => json!({
                "type": "object",
                "properties": {
                    "path": { "type": "string" },
                    "content": { "type": "string" }
                },
                "required": ["path", "content"]
            }),
            ToolKind::ListFiles => json!({
                "type": "object",
                "properties": { "dir": { "type": "string" } },
                "required": []
            }),
        }
    }
}

/// Tool descriptors qualified by the application prefix. Built once at startup.
#[derive(Debug, Clone)]
pub struct ToolCatalog {
    tools: Vec<ToolDescriptor>,
}

impl ToolCatalog {
    pub fn new(app_name: impl Into<String>) -> Self {
        let app_name = app_name.into();
        let tools = ToolKind::ALL
            .iter()
            .map(|kind| ToolDescriptor {
                name: format!("{}.{}", app_name, kind.suffix()),
                description: kind.description().to_string(),
                input_schema: kind.input_schema(),
            })
            .collect();
        Self { tools }
    }

    pub fn descriptors(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    /// Exact match against the qualified names only.
    pub fn resolve(&self, name: &str) -> Option<ToolKind> {
        ToolKind::ALL
            .into_iter()
            .zip(&self.tools)
            .find(|(_, tool)| tool.name == name)
            .map(|(kind, _)| kind)
    }
}
