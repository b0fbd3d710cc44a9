//! Named inspector operations with JSON parameters.
//!
//! Each tool implements [`Tool`] with a typed, schema-described parameter
//! struct. The [`ToolRegistry`] erases those types so callers (the MCP server,
//! the CLI, tests) can run any tool by name with a `serde_json::Value`.

pub mod element_at;
pub mod find;
pub mod load_source;
pub mod source_tree;
pub mod suggest;

pub use element_at::{ElementAtParams, ElementAtTool};
pub use find::{FindElementsParams, FindElementsTool};
pub use load_source::{LoadSourceParams, LoadSourceTool};
pub use source_tree::{SourceTreeParams, SourceTreeTool};
pub use suggest::{SuggestLocatorsParams, SuggestLocatorsTool};

use crate::config::LocatorConfig;
use crate::dom::Document;
use crate::error::{InspectorError, Result};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// State shared by tool invocations: configuration and the loaded source
#[derive(Debug, Default)]
pub struct ToolContext {
    pub config: LocatorConfig,
    document: Option<Document>,
}

impl ToolContext {
    pub fn new(config: LocatorConfig) -> Self {
        Self { config, document: None }
    }

    /// Replace the current document
    pub fn load(&mut self, document: Document) {
        log::debug!("Loaded page source with {} elements", document.len());
        self.document = Some(document);
    }

    /// The current document, or [`InspectorError::NoSourceLoaded`]
    pub fn document(&self) -> Result<&Document> {
        self.document.as_ref().ok_or(InspectorError::NoSourceLoaded)
    }

    pub fn has_source(&self) -> bool {
        self.document.is_some()
    }
}

/// Outcome of a tool invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success_with(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// An inspector operation with typed parameters
pub trait Tool: Send + Sync {
    type Params: DeserializeOwned + JsonSchema;

    fn name(&self) -> &str;

    fn execute_typed(&self, params: Self::Params, context: &mut ToolContext) -> Result<ToolResult>;

    fn execute(&self, params: Value, context: &mut ToolContext) -> Result<ToolResult> {
        let params: Self::Params =
            serde_json::from_value(params).map_err(|e| InspectorError::InvalidParams(e.to_string()))?;
        self.execute_typed(params, context)
    }
}

/// Object-safe view of a [`Tool`]
trait DynTool: Send + Sync {
    fn name(&self) -> &str;
    fn execute(&self, params: Value, context: &mut ToolContext) -> Result<ToolResult>;
}

impl<T: Tool> DynTool for T {
    fn name(&self) -> &str {
        Tool::name(self)
    }

    fn execute(&self, params: Value, context: &mut ToolContext) -> Result<ToolResult> {
        Tool::execute(self, params, context)
    }
}

/// Tools by name, in registration order
#[derive(Default)]
pub struct ToolRegistry {
    tools: IndexMap<String, Box<dyn DynTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every inspector tool
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(LoadSourceTool);
        registry.register(SourceTreeTool);
        registry.register(SuggestLocatorsTool);
        registry.register(FindElementsTool);
        registry.register(ElementAtTool);
        registry
    }

    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let name = Tool::name(&tool).to_string();
        self.tools.insert(name, Box::new(tool));
    }

    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    /// Run a tool by name
    pub fn execute(&self, name: &str, params: Value, context: &mut ToolContext) -> Result<ToolResult> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| InspectorError::UnknownTool(name.to_string()))?;
        log::debug!("Executing tool '{}'", name);
        tool.execute(params, context)
    }
}
