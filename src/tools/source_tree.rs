use crate::error::{InspectorError, Result};
use crate::tools::{Tool, ToolContext, ToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the source_tree tool
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SourceTreeParams {
    /// Path of the subtree to return; the whole tree when omitted
    #[serde(default)]
    pub path: Option<String>,
}

/// Tool returning the loaded source as a JSON tree with path identifiers
#[derive(Default)]
pub struct SourceTreeTool;

impl Tool for SourceTreeTool {
    type Params = SourceTreeParams;

    fn name(&self) -> &str {
        "source_tree"
    }

    fn execute_typed(&self, params: SourceTreeParams, context: &mut ToolContext) -> Result<ToolResult> {
        let tree = context.document()?.to_json_tree();
        let subtree = tree.find_by_path(params.path.as_deref().unwrap_or(""))?;

        let data = serde_json::to_value(subtree).map_err(|e| InspectorError::ToolExecutionFailed {
            tool: self.name().to_string(),
            reason: e.to_string(),
        })?;
        Ok(ToolResult::success_with(data))
    }
}
