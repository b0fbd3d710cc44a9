use crate::dom::{Document, SourceJson};
use crate::error::{InspectorError, Result};
use crate::tools::{Tool, ToolContext, ToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parameters for the load_source tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LoadSourceParams {
    /// Raw XML page source as returned by the WebDriver `/source` endpoint
    #[serde(default)]
    pub source: Option<String>,

    /// Previously produced JSON tree, used when no XML is given
    #[serde(default)]
    pub tree: Option<Value>,
}

/// Tool for loading the page source all other tools work on
#[derive(Default)]
pub struct LoadSourceTool;

impl Tool for LoadSourceTool {
    type Params = LoadSourceParams;

    fn name(&self) -> &str {
        "load_source"
    }

    fn execute_typed(&self, params: LoadSourceParams, context: &mut ToolContext) -> Result<ToolResult> {
        let document = match (params.source, params.tree) {
            (Some(source), _) => Document::parse(&source)?,
            (None, Some(tree)) => {
                let tree: SourceJson =
                    serde_json::from_value(tree).map_err(|e| InspectorError::InvalidParams(e.to_string()))?;
                Document::from_json_tree(&tree)?
            }
            (None, None) => {
                return Err(InspectorError::InvalidParams(
                    "Either source or tree must be provided".to_string(),
                ));
            }
        };

        let root = document.node(document.root())?.tag_name.clone();
        let elements = document.len();
        context.load(document);

        Ok(ToolResult::success_with(serde_json::json!({
            "root": root,
            "elements": elements
        })))
    }
}
