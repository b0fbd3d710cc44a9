use crate::config::Platform;
use crate::error::Result;
use crate::locators::suggest_locators;
use crate::tools::{Tool, ToolContext, ToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the suggest_locators tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SuggestLocatorsParams {
    /// Dot-separated path of the element, e.g. "0.2.1"
    pub path: String,

    /// Override whether the session is in a native context
    #[serde(default)]
    pub native_context: Option<bool>,

    /// Restrict platform-specific selectors to one platform
    #[serde(default)]
    pub platform: Option<Platform>,
}

/// Tool for suggesting unique locators for one element
#[derive(Default)]
pub struct SuggestLocatorsTool;

impl Tool for SuggestLocatorsTool {
    type Params = SuggestLocatorsParams;

    fn name(&self) -> &str {
        "suggest_locators"
    }

    fn execute_typed(&self, params: SuggestLocatorsParams, context: &mut ToolContext) -> Result<ToolResult> {
        let mut config = context.config.clone();
        if let Some(native) = params.native_context {
            config = config.native_context(native);
        }
        if let Some(platform) = params.platform {
            config = config.platform(platform);
        }

        let doc = context.document()?;
        let node = doc.find_by_path(&params.path)?;
        let locators = suggest_locators(doc, node, &config)?;

        Ok(ToolResult::success_with(serde_json::json!({
            "path": params.path,
            "tagName": doc.node(node)?.tag_name,
            "locators": locators
        })))
    }
}
