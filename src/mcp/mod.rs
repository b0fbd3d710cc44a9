//! MCP (Model Context Protocol) server for page source inspection
//!
//! This module provides rmcp-compatible tools by wrapping the inspector tool implementations.

pub mod handler;
pub use handler::LocatorServer;

use crate::error::InspectorError;
use crate::tools::{
    ElementAtParams, FindElementsParams, LoadSourceParams, SourceTreeParams, SuggestLocatorsParams,
    ToolResult as InternalToolResult,
};
use rmcp::{
    ErrorData as McpError,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    tool, tool_router,
};

/// Map inspector errors onto MCP error codes
fn to_mcp_error(error: InspectorError) -> McpError {
    match error {
        InspectorError::InvalidParams(_)
        | InspectorError::InvalidSelector { .. }
        | InspectorError::PathNotFound(_)
        | InspectorError::NodeNotFound(_)
        | InspectorError::SourceParseFailed(_) => McpError::invalid_params(error.to_string(), None),
        _ => McpError::internal_error(error.to_string(), None),
    }
}

/// Convert internal ToolResult to MCP CallToolResult
fn convert_result(result: InternalToolResult) -> Result<CallToolResult, McpError> {
    if result.success {
        let text = if let Some(data) = result.data {
            serde_json::to_string_pretty(&data).unwrap_or_else(|_| data.to_string())
        } else {
            "Success".to_string()
        };
        Ok(CallToolResult::success(vec![Content::text(text)]))
    } else {
        let error_msg = result.error.unwrap_or_else(|| "Unknown error".to_string());
        Ok(CallToolResult::error(vec![Content::text(error_msg)]))
    }
}

#[tool_router]
impl LocatorServer {
    #[tool(description = "Load an Appium page source (XML, or a JSON tree from inspector_get_tree) to inspect")]
    fn inspector_load_source(&self, params: Parameters<LoadSourceParams>) -> Result<CallToolResult, McpError> {
        if params.0.source.is_none() && params.0.tree.is_none() {
            return Err(McpError::invalid_params("Either source or tree must be provided", None));
        }
        convert_result(self.run("load_source", params.0)?)
    }

    #[tool(description = "Get the loaded page source as a JSON tree; every element carries its path")]
    fn inspector_get_tree(&self, params: Parameters<SourceTreeParams>) -> Result<CallToolResult, McpError> {
        convert_result(self.run("source_tree", params.0)?)
    }

    #[tool(description = "Suggest unique locators (id, accessibility id, class name, xpath, iOS class chain, \
                          iOS predicate string, Android UiAutomator) for the element at a path")]
    fn inspector_suggest_locators(
        &self,
        params: Parameters<SuggestLocatorsParams>,
    ) -> Result<CallToolResult, McpError> {
        convert_result(self.run("suggest_locators", params.0)?)
    }

    #[tool(description = "Find the elements a locator selects in the loaded page source")]
    fn inspector_find_elements(&self, params: Parameters<FindElementsParams>) -> Result<CallToolResult, McpError> {
        convert_result(self.run("find_elements", params.0)?)
    }

    #[tool(description = "Find the innermost element at a screen coordinate and suggest locators for it")]
    fn inspector_element_at(&self, params: Parameters<ElementAtParams>) -> Result<CallToolResult, McpError> {
        convert_result(self.run("element_at", params.0)?)
    }
}
