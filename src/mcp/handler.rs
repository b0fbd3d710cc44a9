use crate::config::LocatorConfig;
use crate::tools::{ToolContext, ToolRegistry, ToolResult};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::router::tool::ToolRouter,
    model::{Implementation, ServerCapabilities, ServerInfo},
    tool_handler,
};
use serde::Serialize;
use std::sync::{Arc, Mutex};

/// MCP server exposing the inspector tools over one shared page source
#[derive(Clone)]
pub struct LocatorServer {
    context: Arc<Mutex<ToolContext>>,
    registry: Arc<ToolRegistry>,
    pub(crate) tool_router: ToolRouter<Self>,
}

impl LocatorServer {
    pub fn new() -> Self {
        Self::with_config(LocatorConfig::default())
    }

    pub fn with_config(config: LocatorConfig) -> Self {
        Self {
            context: Arc::new(Mutex::new(ToolContext::new(config))),
            registry: Arc::new(ToolRegistry::with_defaults()),
            tool_router: Self::tool_router(),
        }
    }

    /// Run a registered tool against the shared context
    pub(crate) fn run(&self, name: &str, params: impl Serialize) -> Result<ToolResult, McpError> {
        let params = serde_json::to_value(params).map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        let mut context = self
            .context
            .lock()
            .map_err(|_| McpError::internal_error("Tool context lock poisoned", None))?;

        self.registry
            .execute(name, params, &mut context)
            .map_err(super::to_mcp_error)
    }
}

impl Default for LocatorServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_handler]
impl ServerHandler for LocatorServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Load an Appium page source with inspector_load_source, browse it with inspector_get_tree, \
                 then ask for unique locators with inspector_suggest_locators or check a selector with \
                 inspector_find_elements."
                    .to_string(),
            ),
            ..Default::default()
        }
    }
}
