use thiserror::Error;

/// Errors produced while parsing sources, resolving nodes or evaluating locators
#[derive(Debug, Error)]
pub enum InspectorError {
    #[error("Failed to parse page source: {0}")]
    SourceParseFailed(String),

    #[error("No element at path '{0}'")]
    PathNotFound(String),

    #[error("No element with node id {0}")]
    NodeNotFound(usize),

    #[error("Invalid {strategy} selector: {reason}")]
    InvalidSelector { strategy: String, reason: String },

    #[error("No page source has been loaded")]
    NoSourceLoaded,

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Tool '{tool}' failed: {reason}")]
    ToolExecutionFailed { tool: String, reason: String },

    #[error("Failed to load configuration: {0}")]
    ConfigLoadFailed(String),
}

impl InspectorError {
    pub(crate) fn invalid_selector(strategy: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSelector {
            strategy: strategy.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, InspectorError>;
