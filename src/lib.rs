//! # locator-inspector
//!
//! A Rust library for generating unique Appium/WebDriver locators from mobile UI hierarchies, designed for AI agent integration.
//!
//! ## Features
//!
//! - **Locator Suggestions**: id, accessibility id and class name from an element's attributes
//! - **Optimal Selectors**: shortest unique XPath, iOS class chain, iOS predicate string and Android UiAutomator selectors
//! - **Locator Evaluation**: run a selector in any of those dialects against a page source
//! - **MCP Server**: Model Context Protocol server so agents can inspect a page source and ask for locators
//!
//! ## MCP Server
//!
//! ```bash
//! cargo run --features mcp-server --bin locator-mcp
//!
//! # Only suggest Android selectors
//! cargo run --features mcp-server --bin locator-mcp -- --platform android
//! ```
//!
//! ## Library Usage
//!
//! ### Suggesting Locators
//!
//! ```rust
//! use locator_inspector::{Document, LocatorConfig, Strategy, suggest_locators_for_path};
//!
//! # fn main() -> locator_inspector::Result<()> {
//! let source = r#"<hierarchy>
//!   <android.widget.FrameLayout class="android.widget.FrameLayout">
//!     <android.widget.Button class="android.widget.Button" resource-id="com.app:id/login"/>
//!   </android.widget.FrameLayout>
//! </hierarchy>"#;
//!
//! let doc = Document::parse(source)?;
//! let locators = suggest_locators_for_path(&doc, "0.0", &LocatorConfig::default())?;
//!
//! assert_eq!(locators.get(Strategy::Id), Some("com.app:id/login"));
//! assert_eq!(
//!     locators.get(Strategy::UiAutomator),
//!     Some(r#"new UiSelector().resourceId("com.app:id/login")"#)
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ### Using the Tool System
//!
//! ```rust
//! use locator_inspector::tools::{ToolContext, ToolRegistry};
//! use serde_json::json;
//!
//! # fn main() -> locator_inspector::Result<()> {
//! let registry = ToolRegistry::with_defaults();
//! let mut context = ToolContext::default();
//!
//! registry.execute("load_source", json!({"source": "<hierarchy><node text='Hi'/></hierarchy>"}), &mut context)?;
//! let found = registry.execute("find_elements", json!({"strategy": "xpath", "selector": "//node"}), &mut context)?;
//! assert_eq!(found.data.unwrap()["count"], 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`dom`]: page source parsing, path identifiers, JSON tree and element geometry
//! - [`locators`]: locator suggestion and the optimal selector builders
//! - [`query`]: evaluation of locators against a page source
//! - [`config`]: options controlling locator generation
//! - [`tools`]: inspector operations (load_source, suggest_locators, find_elements, etc.)
//! - [`error`]: Error types and result aliases
//! - [`mcp`]: **Model Context Protocol server** (requires `mcp-handler` feature)

pub mod config;
pub mod dom;
pub mod error;
pub mod locators;
pub mod query;
pub mod tools;

#[cfg(feature = "mcp-handler")]
pub mod mcp;

pub use config::{LocatorConfig, Platform};
pub use dom::{BoundingBox, Document, ElementNode, NodeId, SourceJson};
pub use error::{InspectorError, Result};
pub use locators::{LocatorTable, Strategy, suggest_locators, suggest_locators_for_path};
pub use query::find_elements;
pub use tools::{Tool, ToolContext, ToolRegistry, ToolResult};

#[cfg(feature = "mcp-handler")]
pub use mcp::LocatorServer;
#[cfg(feature = "mcp-handler")]
pub use rmcp::ServiceExt;
