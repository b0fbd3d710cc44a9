//! Page source parsing and navigation
//!
//! This module turns a raw UI dump into structures the locator builders can walk:
//! - Document: arena tree with parent back-references and path identifiers
//! - ElementNode: a single element with its ordered attributes
//! - SourceJson: plain JSON tree annotated with paths, for tree views
//! - BoundingBox: element rectangles for hit-testing screenshot coordinates

pub mod element;
pub mod json;
pub mod tree;

pub use element::{BoundingBox, ElementNode, NodeId};
pub use json::SourceJson;
pub use tree::Document;

use crate::error::Result;

/// Parse a raw XML page source
pub fn parse_source(xml: &str) -> Result<Document> {
    Document::parse(xml)
}

/// Parse a raw XML page source straight into its JSON tree
pub fn source_to_json(xml: &str) -> Result<SourceJson> {
    Ok(Document::parse(xml)?.to_json_tree())
}
