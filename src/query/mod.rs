//! Locator evaluation against a parsed page source
//!
//! Each submodule evaluates the subset of one locator language that the builders
//! in [`crate::locators`] emit, so generated locators can be checked offline.

pub mod class_chain;
pub mod predicate;
pub mod uiautomator;
pub mod xpath;

use crate::dom::{Document, NodeId};
use crate::error::Result;
use crate::locators::Strategy;

/// Find all elements matching a locator, in document order
pub fn find_elements(doc: &Document, strategy: Strategy, selector: &str) -> Result<Vec<NodeId>> {
    let by_attribute = |names: &[&str]| -> Vec<NodeId> {
        doc.iter()
            .filter(|(_, node)| names.iter().any(|name| node.attribute_equals(name, selector)))
            .map(|(id, _)| id)
            .collect()
    };

    let found = match strategy {
        Strategy::Id => by_attribute(&["resource-id", "id"]),
        Strategy::AccessibilityId => by_attribute(&["content-desc", "name"]),
        Strategy::ClassName => by_attribute(&["class", "type"]),
        Strategy::XPath => xpath::evaluate(doc, selector)?,
        Strategy::ClassChain => class_chain::evaluate(doc, selector)?,
        Strategy::PredicateString => predicate::evaluate(doc, selector)?,
        Strategy::UiAutomator => uiautomator::evaluate(doc, selector)?,
    };
    log::trace!("{} '{}' matched {} element(s)", strategy, selector, found.len());
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_strategies() {
        let doc = Document::parse(
            r#"<hierarchy>
                 <node resource-id="a" class="android.widget.Button" content-desc="go"/>
                 <node id="a" type="XCUIElementTypeButton" name="go"/>
               </hierarchy>"#,
        )
        .unwrap();

        assert_eq!(find_elements(&doc, Strategy::Id, "a").unwrap(), vec![1, 2]);
        assert_eq!(find_elements(&doc, Strategy::AccessibilityId, "go").unwrap(), vec![1, 2]);
        assert_eq!(find_elements(&doc, Strategy::ClassName, "android.widget.Button").unwrap(), vec![1]);
        assert_eq!(find_elements(&doc, Strategy::ClassName, "missing").unwrap(), Vec::<NodeId>::new());
    }

    #[test]
    fn test_dispatch() {
        let doc = Document::parse(r#"<hierarchy><node text="hi"/></hierarchy>"#).unwrap();

        assert_eq!(find_elements(&doc, Strategy::XPath, "//node").unwrap(), vec![1]);
        assert_eq!(find_elements(&doc, Strategy::PredicateString, "text == 'hi'").unwrap(), vec![1]);
        assert_eq!(find_elements(&doc, Strategy::ClassChain, "node").unwrap(), vec![1]);
        assert_eq!(
            find_elements(&doc, Strategy::UiAutomator, r#"new UiSelector().text("hi")"#).unwrap(),
            vec![1]
        );
        assert!(find_elements(&doc, Strategy::XPath, "node[").is_err());
    }
}
