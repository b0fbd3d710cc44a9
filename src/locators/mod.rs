//! Locator suggestion for elements of a page source.
//!
//! [`suggest_locators`] is the entry point: it combines the flat locators
//! derived from an element's own attributes with the optimal structural
//! selectors the target platform supports. Every locator in the returned
//! [`LocatorTable`] selects exactly the element it was built for.

pub mod class_chain;
pub mod predicate;
pub mod simple;
pub mod strategy;
pub mod table;
pub mod uiautomator;
pub mod unique;
pub mod xpath;

pub use class_chain::optimal_class_chain;
pub use predicate::optimal_predicate_string;
pub use simple::simple_suggested_locators;
pub use strategy::Strategy;
pub use table::LocatorTable;
pub use uiautomator::optimal_uiautomator_selector;
pub use unique::is_unique;
pub use xpath::optimal_xpath;

use crate::config::{LocatorConfig, Platform};
use crate::dom::{Document, NodeId};
use crate::error::Result;

/// Build the optimal selector of one structural strategy.
///
/// Flat strategies (`id`, `accessibility id`, `class name`) have no optimal
/// builder and always yield `None`.
pub fn build_optimal(strategy: Strategy, doc: &Document, node: NodeId, config: &LocatorConfig) -> Option<String> {
    match strategy {
        Strategy::XPath => optimal_xpath(doc, node, config),
        Strategy::ClassChain => optimal_class_chain(doc, node, config),
        Strategy::PredicateString => optimal_predicate_string(doc, node, config),
        Strategy::UiAutomator => optimal_uiautomator_selector(doc, node, config),
        Strategy::Id | Strategy::AccessibilityId | Strategy::ClassName => None,
    }
}

/// Suggest every locator that selects exactly `node`, most readable first.
///
/// Flat locators come first, then XPath, then the platform-specific selectors
/// allowed by `config`. Strategies without a unique locator are left out.
pub fn suggest_locators(doc: &Document, node: NodeId, config: &LocatorConfig) -> Result<LocatorTable> {
    let element = doc.node(node)?;
    let mut table = simple_suggested_locators(&element.attributes, Some(doc), config.native_context);

    for strategy in Strategy::OPTIMAL {
        let allowed = match strategy {
            Strategy::ClassChain | Strategy::PredicateString => config.allows(Platform::Ios),
            Strategy::UiAutomator => config.allows(Platform::Android),
            _ => true,
        };
        if allowed {
            table.insert_opt(strategy, build_optimal(strategy, doc, node, config));
        }
    }

    log::debug!("Suggested {} locators for node {}", table.len(), node);
    Ok(table)
}

/// Suggest locators for the element at a path such as `"0.2.1"`
pub fn suggest_locators_for_path(doc: &Document, path: &str, config: &LocatorConfig) -> Result<LocatorTable> {
    let node = doc.find_by_path(path)?;
    suggest_locators(doc, node, config)
}
