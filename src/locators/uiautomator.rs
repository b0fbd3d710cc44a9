use crate::config::LocatorConfig;
use crate::dom::{Document, NodeId};
use crate::error::Result;
use crate::locators::unique::count_matching;
use crate::query::uiautomator::{quote_string, scope};

/// Attributes UiAutomator can select on, with the matching UiSelector method
const UIAUTOMATOR_ATTRIBUTES: [(&str, &str); 3] = [
    ("resource-id", "resourceId"),
    ("content-desc", "description"),
    ("text", "text"),
];

/// Build a UiSelector chain that selects exactly `node`.
///
/// UiAutomator2 only resolves selectors inside the last top-level hierarchy, so
/// nodes in any earlier hierarchy (and the root itself) have no selector.
pub fn optimal_uiautomator_selector(doc: &Document, node: NodeId, _config: &LocatorConfig) -> Option<String> {
    match build(doc, node) {
        Ok(selector) => selector,
        Err(e) => {
            log::debug!("Could not build a UiSelector for node {}: {}", node, e);
            None
        }
    }
}

fn build(doc: &Document, id: NodeId) -> Result<Option<String>> {
    let node = doc.node(id)?;
    let Some(scope) = scope(doc) else {
        return Ok(None);
    };
    let last_index = doc.children(doc.root()).len() - 1;
    let path = doc.path_of(id)?;
    if path.split('.').next() != Some(last_index.to_string().as_str()) {
        log::trace!("Node at '{}' is outside the last hierarchy", path);
        return Ok(None);
    }

    for (attribute, method) in UIAUTOMATOR_ATTRIBUTES {
        let Some(value) = node.non_empty_attribute(attribute) else {
            continue;
        };
        if count_matching(doc, doc.descendants(scope), None, &[(attribute, value)]) == 1 {
            return Ok(Some(format!("new UiSelector().{}({})", method, quote_string(value))));
        }
    }

    let class_name = node.class_name();
    let same_class: Vec<NodeId> = doc
        .descendants(scope)
        .filter(|&other| doc.get(other).is_some_and(|n| n.class_name() == class_name))
        .collect();
    let selector = format!("new UiSelector().className({})", quote_string(class_name));
    if same_class.len() == 1 {
        return Ok(Some(selector));
    }

    let instance = same_class.iter().position(|&other| other == id).unwrap_or_default();
    Ok(Some(format!("{}.instance({})", selector, instance)))
}
