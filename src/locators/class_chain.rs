use crate::config::LocatorConfig;
use crate::dom::{Document, NodeId};
use crate::error::{InspectorError, Result};
use crate::locators::unique::count_matching;
use crate::query::class_chain::scope;
use crate::query::predicate::quote_string;

/// Build the shortest iOS class chain that selects exactly `node`.
///
/// Chains are evaluated from the application element, which therefore has no
/// chain of its own; neither do nodes outside it.
pub fn optimal_class_chain(doc: &Document, node: NodeId, config: &LocatorConfig) -> Option<String> {
    let scope = scope(doc);
    if node == scope || !doc.is_within(scope, node) {
        log::trace!("Node {} is not reachable by class chain", node);
        return None;
    }

    match build(doc, node, scope, config) {
        Ok(chain) => Some(chain),
        Err(e) => {
            log::debug!("Could not build a class chain for node {}: {}", node, e);
            None
        }
    }
}

fn build(doc: &Document, id: NodeId, scope: NodeId, config: &LocatorConfig) -> Result<String> {
    if id == scope {
        return Ok(String::new());
    }
    let node = doc.node(id)?;
    let tag = node.tag_name.as_str();

    for name in &config.class_chain_attributes {
        // backticks delimit the predicate and cannot be escaped inside it
        let Some(value) = node.non_empty_attribute(name).filter(|v| !v.contains('`')) else {
            continue;
        };
        let in_scope = doc.descendants(scope).skip(1);
        if count_matching(doc, in_scope, Some(tag), &[(name.as_str(), value)]) == 1 {
            return Ok(format!("**/{}[`{} == {}`]", tag, name, quote_string(value)));
        }
    }

    let parent = node.parent.ok_or(InspectorError::NodeNotFound(id))?;
    let prefix = build(doc, parent, scope, config)?;
    let segment = match doc.same_tag_position(id) {
        Some((position, count)) if count > 1 => format!("{}[{}]", tag, position),
        _ => tag.to_string(),
    };
    Ok(if prefix.is_empty() {
        segment
    } else {
        format!("{}/{}", prefix, segment)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::class_chain::evaluate;

    const SOURCE: &str = r#"<AppiumAUT>
  <XCUIElementTypeApplication type="XCUIElementTypeApplication" name="Demo">
    <XCUIElementTypeWindow type="XCUIElementTypeWindow">
      <XCUIElementTypeOther type="XCUIElementTypeOther" name="form">
        <XCUIElementTypeTextField type="XCUIElementTypeTextField" value="user"/>
        <XCUIElementTypeTextField type="XCUIElementTypeTextField"/>
        <XCUIElementTypeTextField type="XCUIElementTypeTextField"/>
      </XCUIElementTypeOther>
      <XCUIElementTypeButton type="XCUIElementTypeButton" name="Log In" label="Log In"/>
    </XCUIElementTypeWindow>
    <XCUIElementTypeWindow type="XCUIElementTypeWindow">
      <XCUIElementTypeStaticText type="XCUIElementTypeStaticText"/>
    </XCUIElementTypeWindow>
  </XCUIElementTypeApplication>
</AppiumAUT>"#;

    fn chain_for(doc: &Document, id: NodeId) -> Option<String> {
        let chain = optimal_class_chain(doc, id, &LocatorConfig::default())?;
        assert_eq!(evaluate(doc, &chain).unwrap(), vec![id], "{} must select node {}", chain, id);
        Some(chain)
    }

    #[test]
    fn test_unique_attribute() {
        let doc = Document::parse(SOURCE).unwrap();

        assert_eq!(
            chain_for(&doc, 7).as_deref(),
            Some(r#"**/XCUIElementTypeButton[`name == "Log In"`]"#)
        );
        assert_eq!(
            chain_for(&doc, 4).as_deref(),
            Some(r#"**/XCUIElementTypeTextField[`value == "user"`]"#)
        );
    }

    #[test]
    fn test_anchored_at_ancestor() {
        let doc = Document::parse(SOURCE).unwrap();

        assert_eq!(
            chain_for(&doc, 6).as_deref(),
            Some(r#"**/XCUIElementTypeOther[`name == "form"`]/XCUIElementTypeTextField[3]"#)
        );
    }

    #[test]
    fn test_positional_from_scope() {
        let doc = Document::parse(SOURCE).unwrap();

        assert_eq!(chain_for(&doc, 2).as_deref(), Some("XCUIElementTypeWindow[1]"));
        assert_eq!(
            chain_for(&doc, 9).as_deref(),
            Some("XCUIElementTypeWindow[2]/XCUIElementTypeStaticText")
        );
    }

    #[test]
    fn test_scope_and_outside_have_no_chain() {
        let doc = Document::parse(SOURCE).unwrap();

        assert_eq!(optimal_class_chain(&doc, 0, &LocatorConfig::default()), None);
        assert_eq!(optimal_class_chain(&doc, 1, &LocatorConfig::default()), None);
    }

    #[test]
    fn test_backtick_values_skipped() {
        let doc = Document::parse(
            r#"<XCUIElementTypeApplication>
                 <XCUIElementTypeButton name="a`b"/>
                 <XCUIElementTypeButton name="c"/>
               </XCUIElementTypeApplication>"#,
        )
        .unwrap();

        assert_eq!(chain_for(&doc, 1).as_deref(), Some("XCUIElementTypeButton[1]"));
    }

    #[test]
    fn test_escaped_value() {
        let doc = Document::parse(
            r#"<XCUIElementTypeApplication><XCUIElementTypeButton label='say "hi"'/></XCUIElementTypeApplication>"#,
        )
        .unwrap();

        assert_eq!(
            chain_for(&doc, 1).as_deref(),
            Some(r#"**/XCUIElementTypeButton[`label == "say \"hi\""`]"#)
        );
    }
}
