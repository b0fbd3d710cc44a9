use crate::config::LocatorConfig;
use crate::dom::{Document, NodeId};
use crate::locators::unique::count_matching;
use crate::query::predicate::quote_string;

/// Build an iOS predicate string from the node's own attributes.
///
/// Predicate strings cannot express structure, so there is no ancestor or
/// positional fallback: if no attribute (or pair of attributes) of the node is
/// unique in the document, there is no predicate string for it.
pub fn optimal_predicate_string(doc: &Document, node: NodeId, config: &LocatorConfig) -> Option<String> {
    let element = doc.get(node)?;
    let candidates: Vec<(&str, &str)> = config
        .predicate_attributes
        .iter()
        .filter_map(|name| element.non_empty_attribute(name).map(|v| (name.as_str(), v)))
        .collect();
    let everywhere = || doc.descendants(doc.root());

    for &pair in &candidates {
        if count_matching(doc, everywhere(), None, &[pair]) == 1 {
            return Some(format!("{} == {}", pair.0, quote_string(pair.1)));
        }
    }

    for (i, &first) in candidates.iter().enumerate() {
        for &second in &candidates[i + 1..] {
            if count_matching(doc, everywhere(), None, &[first, second]) == 1 {
                return Some(format!(
                    "{} == {} AND {} == {}",
                    first.0,
                    quote_string(first.1),
                    second.0,
                    quote_string(second.1)
                ));
            }
        }
    }

    log::trace!("Node {} has no unique predicate attributes", node);
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::predicate::evaluate;

    const SOURCE: &str = r#"<AppiumAUT>
  <XCUIElementTypeApplication type="XCUIElementTypeApplication" name="Demo">
    <XCUIElementTypeCell type="XCUIElementTypeCell" name="row" label="hello">
      <XCUIElementTypeStaticText type="XCUIElementTypeStaticText" value="Item"/>
    </XCUIElementTypeCell>
    <XCUIElementTypeCell type="XCUIElementTypeCell" name="row" label="world">
      <XCUIElementTypeStaticText type="XCUIElementTypeStaticText" value="Item"/>
    </XCUIElementTypeCell>
    <XCUIElementTypeButton type="XCUIElementTypeButton" name="go" label="Go"/>
    <XCUIElementTypeButton type="XCUIElementTypeButton" name="go" label="Go"/>
  </XCUIElementTypeApplication>
</AppiumAUT>"#;

    fn predicate_for(doc: &Document, id: NodeId) -> Option<String> {
        let predicate = optimal_predicate_string(doc, id, &LocatorConfig::default())?;
        assert_eq!(evaluate(doc, &predicate).unwrap(), vec![id], "{} must select node {}", predicate, id);
        Some(predicate)
    }

    #[test]
    fn test_single_attribute() {
        let doc = Document::parse(SOURCE).unwrap();

        assert_eq!(predicate_for(&doc, 2).as_deref(), Some(r#"label == "hello""#));
        assert_eq!(predicate_for(&doc, 1).as_deref(), Some(r#"name == "Demo""#));
    }

    #[test]
    fn test_type_is_considered() {
        let doc = Document::parse(r#"<root><a type="Switch"/><a type="Slider"/></root>"#).unwrap();
        assert_eq!(predicate_for(&doc, 2).as_deref(), Some(r#"type == "Slider""#));
    }

    #[test]
    fn test_no_ancestor_fallback() {
        let doc = Document::parse(SOURCE).unwrap();

        // the parent cell has a unique label, but the text itself does not
        assert_eq!(predicate_for(&doc, 3), None);
        assert_eq!(predicate_for(&doc, 5), None);
    }

    #[test]
    fn test_fully_duplicated_nodes() {
        let doc = Document::parse(SOURCE).unwrap();

        assert_eq!(predicate_for(&doc, 6), None);
        assert_eq!(predicate_for(&doc, 7), None);
    }

    #[test]
    fn test_attribute_pair() {
        let doc = Document::parse(
            r#"<root>
                 <a name="x" label="1"/>
                 <a name="x" label="2"/>
                 <a name="y" label="1"/>
               </root>"#,
        )
        .unwrap();

        assert_eq!(predicate_for(&doc, 1).as_deref(), Some(r#"name == "x" AND label == "1""#));
    }
}
