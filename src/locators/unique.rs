use crate::dom::{Document, NodeId};

/// Whether `attr_name == attr_value` identifies exactly one element.
///
/// Without a document there is nothing to check against and the pair is
/// assumed unique; callers rely on this for quick suggestions before a source
/// has been fetched.
pub fn is_unique(attr_name: &str, attr_value: &str, document: Option<&Document>) -> bool {
    match document {
        None => true,
        Some(doc) => count_matching(doc, doc.descendants(doc.root()), None, &[(attr_name, attr_value)]) == 1,
    }
}

/// Count candidates with the given tag (any tag if `None`) carrying all attribute pairs
pub fn count_matching(
    doc: &Document,
    candidates: impl IntoIterator<Item = NodeId>,
    tag: Option<&str>,
    pairs: &[(&str, &str)],
) -> usize {
    candidates
        .into_iter()
        .filter_map(|id| doc.get(id))
        .filter(|node| tag.is_none_or(|t| node.is_tag(t)))
        .filter(|node| pairs.iter().all(|(name, value)| node.attribute_equals(name, value)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::parse(
            r#"<hierarchy>
                 <a content-desc="Content Desc" text="one"/>
                 <a content-desc="Content Desc" text="two"/>
                 <b resource-id="only"/>
               </hierarchy>"#,
        )
        .unwrap()
    }

    #[test]
    fn test_unique_pairs() {
        let doc = doc();

        assert!(is_unique("resource-id", "only", Some(&doc)));
        assert!(is_unique("text", "two", Some(&doc)));
        assert!(!is_unique("content-desc", "Content Desc", Some(&doc)));
        assert!(!is_unique("resource-id", "missing", Some(&doc)));
    }

    #[test]
    fn test_without_document_everything_is_unique() {
        assert!(is_unique("content-desc", "Content Desc", None));
        assert!(is_unique("anything", "", None));
    }

    #[test]
    fn test_count_matching() {
        let doc = doc();

        assert_eq!(count_matching(&doc, 0..doc.len(), Some("a"), &[]), 2);
        assert_eq!(count_matching(&doc, 0..doc.len(), Some("a"), &[("content-desc", "Content Desc"), ("text", "one")]), 1);
        assert_eq!(count_matching(&doc, 0..doc.len(), Some("b"), &[("content-desc", "Content Desc")]), 0);
        assert_eq!(count_matching(&doc, 2..doc.len(), None, &[("content-desc", "Content Desc")]), 1);
    }
}
