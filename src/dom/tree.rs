use crate::dom::element::{ElementNode, NodeId};
use crate::dom::json::{SourceJson, escape_newlines};
use crate::error::{InspectorError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// A parsed UI hierarchy.
///
/// Elements live in an arena in document (pre-)order, so the root is always
/// node `0` and every subtree occupies a contiguous range of ids. Parents are
/// plain indices used for upward traversal; the document is never mutated after
/// it has been built.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    nodes: Vec<ElementNode>,
}

impl Document {
    /// Parse a raw XML page source
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut builder = DocumentBuilder::default();

        loop {
            match reader.read_event() {
                Ok(Event::Start(start)) => builder.open(element_from_start(&start)?)?,
                Ok(Event::Empty(start)) => {
                    builder.open(element_from_start(&start)?)?;
                    builder.close();
                }
                Ok(Event::End(_)) => builder.close(),
                Ok(Event::Eof) => break,
                // Declarations, comments, text and processing instructions carry no locator data
                Ok(_) => {}
                Err(e) => {
                    return Err(InspectorError::SourceParseFailed(format!(
                        "{} at position {}",
                        e,
                        reader.buffer_position()
                    )));
                }
            }
        }

        let document = builder.finish()?;
        log::debug!("Parsed page source with {} elements", document.len());
        Ok(document)
    }

    /// Rebuild a document from its JSON tree representation.
    ///
    /// Attribute values are taken verbatim; escaped newlines stay escaped.
    pub fn from_json_tree(tree: &SourceJson) -> Result<Self> {
        fn visit(builder: &mut DocumentBuilder, json: &SourceJson) -> Result<()> {
            builder.open(ElementNode::new(json.tag_name.clone()).with_attributes(json.attributes.clone()))?;
            for child in &json.children {
                visit(builder, child)?;
            }
            builder.close();
            Ok(())
        }

        let mut builder = DocumentBuilder::default();
        visit(&mut builder, tree)?;
        builder.finish()
    }

    /// Convert to the JSON tree used for tree views, with path identifiers
    pub fn to_json_tree(&self) -> SourceJson {
        self.json_subtree(self.root(), String::new())
    }

    fn json_subtree(&self, id: NodeId, path: String) -> SourceJson {
        let node = &self.nodes[id];
        let children = node
            .children
            .iter()
            .enumerate()
            .map(|(index, &child)| {
                let child_path = if path.is_empty() {
                    index.to_string()
                } else {
                    format!("{}.{}", path, index)
                };
                self.json_subtree(child, child_path)
            })
            .collect();

        SourceJson {
            tag_name: node.tag_name.clone(),
            attributes: node
                .attributes
                .iter()
                .map(|(k, v)| (k.clone(), escape_newlines(v)))
                .collect(),
            path,
            children,
        }
    }

    /// The root element
    pub fn root(&self) -> NodeId {
        0
    }

    /// Number of elements in the document
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A parsed document always has a root element
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node, failing if the id does not belong to this document
    pub fn node(&self, id: NodeId) -> Result<&ElementNode> {
        self.nodes.get(id).ok_or(InspectorError::NodeNotFound(id))
    }

    /// Get a node if the id belongs to this document
    pub fn get(&self, id: NodeId) -> Option<&ElementNode> {
        self.nodes.get(id)
    }

    /// Iterate over all (id, node) pairs in document order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &ElementNode)> {
        self.nodes.iter().enumerate()
    }

    /// Parent element of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id)?.parent
    }

    /// Element children of a node
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// The node and all of its descendants, in document order
    pub fn descendants(&self, id: NodeId) -> std::ops::Range<NodeId> {
        match self.nodes.get(id) {
            Some(node) => id..node.last_descendant + 1,
            None => 0..0,
        }
    }

    /// Whether `id` lies in the subtree rooted at `ancestor` (inclusive)
    pub fn is_within(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.descendants(ancestor).contains(&id)
    }

    /// All elements with the given tag name, in document order
    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, n)| n.is_tag(tag))
            .map(|(id, _)| id)
            .collect()
    }

    /// Count elements with the given tag name
    pub fn count_by_tag(&self, tag: &str) -> usize {
        self.nodes.iter().filter(|n| n.is_tag(tag)).count()
    }

    /// First element whose `resource-id` or `id` attribute equals `value`
    pub fn element_by_id(&self, value: &str) -> Option<NodeId> {
        self.iter()
            .find(|(_, n)| n.attribute_equals("resource-id", value) || n.attribute_equals("id", value))
            .map(|(id, _)| id)
    }

    /// 1-based position of a node among its parent's children with the same tag,
    /// together with the number of such siblings
    pub fn same_tag_position(&self, id: NodeId) -> Option<(usize, usize)> {
        let node = self.nodes.get(id)?;
        let parent = node.parent?;
        let siblings: Vec<NodeId> = self
            .children(parent)
            .iter()
            .copied()
            .filter(|&s| self.nodes[s].tag_name == node.tag_name)
            .collect();
        let position = siblings.iter().position(|&s| s == id)?;
        Some((position + 1, siblings.len()))
    }

    /// Dot-separated child indices locating a node from the root element
    pub fn path_of(&self, id: NodeId) -> Result<String> {
        self.node(id)?;

        let mut indices = Vec::new();
        let mut current = id;
        while let Some(parent) = self.nodes[current].parent {
            let index = self
                .children(parent)
                .iter()
                .position(|&c| c == current)
                .ok_or(InspectorError::NodeNotFound(current))?;
            indices.push(index.to_string());
            current = parent;
        }
        indices.reverse();
        Ok(indices.join("."))
    }

    /// Resolve a dot-separated path; the empty path is the root element
    pub fn find_by_path(&self, path: &str) -> Result<NodeId> {
        let mut current = self.root();
        if path.is_empty() {
            return Ok(current);
        }

        for segment in path.split('.') {
            let index: usize = segment
                .parse()
                .map_err(|_| InspectorError::PathNotFound(path.to_string()))?;
            current = *self
                .children(current)
                .get(index)
                .ok_or_else(|| InspectorError::PathNotFound(path.to_string()))?;
        }
        Ok(current)
    }

    /// The smallest element whose bounds contain the point.
    ///
    /// Later elements win ties, since they are drawn above earlier ones.
    pub fn element_at(&self, x: f64, y: f64) -> Option<NodeId> {
        let mut best: Option<(NodeId, f64)> = None;
        for (id, node) in self.iter() {
            let Some(bbox) = node.bounding_box() else {
                continue;
            };
            if !bbox.is_visible() || !bbox.contains(x, y) {
                continue;
            }
            let area = bbox.area();
            if best.is_none_or(|(_, best_area)| area <= best_area) {
                best = Some((id, area));
            }
        }
        best.map(|(id, _)| id)
    }
}

/// Assembles the arena from open/close events
#[derive(Default)]
struct DocumentBuilder {
    nodes: Vec<ElementNode>,
    open: Vec<NodeId>,
}

impl DocumentBuilder {
    fn open(&mut self, mut node: ElementNode) -> Result<()> {
        let id = self.nodes.len();
        match self.open.last() {
            Some(&parent) => {
                node.parent = Some(parent);
                self.nodes[parent].children.push(id);
            }
            None if !self.nodes.is_empty() => {
                return Err(InspectorError::SourceParseFailed(format!(
                    "multiple root elements (found <{}> after the root)",
                    node.tag_name
                )));
            }
            None => {}
        }
        node.last_descendant = id;
        self.nodes.push(node);
        self.open.push(id);
        Ok(())
    }

    fn close(&mut self) {
        if let Some(id) = self.open.pop() {
            self.nodes[id].last_descendant = self.nodes.len() - 1;
        }
    }

    fn finish(self) -> Result<Document> {
        if let Some(&unclosed) = self.open.last() {
            return Err(InspectorError::SourceParseFailed(format!(
                "unclosed element <{}>",
                self.nodes[unclosed].tag_name
            )));
        }
        if self.nodes.is_empty() {
            return Err(InspectorError::SourceParseFailed("no root element".to_string()));
        }
        Ok(Document { nodes: self.nodes })
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<ElementNode> {
    let mut node = ElementNode::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());

    for attr in start.attributes() {
        let attr = attr.map_err(|e| InspectorError::SourceParseFailed(format!("malformed attribute: {}", e)))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| InspectorError::SourceParseFailed(format!("bad value for attribute '{}': {}", key, e)))?;
        node.add_attribute(key, value.into_owned());
    }

    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<hierarchy rotation="0">
  <!-- status bar -->
  <android.widget.FrameLayout bounds="[0,0][1080,1920]">
    <android.widget.TextView resource-id="title" text="Hello" bounds="[0,0][1080,100]"/>
    <android.widget.TextView text="World" bounds="[0,100][540,200]"/>
    <android.widget.Button content-desc="ok" bounds="[540,100][1080,200]"/>
  </android.widget.FrameLayout>
  <android.widget.FrameLayout bounds="[0,0][1080,1920]">
    <android.widget.EditText resource-id="input" bounds="[100,300][900,400]"/>
  </android.widget.FrameLayout>
</hierarchy>"#;

    #[test]
    fn test_parse_structure() {
        let doc = Document::parse(SOURCE).unwrap();

        assert_eq!(doc.len(), 7);
        assert_eq!(doc.node(doc.root()).unwrap().tag_name, "hierarchy");
        assert_eq!(doc.children(doc.root()).len(), 2);
        assert_eq!(doc.parent(1), Some(0));
        assert_eq!(doc.parent(0), None);
        assert_eq!(doc.descendants(1), 1..5);
        assert_eq!(doc.descendants(5), 5..7);
        assert!(doc.is_within(5, 6));
        assert!(!doc.is_within(1, 6));
    }

    #[test]
    fn test_paths_round_trip() {
        let doc = Document::parse(SOURCE).unwrap();

        for (id, _) in doc.iter() {
            let path = doc.path_of(id).unwrap();
            assert_eq!(doc.find_by_path(&path).unwrap(), id);
        }
        assert_eq!(doc.path_of(0).unwrap(), "");
        assert_eq!(doc.path_of(3).unwrap(), "0.1");
        assert_eq!(doc.path_of(6).unwrap(), "1.0");
    }

    #[test]
    fn test_unresolvable_paths() {
        let doc = Document::parse(SOURCE).unwrap();

        assert!(matches!(doc.find_by_path("0.9"), Err(InspectorError::PathNotFound(_))));
        assert!(matches!(doc.find_by_path("2"), Err(InspectorError::PathNotFound(_))));
        assert!(matches!(doc.find_by_path("a.b"), Err(InspectorError::PathNotFound(_))));
        assert!(matches!(doc.find_by_path("0."), Err(InspectorError::PathNotFound(_))));
    }

    #[test]
    fn test_queries() {
        let doc = Document::parse(SOURCE).unwrap();

        assert_eq!(doc.elements_by_tag("android.widget.TextView"), vec![2, 3]);
        assert_eq!(doc.count_by_tag("android.widget.FrameLayout"), 2);
        assert_eq!(doc.element_by_id("input"), Some(6));
        assert_eq!(doc.element_by_id("missing"), None);
        assert_eq!(doc.same_tag_position(3), Some((2, 2)));
        assert_eq!(doc.same_tag_position(4), Some((1, 1)));
        assert_eq!(doc.same_tag_position(0), None);
    }

    #[test]
    fn test_element_at_prefers_smallest() {
        let doc = Document::parse(SOURCE).unwrap();

        assert_eq!(doc.element_at(500.0, 350.0), Some(6));
        assert_eq!(doc.element_at(600.0, 150.0), Some(4));
        assert_eq!(doc.element_at(5000.0, 5000.0), None);
    }

    #[test]
    fn test_entities_decoded() {
        let doc = Document::parse(r#"<a text="one&#10;two &amp; &quot;three&quot;"/>"#).unwrap();
        assert_eq!(
            doc.node(0).unwrap().get_attribute("text"),
            Some("one\ntwo & \"three\"")
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Document::parse(""), Err(InspectorError::SourceParseFailed(_))));
        assert!(matches!(Document::parse("<a/><b/>"), Err(InspectorError::SourceParseFailed(_))));
        assert!(matches!(Document::parse("<a><b></a>"), Err(InspectorError::SourceParseFailed(_))));
        assert!(matches!(Document::parse("<a><b/>"), Err(InspectorError::SourceParseFailed(_))));
    }

    #[test]
    fn test_json_tree_round_trip() {
        let doc = Document::parse(SOURCE).unwrap();
        let json = doc.to_json_tree();

        assert_eq!(json.tag_name, "hierarchy");
        assert_eq!(json.path, "");
        assert_eq!(json.children[1].children[0].path, "1.0");

        let rebuilt = Document::from_json_tree(&json).unwrap();
        assert_eq!(rebuilt, doc);
    }
}
