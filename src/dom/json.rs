use crate::error::{InspectorError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Plain JSON view of a page source, as consumed by tree views
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SourceJson {
    pub tag_name: String,

    #[serde(default)]
    pub attributes: IndexMap<String, String>,

    /// Dot-separated child indices from the root; empty for the root itself
    #[serde(default)]
    pub path: String,

    #[serde(default)]
    pub children: Vec<SourceJson>,
}

impl SourceJson {
    /// Resolve a dot-separated path; the empty path is this element
    pub fn find_by_path(&self, path: &str) -> Result<&SourceJson> {
        let mut current = self;
        if path.is_empty() {
            return Ok(current);
        }

        for segment in path.split('.') {
            current = segment
                .parse::<usize>()
                .ok()
                .and_then(|index| current.children.get(index))
                .ok_or_else(|| InspectorError::PathNotFound(path.to_string()))?;
        }
        Ok(current)
    }

    /// Count elements in this subtree
    pub fn count_elements(&self) -> usize {
        1 + self.children.iter().map(SourceJson::count_elements).sum::<usize>()
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| InspectorError::SourceParseFailed(format!("Failed to serialize source tree: {}", e)))
    }
}

/// Replace newline characters with the two-character sequence `\n`
pub(crate) fn escape_newlines(value: &str) -> String {
    value.replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use crate::dom::source_to_json;

    #[test]
    fn test_source_to_json() {
        let json = source_to_json(
            r#"<xml><child-node a="x">H</child-node><child-node a="y"><leaf/></child-node></xml>"#,
        )
        .unwrap();

        assert_eq!(json.tag_name, "xml");
        assert_eq!(json.path, "");
        assert_eq!(json.children.len(), 2);
        assert_eq!(json.children[0].path, "0");
        assert_eq!(json.children[1].children[0].path, "1.0");
        assert_eq!(json.children[1].attributes.get("a").map(String::as_str), Some("y"));
        assert_eq!(json.count_elements(), 4);
    }

    #[test]
    fn test_newlines_escaped() {
        let json = source_to_json(r#"<root><node text="line one&#10;line two"/></root>"#).unwrap();

        assert_eq!(
            json.children[0].attributes.get("text").map(String::as_str),
            Some("line one\\nline two")
        );
    }

    #[test]
    fn test_find_by_path() {
        let json = source_to_json("<a><b/><c><d/></c></a>").unwrap();

        assert_eq!(json.find_by_path("").unwrap().tag_name, "a");
        assert_eq!(json.find_by_path("1.0").unwrap().tag_name, "d");
        assert!(json.find_by_path("1.1").is_err());
        assert!(json.find_by_path("x").is_err());
    }

    #[test]
    fn test_camel_case_serialization() {
        let json = source_to_json(r#"<a id="1"/>"#).unwrap();
        let text = json.to_json().unwrap();

        assert!(text.contains("\"tagName\": \"a\""));
        assert!(text.contains("\"path\": \"\""));
        assert!(text.contains("\"id\": \"1\""));
    }
}
