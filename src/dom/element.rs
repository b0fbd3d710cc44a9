use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Index of an element inside a [`Document`](crate::dom::Document) arena
pub type NodeId = usize;

/// A single element of a captured UI hierarchy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementNode {
    /// Tag name (e.g. "android.widget.TextView", "XCUIElementTypeButton")
    pub tag_name: String,

    /// Attributes in source order
    #[serde(default)]
    pub attributes: IndexMap<String, String>,

    /// Element children, in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeId>,

    /// Parent element; `None` for the root element
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,

    /// Last node of this element's subtree (the arena is in pre-order)
    #[serde(skip)]
    pub(crate) last_descendant: NodeId,
}

/// Bounding box coordinates for an element
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ElementNode {
    /// Create a detached ElementNode
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
            parent: None,
            last_descendant: 0,
        }
    }

    /// Builder method: set attributes
    pub fn with_attributes(mut self, attributes: IndexMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Add a single attribute
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Get attribute value by key
    pub fn get_attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Get attribute value by key, treating an empty value as missing
    pub fn non_empty_attribute(&self, key: &str) -> Option<&str> {
        self.get_attribute(key).filter(|v| !v.is_empty())
    }

    /// Whether the attribute is present with exactly this value
    pub fn attribute_equals(&self, key: &str, value: &str) -> bool {
        self.get_attribute(key) == Some(value)
    }

    /// Check if element is a specific tag
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name == tag
    }

    /// Class name as UiAutomator sees it: the `class` attribute, else the tag
    pub fn class_name(&self) -> &str {
        self.non_empty_attribute("class").unwrap_or(&self.tag_name)
    }

    /// Screen rectangle described by this element's attributes
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_attributes(&self.attributes)
    }
}

impl BoundingBox {
    /// Create a new BoundingBox
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Parse a rectangle from element attributes.
    ///
    /// Android sources carry `bounds="[x1,y1][x2,y2]"`; iOS sources carry
    /// separate `x`, `y`, `width` and `height` attributes.
    pub fn from_attributes(attributes: &IndexMap<String, String>) -> Option<Self> {
        if let Some(bounds) = attributes.get("bounds") {
            let numbers: Vec<f64> = bounds
                .split(['[', ']', ','])
                .filter(|part| !part.trim().is_empty())
                .map(|part| part.trim().parse::<f64>())
                .collect::<Result<_, _>>()
                .ok()?;
            let [x1, y1, x2, y2] = numbers.as_slice() else {
                return None;
            };
            return Some(Self::new(*x1, *y1, x2 - x1, y2 - y1));
        }

        let number = |key: &str| attributes.get(key)?.trim().parse::<f64>().ok();
        Some(Self::new(
            number("x")?,
            number("y")?,
            number("width")?,
            number("height")?,
        ))
    }

    /// Check if the bounding box is visible (has non-zero dimensions)
    pub fn is_visible(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Calculate the area of the bounding box
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Whether the point lies inside the box (edges inclusive)
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && y >= self.y && x <= self.x + self.width && y <= self.y + self.height
    }
}
