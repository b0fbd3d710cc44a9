use crate::error::Result;
use crate::locators::suggest_locators;
use crate::tools::{Tool, ToolContext, ToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the element_at tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ElementAtParams {
    /// Horizontal screen coordinate
    pub x: f64,

    /// Vertical screen coordinate
    pub y: f64,

    /// Also suggest locators for the element found (default: true)
    #[serde(default = "default_true")]
    pub with_locators: bool,
}

fn default_true() -> bool {
    true
}

/// Tool for resolving a screen point to the element drawn there
#[derive(Default)]
pub struct ElementAtTool;

impl Tool for ElementAtTool {
    type Params = ElementAtParams;

    fn name(&self) -> &str {
        "element_at"
    }

    fn execute_typed(&self, params: ElementAtParams, context: &mut ToolContext) -> Result<ToolResult> {
        let doc = context.document()?;
        let Some(id) = doc.element_at(params.x, params.y) else {
            return Ok(ToolResult::failure(format!("No element at ({}, {})", params.x, params.y)));
        };
        let node = doc.node(id)?;

        let mut data = serde_json::json!({
            "path": doc.path_of(id)?,
            "tagName": node.tag_name,
            "attributes": node.attributes,
        });
        if params.with_locators {
            data["locators"] = serde_json::json!(suggest_locators(doc, id, &context.config)?);
        }
        Ok(ToolResult::success_with(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use serde_json::json;

    fn context() -> ToolContext {
        let mut context = ToolContext::default();
        context.load(
            Document::parse(
                r#"<hierarchy>
                     <android.widget.FrameLayout bounds="[0,0][1080,1920]">
                       <android.widget.Button resource-id="ok" bounds="[100,100][300,200]"/>
                     </android.widget.FrameLayout>
                   </hierarchy>"#,
            )
            .unwrap(),
        );
        context
    }

    #[test]
    fn test_innermost_element() {
        let mut context = context();
        let data = ElementAtTool
            .execute(json!({"x": 150.0, "y": 150.0}), &mut context)
            .unwrap()
            .data
            .unwrap();

        assert_eq!(data["path"], "0.0");
        assert_eq!(data["attributes"]["resource-id"], "ok");
        assert_eq!(data["locators"]["id"], "ok");
    }

    #[test]
    fn test_without_locators() {
        let mut context = context();
        let data = ElementAtTool
            .execute(json!({"x": 900, "y": 1500, "with_locators": false}), &mut context)
            .unwrap()
            .data
            .unwrap();

        assert_eq!(data["path"], "0");
        assert!(data.get("locators").is_none());
    }

    #[test]
    fn test_outside_every_element() {
        let mut context = context();
        let result = ElementAtTool.execute(json!({"x": 2000, "y": 10}), &mut context).unwrap();

        assert!(!result.success);
        assert!(result.error.unwrap().contains("No element"));
    }
}
