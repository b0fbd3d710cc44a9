use crate::error::Result;
use crate::locators::Strategy;
use crate::query::find_elements;
use crate::tools::{Tool, ToolContext, ToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the find_elements tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FindElementsParams {
    /// Locator strategy, e.g. "xpath" or "-ios class chain"
    pub strategy: Strategy,

    /// Selector in that strategy's syntax
    pub selector: String,
}

/// Tool for running a locator against the loaded source
#[derive(Default)]
pub struct FindElementsTool;

impl Tool for FindElementsTool {
    type Params = FindElementsParams;

    fn name(&self) -> &str {
        "find_elements"
    }

    fn execute_typed(&self, params: FindElementsParams, context: &mut ToolContext) -> Result<ToolResult> {
        let doc = context.document()?;
        let found = find_elements(doc, params.strategy, &params.selector)?;

        let mut elements = Vec::with_capacity(found.len());
        for id in found {
            elements.push(serde_json::json!({
                "path": doc.path_of(id)?,
                "tagName": doc.node(id)?.tag_name,
            }));
        }

        Ok(ToolResult::success_with(serde_json::json!({
            "strategy": params.strategy,
            "selector": params.selector,
            "count": elements.len(),
            "elements": elements
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use crate::error::InspectorError;
    use serde_json::json;

    fn context() -> ToolContext {
        let mut context = ToolContext::default();
        context.load(
            Document::parse(
                r#"<hierarchy>
                     <android.widget.LinearLayout>
                       <android.widget.TextView resource-id="row" text="One"/>
                       <android.widget.TextView resource-id="row" text="Two"/>
                     </android.widget.LinearLayout>
                   </hierarchy>"#,
            )
            .unwrap(),
        );
        context
    }

    #[test]
    fn test_find_by_xpath() {
        let mut context = context();
        let data = FindElementsTool
            .execute(
                json!({"strategy": "xpath", "selector": "//android.widget.TextView[@resource-id=\"row\"]"}),
                &mut context,
            )
            .unwrap()
            .data
            .unwrap();

        assert_eq!(data["count"], 2);
        assert_eq!(data["elements"][0]["path"], "0.0");
        assert_eq!(data["elements"][1]["path"], "0.1");
    }

    #[test]
    fn test_find_by_uiautomator() {
        let mut context = context();
        let data = FindElementsTool
            .execute(
                json!({"strategy": "-android uiautomator", "selector": "new UiSelector().text(\"Two\")"}),
                &mut context,
            )
            .unwrap()
            .data
            .unwrap();

        assert_eq!(data["strategy"], "-android uiautomator");
        assert_eq!(data["count"], 1);
        assert_eq!(data["elements"][0]["tagName"], "android.widget.TextView");
    }

    #[test]
    fn test_invalid_selector() {
        let mut context = context();
        let err = FindElementsTool.execute(json!({"strategy": "xpath", "selector": "//a[@b="}), &mut context);
        assert!(matches!(err, Err(InspectorError::InvalidSelector { .. })));
    }

    #[test]
    fn test_unknown_strategy() {
        let mut context = context();
        let err = FindElementsTool.execute(json!({"strategy": "css selector", "selector": "a"}), &mut context);
        assert!(matches!(err, Err(InspectorError::InvalidParams(_))));
    }
}
