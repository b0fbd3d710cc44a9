use crate::error::{InspectorError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Mobile platform a page source was captured from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// XCUITest sources: class chain and predicate string locators apply
    Ios,
    /// UiAutomator2 sources: UiAutomator selectors apply
    Android,
}

impl FromStr for Platform {
    type Err = InspectorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ios" => Ok(Platform::Ios),
            "android" => Ok(Platform::Android),
            other => Err(InspectorError::InvalidParams(format!(
                "unknown platform '{}', expected ios or android",
                other
            ))),
        }
    }
}

/// Options controlling locator generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Whether the app is in a native context (accessibility id only applies there)
    pub native_context: bool,

    /// Restrict platform-specific builders; `None` runs all of them
    pub platform: Option<Platform>,

    /// Attributes tried alone, in order, by the XPath builder
    pub xpath_unique_attributes: Vec<String>,

    /// Attributes only tried in pairs by the XPath builder
    pub xpath_maybe_unique_attributes: Vec<String>,

    /// Attributes tried, in order, by the class chain builder
    pub class_chain_attributes: Vec<String>,

    /// Attributes tried, in order, by the predicate string builder
    pub predicate_attributes: Vec<String>,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            native_context: true,
            platform: None,
            xpath_unique_attributes: strings(&["id", "resource-id", "content-desc", "name", "accessibility-id"]),
            xpath_maybe_unique_attributes: strings(&["label", "text", "value"]),
            class_chain_attributes: strings(&["name", "label", "value"]),
            predicate_attributes: strings(&["name", "label", "value", "type"]),
        }
    }
}

impl LocatorConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set native context
    pub fn native_context(mut self, native: bool) -> Self {
        self.native_context = native;
        self
    }

    /// Builder method: restrict to a platform
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Builder method: set the attributes the XPath builder tries alone
    pub fn xpath_unique_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.xpath_unique_attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    /// Load a configuration from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| InspectorError::ConfigLoadFailed(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&text)
            .map_err(|e| InspectorError::ConfigLoadFailed(format!("{}: {}", path.display(), e)))
    }

    /// Whether builders for this platform should run
    pub fn allows(&self, platform: Platform) -> bool {
        self.platform.is_none_or(|p| p == platform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = LocatorConfig::new()
            .native_context(false)
            .platform(Platform::Ios)
            .xpath_unique_attributes(["name"]);

        assert!(!config.native_context);
        assert_eq!(config.platform, Some(Platform::Ios));
        assert_eq!(config.xpath_unique_attributes, vec!["name".to_string()]);
        assert!(config.allows(Platform::Ios));
        assert!(!config.allows(Platform::Android));
    }

    #[test]
    fn test_default_allows_everything() {
        let config = LocatorConfig::default();

        assert!(config.native_context);
        assert!(config.allows(Platform::Ios));
        assert!(config.allows(Platform::Android));
    }

    #[test]
    fn test_partial_json() {
        let config: LocatorConfig =
            serde_json::from_str(r#"{"platform": "android", "class_chain_attributes": ["name"]}"#).unwrap();

        assert_eq!(config.platform, Some(Platform::Android));
        assert_eq!(config.class_chain_attributes, vec!["name".to_string()]);
        assert_eq!(config.predicate_attributes, LocatorConfig::default().predicate_attributes);
    }

    #[test]
    fn test_platform_from_str() {
        assert_eq!("iOS".parse::<Platform>().unwrap(), Platform::Ios);
        assert_eq!("android".parse::<Platform>().unwrap(), Platform::Android);
        assert!("windows".parse::<Platform>().is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = LocatorConfig::from_json_file("/nonexistent/locators.json");
        assert!(matches!(result, Err(InspectorError::ConfigLoadFailed(_))));
    }
}
