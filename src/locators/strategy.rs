use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Locator strategies, named as Appium/WebDriver expects them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Strategy {
    #[serde(rename = "id")]
    Id,
    #[serde(rename = "accessibility id")]
    AccessibilityId,
    #[serde(rename = "class name")]
    ClassName,
    #[serde(rename = "xpath")]
    XPath,
    #[serde(rename = "-ios class chain")]
    ClassChain,
    #[serde(rename = "-ios predicate string")]
    PredicateString,
    #[serde(rename = "-android uiautomator")]
    UiAutomator,
}

impl Strategy {
    /// Every strategy, in the order suggestions are listed
    pub const ALL: [Strategy; 7] = [
        Strategy::Id,
        Strategy::AccessibilityId,
        Strategy::ClassName,
        Strategy::XPath,
        Strategy::ClassChain,
        Strategy::PredicateString,
        Strategy::UiAutomator,
    ];

    /// Strategies produced by the tree-walking builders
    pub const OPTIMAL: [Strategy; 4] = [
        Strategy::XPath,
        Strategy::ClassChain,
        Strategy::PredicateString,
        Strategy::UiAutomator,
    ];

    /// The strategy name sent to the WebDriver server
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Id => "id",
            Strategy::AccessibilityId => "accessibility id",
            Strategy::ClassName => "class name",
            Strategy::XPath => "xpath",
            Strategy::ClassChain => "-ios class chain",
            Strategy::PredicateString => "-ios predicate string",
            Strategy::UiAutomator => "-android uiautomator",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    /// Accepts the WebDriver names as well as short dashed aliases
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(Strategy::Id),
            "accessibility id" | "accessibility-id" => Ok(Strategy::AccessibilityId),
            "class name" | "class-name" => Ok(Strategy::ClassName),
            "xpath" => Ok(Strategy::XPath),
            "-ios class chain" | "class-chain" => Ok(Strategy::ClassChain),
            "-ios predicate string" | "predicate-string" | "predicate" => Ok(Strategy::PredicateString),
            "-android uiautomator" | "uiautomator" => Ok(Strategy::UiAutomator),
            other => Err(format!("unknown locator strategy '{}'", other)),
        }
    }
}
