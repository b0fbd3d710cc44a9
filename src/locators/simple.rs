use crate::dom::Document;
use crate::locators::unique::is_unique;
use crate::locators::{LocatorTable, Strategy};
use indexmap::IndexMap;

/// Attribute candidates per flat strategy, most preferred first
const SIMPLE_STRATEGIES: [(Strategy, [&str; 2]); 3] = [
    (Strategy::Id, ["resource-id", "id"]),
    (Strategy::AccessibilityId, ["content-desc", "name"]),
    (Strategy::ClassName, ["class", "type"]),
];

/// Suggest `id`, `accessibility id` and `class name` locators from one
/// element's attributes.
///
/// Only the most preferred attribute present is considered for each strategy;
/// when its value is not unique in `document` the strategy is left out rather
/// than falling back to the next attribute. Accessibility ids only exist in a
/// native context.
pub fn simple_suggested_locators(
    attributes: &IndexMap<String, String>,
    document: Option<&Document>,
    native_context: bool,
) -> LocatorTable {
    let mut table = LocatorTable::new();

    for (strategy, candidates) in SIMPLE_STRATEGIES {
        if strategy == Strategy::AccessibilityId && !native_context {
            continue;
        }
        let Some((name, value)) = candidates
            .iter()
            .find_map(|&name| attributes.get(name).filter(|v| !v.is_empty()).map(|v| (name, v)))
        else {
            continue;
        };
        if is_unique(name, value, document) {
            table.insert(strategy, value.as_str());
        } else {
            log::trace!("{} '{}' is not unique, skipping {}", name, value, strategy);
        }
    }

    table
}
