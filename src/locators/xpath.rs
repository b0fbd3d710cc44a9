use crate::config::LocatorConfig;
use crate::dom::{Document, NodeId};
use crate::error::Result;
use crate::query::xpath::{evaluate, quote_literal};

/// How a candidate expression relates to the node it was built for
enum Match {
    /// Selects exactly this node
    Unique,
    /// Selects this node among others, at the given 1-based position
    Among(usize),
    /// Does not select this node, or could not be evaluated
    Miss,
}

fn classify(doc: &Document, xpath: &str, node: NodeId) -> Match {
    match evaluate(doc, xpath) {
        Ok(found) if found == [node] => Match::Unique,
        Ok(found) => found
            .iter()
            .position(|&id| id == node)
            .map_or(Match::Miss, |i| Match::Among(i + 1)),
        Err(e) => {
            log::trace!("Treating '{}' as not unique: {}", xpath, e);
            Match::Miss
        }
    }
}

fn attribute_xpath(tag: &str, pairs: &[(&str, &str)]) -> String {
    let conditions: Vec<String> = pairs
        .iter()
        .map(|(name, value)| format!("@{}={}", name, quote_literal(value)))
        .collect();
    format!("//{}[{}]", tag, conditions.join(" and "))
}

/// Build the shortest XPath that selects exactly `node`.
///
/// Returns `None` when no expression could be computed.
pub fn optimal_xpath(doc: &Document, node: NodeId, config: &LocatorConfig) -> Option<String> {
    match build(doc, node, config, true) {
        Ok(xpath) => Some(xpath),
        Err(e) => {
            log::debug!("Could not build an XPath for node {}: {}", node, e);
            None
        }
    }
}

fn build(doc: &Document, id: NodeId, config: &LocatorConfig, is_target: bool) -> Result<String> {
    let node = doc.node(id)?;
    let tag = node.tag_name.as_str();
    let mut among: Option<String> = None;

    let mut consider = |xpath: String| -> Option<String> {
        match classify(doc, &xpath, id) {
            Match::Unique => Some(xpath),
            Match::Among(position) => {
                among.get_or_insert_with(|| format!("({})[{}]", xpath, position));
                None
            }
            Match::Miss => None,
        }
    };

    let unique_attributes: Vec<(&str, &str)> = config
        .xpath_unique_attributes
        .iter()
        .filter_map(|name| node.non_empty_attribute(name).map(|v| (name.as_str(), v)))
        .collect();
    for &pair in &unique_attributes {
        if let Some(xpath) = consider(attribute_xpath(tag, &[pair])) {
            return Ok(xpath);
        }
    }

    let maybe_attributes = config
        .xpath_maybe_unique_attributes
        .iter()
        .filter_map(|name| node.non_empty_attribute(name).map(|v| (name.as_str(), v)));
    let pair_candidates: Vec<(&str, &str)> = unique_attributes.iter().copied().chain(maybe_attributes).collect();
    for (i, &first) in pair_candidates.iter().enumerate() {
        for &second in &pair_candidates[i + 1..] {
            if let Some(xpath) = consider(attribute_xpath(tag, &[first, second])) {
                return Ok(xpath);
            }
        }
    }

    let Some(parent) = node.parent else {
        return Ok(format!("/{}", tag));
    };

    if doc.count_by_tag(tag) == 1 {
        return Ok(format!("//{}", tag));
    }

    // An ancestor only has to be found once, so an indexed match is good enough
    if !is_target {
        if let Some(xpath) = among {
            return Ok(xpath);
        }
    }

    let prefix = build(doc, parent, config, false)?;
    Ok(match doc.same_tag_position(id) {
        Some((position, count)) if count > 1 => format!("{}/{}[{}]", prefix, tag, position),
        _ => format!("{}/{}", prefix, tag),
    })
}
