//! iOS class chain evaluation.
//!
//! A chain is a `/`-separated list of segments. Each segment is a class name or
//! `*`, optionally prefixed with `**/` to search all descendants instead of direct
//! children, and followed by filters: `[k]` (1-based, negative counts from the
//! end) or a backtick-quoted predicate string.

use crate::dom::{Document, NodeId};
use crate::error::{InspectorError, Result};
use crate::query::predicate::Predicate;

const STRATEGY: &str = "-ios class chain";

/// Tag of the element class chains are evaluated from
pub const APPLICATION_TAG: &str = "XCUIElementTypeApplication";

/// The element a class chain is evaluated from: the application element when the
/// source has one, otherwise the root element
pub fn scope(doc: &Document) -> NodeId {
    doc.iter()
        .find(|(_, node)| node.is_tag(APPLICATION_TAG))
        .map_or(doc.root(), |(id, _)| id)
}

#[derive(Debug, Clone, PartialEq)]
enum Filter {
    Index(isize),
    Predicate(Predicate),
}

#[derive(Debug, Clone, PartialEq)]
struct Segment {
    descendant: bool,
    /// `None` matches any class
    class: Option<String>,
    filters: Vec<Filter>,
}

struct ChainParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> ChainParser<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn eat(&mut self, prefix: &str) -> bool {
        if self.rest().starts_with(prefix) {
            self.pos += prefix.len();
            true
        } else {
            false
        }
    }

    fn take_until(&mut self, stop: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(stop).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn error(&self, reason: impl Into<String>) -> InspectorError {
        InspectorError::invalid_selector(STRATEGY, format!("{} at offset {}", reason.into(), self.pos))
    }

    fn parse(mut self) -> Result<Vec<Segment>> {
        let mut segments = Vec::new();
        loop {
            segments.push(self.parse_segment()?);
            match self.peek() {
                None => return Ok(segments),
                Some('/') => {
                    self.pos += 1;
                }
                Some(other) => return Err(self.error(format!("unexpected '{}'", other))),
            }
        }
    }

    fn parse_segment(&mut self) -> Result<Segment> {
        let descendant = self.eat("**/");
        let class = if self.eat("*") {
            None
        } else {
            let name = self.take_until(|c| matches!(c, '[' | '/'));
            if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || matches!(c, '_' | '.')) {
                return Err(self.error(format!("invalid class name '{}'", name)));
            }
            Some(name.to_string())
        };

        let mut filters = Vec::new();
        while self.eat("[") {
            let filter = if self.eat("`") {
                let predicate = self.take_until(|c| c == '`');
                if !self.eat("`") {
                    return Err(self.error("unterminated predicate"));
                }
                Filter::Predicate(Predicate::compile(predicate)?)
            } else {
                let number = self.take_until(|c| c == ']');
                match number.trim().parse::<isize>() {
                    Ok(0) | Err(_) => return Err(self.error(format!("invalid index '{}'", number))),
                    Ok(index) => Filter::Index(index),
                }
            };
            if !self.eat("]") {
                return Err(self.error("expected ']'"));
            }
            filters.push(filter);
        }

        Ok(Segment {
            descendant,
            class,
            filters,
        })
    }
}

/// Evaluate a class chain from the scope element, returning matches in document order
pub fn evaluate(doc: &Document, chain: &str) -> Result<Vec<NodeId>> {
    let segments = ChainParser { input: chain, pos: 0 }.parse()?;

    let mut context = vec![scope(doc)];
    for segment in &segments {
        let mut matched = Vec::new();
        for &ctx in &context {
            let candidates: Vec<NodeId> = if segment.descendant {
                doc.descendants(ctx).skip(1).collect()
            } else {
                doc.children(ctx).to_vec()
            };
            let named = candidates
                .into_iter()
                .filter(|&id| {
                    segment
                        .class
                        .as_deref()
                        .is_none_or(|class| doc.get(id).is_some_and(|n| n.is_tag(class)))
                })
                .collect();
            matched.extend(apply_filters(doc, named, &segment.filters));
        }
        matched.sort_unstable();
        matched.dedup();
        context = matched;
    }
    Ok(context)
}

fn apply_filters(doc: &Document, mut nodes: Vec<NodeId>, filters: &[Filter]) -> Vec<NodeId> {
    for filter in filters {
        nodes = match filter {
            Filter::Index(index) => {
                let position = if *index > 0 {
                    Some(index.unsigned_abs() - 1)
                } else {
                    nodes.len().checked_sub(index.unsigned_abs())
                };
                position.and_then(|p| nodes.get(p).copied()).into_iter().collect()
            }
            Filter::Predicate(predicate) => nodes
                .into_iter()
                .filter(|&id| doc.get(id).is_some_and(|n| predicate.matches(n)))
                .collect(),
        };
    }
    nodes
}
