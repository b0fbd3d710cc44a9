//! Android UiAutomator selector evaluation.
//!
//! Accepts `new UiSelector()` followed by chained criteria. Matching happens in
//! the last top-level hierarchy only, the way UiAutomator2 resolves selectors.

use crate::dom::{Document, ElementNode, NodeId};
use crate::error::{InspectorError, Result};

const STRATEGY: &str = "-android uiautomator";

/// Root of the subtree UiAutomator selectors can reach: the root element's last child
pub fn scope(doc: &Document) -> Option<NodeId> {
    doc.children(doc.root()).last().copied()
}

#[derive(Debug, Clone, PartialEq)]
enum Criterion {
    ResourceId(String),
    Text(String),
    TextContains(String),
    TextStartsWith(String),
    Description(String),
    DescriptionContains(String),
    ClassName(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Selector {
    criteria: Vec<Criterion>,
    instance: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
enum Arg {
    Str(String),
    Int(usize),
}

struct SelectorParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> SelectorParser<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_whitespace();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> Result<()> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", token)))
        }
    }

    fn error(&self, reason: impl Into<String>) -> InspectorError {
        InspectorError::invalid_selector(STRATEGY, format!("{} at offset {}", reason.into(), self.pos))
    }

    fn identifier(&mut self) -> Result<&'a str> {
        self.skip_whitespace();
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error("expected a method name"));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    fn argument(&mut self) -> Result<Arg> {
        self.skip_whitespace();
        let mut chars = self.rest().char_indices();
        match chars.next() {
            Some((_, '"')) => {
                let mut value = String::new();
                while let Some((i, c)) = chars.next() {
                    match c {
                        '"' => {
                            self.pos += i + 1;
                            return Ok(Arg::Str(value));
                        }
                        '\\' => match chars.next() {
                            Some((_, 'n')) => value.push('\n'),
                            Some((_, 't')) => value.push('\t'),
                            Some((_, escaped)) => value.push(escaped),
                            None => break,
                        },
                        _ => value.push(c),
                    }
                }
                Err(self.error("unterminated string literal"))
            }
            Some((_, d)) if d.is_ascii_digit() => {
                let rest = self.rest();
                let len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
                let number = rest[..len].parse().map_err(|_| self.error("number out of range"))?;
                self.pos += len;
                Ok(Arg::Int(number))
            }
            _ => Err(self.error("expected a string or integer argument")),
        }
    }

    fn parse(mut self) -> Result<Selector> {
        self.expect("new")?;
        self.expect("UiSelector")?;
        self.expect("(")?;
        self.expect(")")?;

        let mut selector = Selector::default();
        while self.eat(".") {
            let method = self.identifier()?;
            self.expect("(")?;
            let arg = self.argument()?;
            self.expect(")")?;

            let criterion = match (method, arg) {
                ("resourceId", Arg::Str(v)) => Criterion::ResourceId(v),
                ("text", Arg::Str(v)) => Criterion::Text(v),
                ("textContains", Arg::Str(v)) => Criterion::TextContains(v),
                ("textStartsWith", Arg::Str(v)) => Criterion::TextStartsWith(v),
                ("description", Arg::Str(v)) => Criterion::Description(v),
                ("descriptionContains", Arg::Str(v)) => Criterion::DescriptionContains(v),
                ("className", Arg::Str(v)) => Criterion::ClassName(v),
                ("index", Arg::Int(n)) => Criterion::Index(n),
                ("instance", Arg::Int(n)) => {
                    selector.instance = Some(n);
                    continue;
                }
                (other, _) => return Err(self.error(format!("unsupported call '{}'", other))),
            };
            selector.criteria.push(criterion);
        }

        self.eat(";");
        self.skip_whitespace();
        if !self.rest().is_empty() {
            return Err(self.error("unexpected trailing input"));
        }
        Ok(selector)
    }
}

impl Criterion {
    fn matches(&self, doc: &Document, id: NodeId, node: &ElementNode) -> bool {
        let attr = |key: &str| node.get_attribute(key).unwrap_or("");
        match self {
            Criterion::ResourceId(v) => attr("resource-id") == v,
            Criterion::Text(v) => attr("text") == v,
            Criterion::TextContains(v) => attr("text").contains(v.as_str()),
            Criterion::TextStartsWith(v) => attr("text").starts_with(v.as_str()),
            Criterion::Description(v) => attr("content-desc") == v,
            Criterion::DescriptionContains(v) => attr("content-desc").contains(v.as_str()),
            Criterion::ClassName(v) => node.class_name() == v,
            Criterion::Index(i) => doc
                .parent(id)
                .and_then(|p| doc.children(p).iter().position(|&c| c == id))
                == Some(*i),
        }
    }
}

/// Evaluate a UiSelector chain, returning matches in document order
pub fn evaluate(doc: &Document, selector: &str) -> Result<Vec<NodeId>> {
    let selector = SelectorParser { input: selector, pos: 0 }.parse()?;
    let Some(scope) = scope(doc) else {
        return Ok(Vec::new());
    };

    let matched: Vec<NodeId> = doc
        .descendants(scope)
        .filter(|&id| {
            doc.get(id)
                .is_some_and(|node| selector.criteria.iter().all(|c| c.matches(doc, id, node)))
        })
        .collect();

    Ok(match selector.instance {
        Some(instance) => matched.get(instance).copied().into_iter().collect(),
        None => matched,
    })
}

/// Quote a value as a Java string literal
pub fn quote_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
