//! iOS predicate string evaluation.
//!
//! Supports `attribute OP "value"` comparisons with `==`, `!=`, `CONTAINS`,
//! `BEGINSWITH` and `ENDSWITH`, joined by `AND` / `OR` (AND binds tighter).

use crate::dom::{Document, ElementNode, NodeId};
use crate::error::{InspectorError, Result};

const STRATEGY: &str = "-ios predicate string";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Equals,
    NotEquals,
    Contains,
    BeginsWith,
    EndsWith,
}

#[derive(Debug, Clone, PartialEq)]
struct Condition {
    attribute: String,
    operator: Operator,
    value: String,
}

impl Condition {
    fn matches(&self, node: &ElementNode) -> bool {
        let actual = node.get_attribute(&self.attribute).unwrap_or("");
        match self.operator {
            Operator::Equals => actual == self.value,
            Operator::NotEquals => actual != self.value,
            Operator::Contains => actual.contains(&self.value),
            Operator::BeginsWith => actual.starts_with(&self.value),
            Operator::EndsWith => actual.ends_with(&self.value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Str(String),
    Symbol(&'static str),
}

/// A compiled predicate, kept as alternatives of conjunctions
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    any_of: Vec<Vec<Condition>>,
}

impl Predicate {
    /// Compile a predicate string
    pub fn compile(predicate: &str) -> Result<Self> {
        let tokens = tokenize(predicate)?;
        let mut iter = tokens.into_iter().peekable();
        let mut any_of = vec![Vec::new()];

        loop {
            let condition = parse_condition(&mut iter)?;
            if let Some(group) = any_of.last_mut() {
                group.push(condition);
            }
            match iter.next() {
                None => break,
                Some(Token::Word(w)) if w.eq_ignore_ascii_case("and") => {}
                Some(Token::Symbol("&&")) => {}
                Some(Token::Word(w)) if w.eq_ignore_ascii_case("or") => any_of.push(Vec::new()),
                Some(Token::Symbol("||")) => any_of.push(Vec::new()),
                Some(other) => {
                    return Err(InspectorError::invalid_selector(
                        STRATEGY,
                        format!("expected AND or OR, found {:?}", other),
                    ));
                }
            }
        }

        Ok(Self { any_of })
    }

    /// Whether an element satisfies the predicate
    pub fn matches(&self, node: &ElementNode) -> bool {
        self.any_of.iter().any(|group| group.iter().all(|c| c.matches(node)))
    }
}

fn parse_condition(iter: &mut std::iter::Peekable<std::vec::IntoIter<Token>>) -> Result<Condition> {
    let attribute = match iter.next() {
        Some(Token::Word(name)) => name,
        other => {
            return Err(InspectorError::invalid_selector(
                STRATEGY,
                format!("expected an attribute name, found {:?}", other),
            ));
        }
    };
    let operator = match iter.next() {
        Some(Token::Symbol("==" | "=")) => Operator::Equals,
        Some(Token::Symbol("!=" | "<>")) => Operator::NotEquals,
        Some(Token::Word(w)) if w.eq_ignore_ascii_case("contains") => Operator::Contains,
        Some(Token::Word(w)) if w.eq_ignore_ascii_case("beginswith") => Operator::BeginsWith,
        Some(Token::Word(w)) if w.eq_ignore_ascii_case("endswith") => Operator::EndsWith,
        other => {
            return Err(InspectorError::invalid_selector(
                STRATEGY,
                format!("unsupported operator {:?}", other),
            ));
        }
    };
    let value = match iter.next() {
        Some(Token::Str(value)) => value,
        other => {
            return Err(InspectorError::invalid_selector(
                STRATEGY,
                format!("expected a quoted value, found {:?}", other),
            ));
        }
    };
    Ok(Condition {
        attribute,
        operator,
        value,
    })
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '"' || c == '\'' {
            chars.next();
            let mut value = String::new();
            loop {
                match chars.next() {
                    Some('\\') => match chars.next() {
                        Some(escaped) => value.push(escaped),
                        None => {
                            return Err(InspectorError::invalid_selector(STRATEGY, "dangling escape"));
                        }
                    },
                    Some(ch) if ch == c => {
                        tokens.push(Token::Str(value));
                        break;
                    }
                    Some(ch) => value.push(ch),
                    None => {
                        return Err(InspectorError::invalid_selector(STRATEGY, "unterminated string literal"));
                    }
                }
            }
            continue;
        }
        if c.is_alphanumeric() || c == '_' {
            let mut word = String::new();
            while let Some(&ch) = chars.peek() {
                if ch.is_alphanumeric() || matches!(ch, '_' | '.' | '-') {
                    word.push(ch);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Token::Word(word));
            continue;
        }

        chars.next();
        let symbol = match (c, chars.peek().copied()) {
            ('=', Some('=')) => "==",
            ('!', Some('=')) => "!=",
            ('<', Some('>')) => "<>",
            ('&', Some('&')) => "&&",
            ('|', Some('|')) => "||",
            ('=', _) => "=",
            _ => {
                return Err(InspectorError::invalid_selector(
                    STRATEGY,
                    format!("unexpected character '{}'", c),
                ));
            }
        };
        if symbol.len() == 2 {
            chars.next();
        }
        tokens.push(Token::Symbol(symbol));
    }

    Ok(tokens)
}

/// Evaluate a predicate string against every element, in document order
pub fn evaluate(doc: &Document, predicate: &str) -> Result<Vec<NodeId>> {
    let predicate = Predicate::compile(predicate)?;
    Ok(doc
        .iter()
        .filter(|(_, node)| predicate.matches(node))
        .map(|(id, _)| id)
        .collect())
}

/// Quote a value as a double-quoted predicate string literal
pub fn quote_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::parse(
            r#"<AppiumAUT>
                 <XCUIElementTypeApplication type="XCUIElementTypeApplication" name="Demo">
                   <XCUIElementTypeButton type="XCUIElementTypeButton" name="login" label="Log In"/>
                   <XCUIElementTypeButton type="XCUIElementTypeButton" name="signup" label="Log Out"/>
                   <XCUIElementTypeStaticText type="XCUIElementTypeStaticText" value="say &quot;hi&quot;"/>
                 </XCUIElementTypeApplication>
               </AppiumAUT>"#,
        )
        .unwrap()
    }

    #[test]
    fn test_equality() {
        let doc = doc();

        assert_eq!(evaluate(&doc, r#"name == "login""#).unwrap(), vec![2]);
        assert_eq!(evaluate(&doc, r#"type == 'XCUIElementTypeButton'"#).unwrap(), vec![2, 3]);
        assert_eq!(evaluate(&doc, r#"name == "missing""#).unwrap(), Vec::<NodeId>::new());
    }

    #[test]
    fn test_conjunction_and_disjunction() {
        let doc = doc();

        assert_eq!(
            evaluate(&doc, r#"type == "XCUIElementTypeButton" AND label == "Log Out""#).unwrap(),
            vec![3]
        );
        assert_eq!(evaluate(&doc, r#"name == "login" OR name == "signup""#).unwrap(), vec![2, 3]);
        assert_eq!(
            evaluate(&doc, r#"name == "Demo" or name == "login" and label == "nope""#).unwrap(),
            vec![1]
        );
    }

    #[test]
    fn test_string_operators() {
        let doc = doc();

        assert_eq!(evaluate(&doc, r#"label BEGINSWITH "Log""#).unwrap(), vec![2, 3]);
        assert_eq!(evaluate(&doc, r#"label ENDSWITH "In""#).unwrap(), vec![2]);
        assert_eq!(evaluate(&doc, r#"label CONTAINS "g O""#).unwrap(), vec![3]);
        assert_eq!(evaluate(&doc, r#"name != "login" AND type == "XCUIElementTypeButton""#).unwrap(), vec![3]);
    }

    #[test]
    fn test_escaped_quotes() {
        let doc = doc();
        let quoted = quote_string("say \"hi\"");

        assert_eq!(quoted, r#""say \"hi\"""#);
        assert_eq!(evaluate(&doc, &format!("value == {}", quoted)).unwrap(), vec![4]);
    }

    #[test]
    fn test_invalid_predicates() {
        let doc = doc();

        for bad in ["", "name", "name ==", "name == \"x", "name LIKE \"x\"", "name == \"x\" XOR label == \"y\""] {
            assert!(
                matches!(evaluate(&doc, bad), Err(InspectorError::InvalidSelector { .. })),
                "expected failure for {}",
                bad
            );
        }
    }
}
