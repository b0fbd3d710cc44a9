//! XPath evaluation for the location-path subset locators are written in.
//!
//! Supported: absolute `/` and `//` steps, name tests and `*`, positional
//! predicates `[k]`, attribute predicates `[@a="v"]`, `[@a]` joined with `and`,
//! and a parenthesised filter `(expr)[k]` followed by further steps.

use crate::dom::{Document, NodeId};
use crate::error::{InspectorError, Result};

const STRATEGY: &str = "xpath";

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Slash,
    DoubleSlash,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    At,
    Eq,
    Star,
    Name(String),
    Literal(String),
    Number(usize),
    Eof,
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Lexer { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        &self.input[start..self.pos]
    }

    fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.take_while(char::is_whitespace);
            let Some(c) = self.bump() else {
                tokens.push(Token::Eof);
                return Ok(tokens);
            };
            let token = match c {
                '/' if self.peek() == Some('/') => {
                    self.bump();
                    Token::DoubleSlash
                }
                '/' => Token::Slash,
                '(' => Token::LeftParen,
                ')' => Token::RightParen,
                '[' => Token::LeftBracket,
                ']' => Token::RightBracket,
                '@' => Token::At,
                '=' => Token::Eq,
                '*' => Token::Star,
                '"' | '\'' => {
                    let value = self.take_while(|ch| ch != c);
                    if self.bump() != Some(c) {
                        return Err(InspectorError::invalid_selector(STRATEGY, "unterminated string literal"));
                    }
                    Token::Literal(value.to_string())
                }
                d if d.is_ascii_digit() => {
                    let rest = self.take_while(|ch| ch.is_ascii_digit());
                    let number = format!("{}{}", d, rest)
                        .parse()
                        .map_err(|_| InspectorError::invalid_selector(STRATEGY, "number out of range"))?;
                    Token::Number(number)
                }
                n if n.is_alphabetic() || n == '_' => {
                    let rest = self.take_while(|ch| ch.is_alphanumeric() || matches!(ch, '.' | '-' | '_' | ':'));
                    Token::Name(format!("{}{}", n, rest))
                }
                other => {
                    return Err(InspectorError::invalid_selector(
                        STRATEGY,
                        format!("unexpected character '{}'", other),
                    ));
                }
            };
            tokens.push(token);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Step {
    descendant: bool,
    /// `None` matches any element
    name: Option<String>,
    predicates: Vec<Predicate>,
}

#[derive(Debug, Clone, PartialEq)]
enum Predicate {
    Position(usize),
    Attributes(Vec<AttributeTest>),
}

#[derive(Debug, Clone, PartialEq)]
struct AttributeTest {
    name: String,
    /// `None` only checks presence
    value: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Path(Vec<Step>),
    Filter {
        inner: Box<Expr>,
        predicates: Vec<Predicate>,
        steps: Vec<Step>,
    },
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn next(&mut self) -> Token {
        let token = self.peek().clone();
        self.pos += 1;
        token
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        let found = self.next();
        if found == expected {
            Ok(())
        } else {
            Err(InspectorError::invalid_selector(
                STRATEGY,
                format!("expected {:?}, found {:?}", expected, found),
            ))
        }
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        if *self.peek() == Token::LeftParen {
            self.next();
            let inner = self.parse_expr()?;
            self.expect(Token::RightParen)?;
            let predicates = self.parse_predicates()?;
            let steps = self.parse_steps()?;
            return Ok(Expr::Filter {
                inner: Box::new(inner),
                predicates,
                steps,
            });
        }

        let steps = self.parse_steps()?;
        if steps.is_empty() {
            return Err(InspectorError::invalid_selector(
                STRATEGY,
                "only absolute location paths are supported",
            ));
        }
        Ok(Expr::Path(steps))
    }

    fn parse_steps(&mut self) -> Result<Vec<Step>> {
        let mut steps = Vec::new();
        loop {
            let descendant = match self.peek() {
                Token::Slash => false,
                Token::DoubleSlash => true,
                _ => return Ok(steps),
            };
            self.next();
            let name = match self.next() {
                Token::Star => None,
                Token::Name(name) => Some(name),
                other => {
                    return Err(InspectorError::invalid_selector(
                        STRATEGY,
                        format!("expected a name test, found {:?}", other),
                    ));
                }
            };
            let predicates = self.parse_predicates()?;
            steps.push(Step {
                descendant,
                name,
                predicates,
            });
        }
    }

    fn parse_predicates(&mut self) -> Result<Vec<Predicate>> {
        let mut predicates = Vec::new();
        while *self.peek() == Token::LeftBracket {
            self.next();
            let predicate = match self.peek().clone() {
                Token::Number(n) => {
                    self.next();
                    Predicate::Position(n)
                }
                _ => Predicate::Attributes(self.parse_attribute_tests()?),
            };
            self.expect(Token::RightBracket)?;
            predicates.push(predicate);
        }
        Ok(predicates)
    }

    fn parse_attribute_tests(&mut self) -> Result<Vec<AttributeTest>> {
        let mut tests = vec![self.parse_attribute_test()?];
        while *self.peek() == Token::Name("and".to_string()) {
            self.next();
            tests.push(self.parse_attribute_test()?);
        }
        Ok(tests)
    }

    fn parse_attribute_test(&mut self) -> Result<AttributeTest> {
        self.expect(Token::At)?;
        let name = match self.next() {
            Token::Name(name) => name,
            other => {
                return Err(InspectorError::invalid_selector(
                    STRATEGY,
                    format!("expected an attribute name, found {:?}", other),
                ));
            }
        };
        if *self.peek() != Token::Eq {
            return Ok(AttributeTest { name, value: None });
        }
        self.next();
        match self.next() {
            Token::Literal(value) => Ok(AttributeTest {
                name,
                value: Some(value),
            }),
            other => Err(InspectorError::invalid_selector(
                STRATEGY,
                format!("expected a string literal, found {:?}", other),
            )),
        }
    }
}

fn compile(xpath: &str) -> Result<Expr> {
    let tokens = Lexer::new(xpath).tokenize()?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_expr()?;
    match parser.peek() {
        Token::Eof => Ok(expr),
        other => Err(InspectorError::invalid_selector(
            STRATEGY,
            format!("unexpected trailing {:?}", other),
        )),
    }
}

/// Evaluate an XPath expression, returning matching elements in document order
pub fn evaluate(doc: &Document, xpath: &str) -> Result<Vec<NodeId>> {
    let expr = compile(xpath)?;
    Ok(eval_expr(doc, &expr))
}

fn eval_expr(doc: &Document, expr: &Expr) -> Vec<NodeId> {
    match expr {
        // `None` stands for the document node above the root element
        Expr::Path(steps) => eval_steps(doc, vec![None], steps),
        Expr::Filter {
            inner,
            predicates,
            steps,
        } => {
            let selected = apply_predicates(doc, eval_expr(doc, inner), predicates);
            if steps.is_empty() {
                selected
            } else {
                eval_steps(doc, selected.into_iter().map(Some).collect(), steps)
            }
        }
    }
}

fn eval_steps(doc: &Document, mut context: Vec<Option<NodeId>>, steps: &[Step]) -> Vec<NodeId> {
    let mut result = Vec::new();
    for step in steps {
        result = Vec::new();
        for &ctx in &context {
            for siblings in child_lists(doc, ctx, step.descendant) {
                let named: Vec<NodeId> = siblings
                    .into_iter()
                    .filter(|&id| step.name.as_deref().is_none_or(|name| doc.get(id).is_some_and(|n| n.is_tag(name))))
                    .collect();
                result.extend(apply_predicates(doc, named, &step.predicates));
            }
        }
        result.sort_unstable();
        result.dedup();
        context = result.iter().copied().map(Some).collect();
    }
    result
}

/// Candidate child lists for a step; positional predicates apply within each list
fn child_lists(doc: &Document, ctx: Option<NodeId>, descendant: bool) -> Vec<Vec<NodeId>> {
    match (ctx, descendant) {
        (None, false) => vec![vec![doc.root()]],
        (None, true) => std::iter::once(vec![doc.root()])
            .chain(doc.descendants(doc.root()).map(|id| doc.children(id).to_vec()))
            .collect(),
        (Some(id), false) => vec![doc.children(id).to_vec()],
        (Some(id), true) => doc
            .descendants(id)
            .map(|d| doc.children(d).to_vec())
            .collect(),
    }
}

fn apply_predicates(doc: &Document, mut nodes: Vec<NodeId>, predicates: &[Predicate]) -> Vec<NodeId> {
    for predicate in predicates {
        nodes = match predicate {
            Predicate::Position(k) => k
                .checked_sub(1)
                .and_then(|i| nodes.get(i).copied())
                .into_iter()
                .collect(),
            Predicate::Attributes(tests) => nodes
                .into_iter()
                .filter(|&id| {
                    doc.get(id).is_some_and(|node| {
                        tests.iter().all(|test| match &test.value {
                            Some(value) => node.attribute_equals(&test.name, value),
                            None => node.get_attribute(&test.name).is_some(),
                        })
                    })
                })
                .collect(),
        };
    }
    nodes
}

/// Quote a value as an XPath 1.0 string literal.
///
/// XPath 1.0 has no escapes: values containing both quote characters come back
/// double-quoted and fail to compile.
pub fn quote_literal(value: &str) -> String {
    if value.contains('"') && !value.contains('\'') {
        format!("'{}'", value)
    } else {
        format!("\"{}\"", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::parse(
            r#"<xml>
                 <child-node a="x" id="foo"><leaf/></child-node>
                 <child-node a="y" id="foo"><leaf/><leaf b="1"/></child-node>
                 <other id="bar"/>
               </xml>"#,
        )
        .unwrap()
    }

    #[test]
    fn test_absolute_paths() {
        let doc = doc();

        assert_eq!(evaluate(&doc, "/xml").unwrap(), vec![0]);
        assert_eq!(evaluate(&doc, "/child-node").unwrap(), Vec::<NodeId>::new());
        assert_eq!(evaluate(&doc, "/xml/child-node").unwrap(), vec![1, 3]);
        assert_eq!(evaluate(&doc, "/xml/child-node[2]").unwrap(), vec![3]);
        assert_eq!(evaluate(&doc, "/xml/*[3]").unwrap(), vec![6]);
    }

    #[test]
    fn test_descendant_steps() {
        let doc = doc();

        assert_eq!(evaluate(&doc, "//leaf").unwrap(), vec![2, 4, 5]);
        assert_eq!(evaluate(&doc, "//xml").unwrap(), vec![0]);
        // positions apply per parent
        assert_eq!(evaluate(&doc, "//leaf[1]").unwrap(), vec![2, 4]);
        assert_eq!(evaluate(&doc, "/xml//leaf[2]").unwrap(), vec![5]);
    }

    #[test]
    fn test_attribute_predicates() {
        let doc = doc();

        assert_eq!(evaluate(&doc, r#"//child-node[@id="foo"]"#).unwrap(), vec![1, 3]);
        assert_eq!(evaluate(&doc, r#"//child-node[@id="foo" and @a='y']"#).unwrap(), vec![3]);
        assert_eq!(evaluate(&doc, r#"//*[@id="bar"]"#).unwrap(), vec![6]);
        assert_eq!(evaluate(&doc, "//leaf[@b]").unwrap(), vec![5]);
        assert_eq!(evaluate(&doc, r#"//child-node[@id="foo"][2]"#).unwrap(), vec![3]);
    }

    #[test]
    fn test_parenthesised_filter() {
        let doc = doc();

        assert_eq!(evaluate(&doc, r#"(//child-node[@id="foo"])[2]"#).unwrap(), vec![3]);
        assert_eq!(evaluate(&doc, r#"(//child-node[@id="foo"])[2]/leaf[1]"#).unwrap(), vec![4]);
        assert_eq!(evaluate(&doc, "(//leaf)[3]").unwrap(), vec![5]);
        assert_eq!(evaluate(&doc, "(//leaf)[4]").unwrap(), Vec::<NodeId>::new());
    }

    #[test]
    fn test_invalid_expressions() {
        let doc = doc();

        for bad in [
            "",
            "xml",
            "//a[@b=\"c]",
            "//a[@b=\"it's \"quoted\"\"]",
            "//a[contains(@b, 'c')]",
            "//a[",
            "(//a",
            "//a | //b",
        ] {
            assert!(
                matches!(evaluate(&doc, bad), Err(InspectorError::InvalidSelector { .. })),
                "expected failure for {}",
                bad
            );
        }
    }

    #[test]
    fn test_quote_literal() {
        assert_eq!(quote_literal("plain"), "\"plain\"");
        assert_eq!(quote_literal("say \"hi\""), "'say \"hi\"'");
        assert_eq!(quote_literal("it's"), "\"it's\"");
    }
}
