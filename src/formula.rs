//! Chemical formula parsing
//!
//! Formulas are tokenized first and then parsed by recursive descent over a
//! small grammar:
//!
//! ```text
//! formula  := sequence EOF
//! sequence := item*
//! item     := ELEMENT count? | OPEN sequence CLOSE count?
//! ELEMENT  := [A-Z][a-z]?
//! count    := DIGITS ('.' DIGITS)?
//! OPEN     := '(' | '['
//! ```
//!
//! Counts are `f64` because decimal multipliers such as `Li0.5` are allowed.
//! Integer formulas produce integral values.

use crate::error::{EmbeddingError, Result};
use std::collections::BTreeMap;

/// Element → atom count mapping produced by the parser.
pub type ElementCounts = BTreeMap<String, f64>;

#[derive(Clone, Debug, PartialEq)]
enum TokenKind {
    Element(String),
    Count(f64),
    Open(char),
    Close(char),
}

#[derive(Clone, Debug, PartialEq)]
struct Token {
    kind: TokenKind,
    position: usize,
}

fn parse_error(formula: &str, position: usize, reason: impl Into<String>) -> EmbeddingError {
    EmbeddingError::FormulaParse {
        formula: formula.to_string(),
        position,
        reason: reason.into(),
    }
}

fn tokenize(formula: &str) -> Result<Vec<Token>> {
    let chars: Vec<(usize, char)> = formula.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (position, c) = chars[i];
        match c {
            c if c.is_ascii_whitespace() => {
                i += 1;
            }
            'A'..='Z' => {
                let mut symbol = c.to_string();
                if let Some(&(_, next)) = chars.get(i + 1) {
                    if next.is_ascii_lowercase() {
                        symbol.push(next);
                        i += 1;
                    }
                }
                i += 1;
                tokens.push(Token {
                    kind: TokenKind::Element(symbol),
                    position,
                });
            }
            '0'..='9' => {
                let start = i;
                while i < chars.len() && chars[i].1.is_ascii_digit() {
                    i += 1;
                }
                if i < chars.len() && chars[i].1 == '.' {
                    i += 1;
                    let fraction_start = i;
                    while i < chars.len() && chars[i].1.is_ascii_digit() {
                        i += 1;
                    }
                    if i == fraction_start {
                        return Err(parse_error(
                            formula,
                            chars[i - 1].0,
                            "decimal point must be followed by digits",
                        ));
                    }
                }
                let text: String = chars[start..i].iter().map(|&(_, c)| c).collect();
                let value: f64 = text
                    .parse()
                    .map_err(|_| parse_error(formula, position, format!("invalid number {text:?}")))?;
                tokens.push(Token {
                    kind: TokenKind::Count(value),
                    position,
                });
            }
            '(' | '[' => {
                i += 1;
                tokens.push(Token {
                    kind: TokenKind::Open(c),
                    position,
                });
            }
            ')' | ']' => {
                i += 1;
                tokens.push(Token {
                    kind: TokenKind::Close(c),
                    position,
                });
            }
            other => {
                return Err(parse_error(
                    formula,
                    position,
                    format!("unexpected character {other:?}"),
                ));
            }
        }
    }

    Ok(tokens)
}

fn closing_for(open: char) -> char {
    match open {
        '[' => ']',
        _ => ')',
    }
}

struct Parser<'a> {
    formula: &'a str,
    tokens: Vec<Token>,
    cursor: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.cursor).cloned();
        self.cursor += 1;
        token
    }

    /// Parse items until a closing bracket or end of input.
    fn sequence(&mut self) -> Result<ElementCounts> {
        let mut counts = ElementCounts::new();

        while let Some(token) = self.peek().cloned() {
            match token.kind {
                TokenKind::Close(_) => break,
                TokenKind::Element(symbol) => {
                    self.cursor += 1;
                    let multiplier = self.count()?;
                    *counts.entry(symbol).or_insert(0.0) += multiplier;
                }
                TokenKind::Open(open) => {
                    self.cursor += 1;
                    let inner = self.sequence()?;
                    match self.bump() {
                        Some(Token {
                            kind: TokenKind::Close(close),
                            position,
                        }) => {
                            if close != closing_for(open) {
                                return Err(parse_error(
                                    self.formula,
                                    position,
                                    format!("{close:?} does not close {open:?}"),
                                ));
                            }
                        }
                        _ => {
                            return Err(parse_error(
                                self.formula,
                                token.position,
                                format!("unclosed {open:?}"),
                            ));
                        }
                    }
                    if inner.is_empty() {
                        return Err(parse_error(self.formula, token.position, "empty group"));
                    }
                    let multiplier = self.count()?;
                    for (symbol, n) in inner {
                        *counts.entry(symbol).or_insert(0.0) += n * multiplier;
                    }
                }
                TokenKind::Count(_) => {
                    return Err(parse_error(
                        self.formula,
                        token.position,
                        "count without a preceding element or group",
                    ));
                }
            }
        }

        Ok(counts)
    }

    /// Optional trailing multiplier, defaulting to 1.
    fn count(&mut self) -> Result<f64> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Count(value),
                position,
            }) => {
                let (value, position) = (*value, *position);
                if value <= 0.0 {
                    return Err(parse_error(
                        self.formula,
                        position,
                        "multiplier must be positive",
                    ));
                }
                self.cursor += 1;
                Ok(value)
            }
            _ => Ok(1.0),
        }
    }
}

/// Parse a chemical formula into an element → count mapping.
///
/// Repeated elements, inside or across groups, are summed. A group's trailing
/// multiplier scales every count inside it. The empty string yields an empty
/// mapping.
///
/// # Examples
///
/// ```
/// use element_embeddings::formula::parse_formula;
///
/// let counts = parse_formula("Li7La3ZrO12").unwrap();
/// assert_eq!(counts["Li"], 7.0);
/// assert_eq!(counts["Zr"], 1.0);
///
/// let counts = parse_formula("Ca3(PO4)2").unwrap();
/// assert_eq!(counts["O"], 8.0);
/// ```
pub fn parse_formula(formula: &str) -> Result<ElementCounts> {
    let tokens = tokenize(formula)?;
    let mut parser = Parser {
        formula,
        tokens,
        cursor: 0,
    };
    let counts = parser.sequence()?;

    if let Some(token) = parser.peek() {
        return Err(parse_error(
            formula,
            token.position,
            "closing bracket without a matching opening bracket",
        ));
    }

    Ok(counts)
}

/// Total number of atoms in a parsed formula.
pub fn atom_count(counts: &ElementCounts) -> f64 {
    counts.values().sum()
}
