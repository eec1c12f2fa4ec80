//! Arithmetic on token values
//!
//! Token authors write values such as `"{spacing.base} * 2"` or
//! `"(16px + 8px) / 2"`. Once references are substituted the remaining string
//! is a small arithmetic expression over numbers that may carry a unit:
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := '-' factor | '(' expr ')' | NUMBER UNIT?
//! ```
//!
//! At most one unit may take part in an expression (`8px * 2` is fine,
//! `8px + 1rem` is not).

use std::fmt;
use thiserror::Error;

/// Deepest parenthesis/unary nesting accepted before giving up
const MAX_DEPTH: usize = 64;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MathError {
    #[error("Unexpected character '{0}' in expression")]
    UnexpectedChar(char),

    #[error("Unexpected end of expression")]
    UnexpectedEnd,

    #[error("Trailing input after expression")]
    TrailingInput,

    #[error("Incompatible units '{0}' and '{1}'")]
    IncompatibleUnits(String, String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Expression nested too deeply")]
    TooDeep,
}

/// A number with an optional unit (`16`, `16px`, `150%`)
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub unit: Option<String>,
}

impl Quantity {
    pub fn new(value: f64, unit: Option<&str>) -> Self {
        Self {
            value,
            unit: unit.map(str::to_string),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_number(self.value))?;
        if let Some(unit) = &self.unit {
            write!(f, "{}", unit)?;
        }
        Ok(())
    }
}

/// Format a number without trailing zeros (`16`, `0.5`, `1.3333`)
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let rounded = format!("{:.4}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Lexeme {
    Number(f64, Option<String>),
    Plus,
    Minus,
    Star,
    Slash,
    Open,
    Close,
}

fn lex(input: &str) -> Result<Vec<Lexeme>, MathError> {
    let chars: Vec<char> = input.chars().collect();
    let mut out = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\n' | '\r' => i += 1,
            '+' => {
                out.push(Lexeme::Plus);
                i += 1;
            }
            '-' => {
                out.push(Lexeme::Minus);
                i += 1;
            }
            '*' => {
                out.push(Lexeme::Star);
                i += 1;
            }
            '/' => {
                out.push(Lexeme::Slash);
                i += 1;
            }
            '(' => {
                out.push(Lexeme::Open);
                i += 1;
            }
            ')' => {
                out.push(Lexeme::Close);
                i += 1;
            }
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                let value: f64 = literal
                    .parse()
                    .map_err(|_| MathError::UnexpectedChar(c))?;

                let unit_start = i;
                while i < chars.len() && (chars[i].is_ascii_alphabetic() || chars[i] == '%') {
                    i += 1;
                }
                let unit = (i > unit_start).then(|| chars[unit_start..i].iter().collect());
                out.push(Lexeme::Number(value, unit));
            }
            other => return Err(MathError::UnexpectedChar(other)),
        }
    }

    Ok(out)
}

struct Parser {
    lexemes: Vec<Lexeme>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Lexeme> {
        self.lexemes.get(self.pos)
    }

    fn next(&mut self) -> Option<Lexeme> {
        let lexeme = self.lexemes.get(self.pos).cloned();
        self.pos += 1;
        lexeme
    }

    fn expr(&mut self) -> Result<Quantity, MathError> {
        let mut acc = self.term()?;
        while let Some(op) = self.peek() {
            let subtract = match op {
                Lexeme::Plus => false,
                Lexeme::Minus => true,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.term()?;
            let unit = merge_units(&acc.unit, &rhs.unit)?;
            let value = if subtract {
                acc.value - rhs.value
            } else {
                acc.value + rhs.value
            };
            acc = Quantity { value, unit };
        }
        Ok(acc)
    }

    fn term(&mut self) -> Result<Quantity, MathError> {
        let mut acc = self.factor()?;
        while let Some(op) = self.peek() {
            let divide = match op {
                Lexeme::Star => false,
                Lexeme::Slash => true,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.factor()?;
            acc = if divide {
                if rhs.value == 0.0 {
                    return Err(MathError::DivisionByZero);
                }
                let unit = match (&acc.unit, &rhs.unit) {
                    // 16px / 8px is a plain ratio
                    (Some(a), Some(b)) if a == b => None,
                    _ => merge_units(&acc.unit, &rhs.unit)?,
                };
                Quantity {
                    value: acc.value / rhs.value,
                    unit,
                }
            } else {
                let unit = merge_units(&acc.unit, &rhs.unit)?;
                Quantity {
                    value: acc.value * rhs.value,
                    unit,
                }
            };
        }
        Ok(acc)
    }

    fn factor(&mut self) -> Result<Quantity, MathError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(MathError::TooDeep);
        }

        let result = match self.next() {
            Some(Lexeme::Minus) => {
                let inner = self.factor()?;
                Ok(Quantity {
                    value: -inner.value,
                    unit: inner.unit,
                })
            }
            Some(Lexeme::Open) => {
                let inner = self.expr()?;
                match self.next() {
                    Some(Lexeme::Close) => Ok(inner),
                    Some(_) => Err(MathError::UnexpectedChar('(')),
                    None => Err(MathError::UnexpectedEnd),
                }
            }
            Some(Lexeme::Number(value, unit)) => Ok(Quantity { value, unit }),
            Some(Lexeme::Close) => Err(MathError::UnexpectedChar(')')),
            Some(Lexeme::Plus) => Err(MathError::UnexpectedChar('+')),
            Some(Lexeme::Star) => Err(MathError::UnexpectedChar('*')),
            Some(Lexeme::Slash) => Err(MathError::UnexpectedChar('/')),
            None => Err(MathError::UnexpectedEnd),
        };

        self.depth -= 1;
        result
    }
}

fn merge_units(a: &Option<String>, b: &Option<String>) -> Result<Option<String>, MathError> {
    match (a, b) {
        (Some(a), Some(b)) if a != b => Err(MathError::IncompatibleUnits(a.clone(), b.clone())),
        (Some(a), _) => Ok(Some(a.clone())),
        (None, b) => Ok(b.clone()),
    }
}

/// Evaluate an arithmetic expression
pub fn evaluate(input: &str) -> Result<Quantity, MathError> {
    let lexemes = lex(input)?;
    let mut parser = Parser {
        lexemes,
        pos: 0,
        depth: 0,
    };
    let result = parser.expr()?;
    if parser.pos < parser.lexemes.len() {
        return Err(MathError::TrailingInput);
    }
    Ok(result)
}

/// Token kinds whose string values may be arithmetic expressions
pub fn is_numeric_kind(kind: &str) -> bool {
    matches!(
        kind,
        "spacing"
            | "sizing"
            | "dimension"
            | "borderRadius"
            | "borderWidth"
            | "fontSizes"
            | "lineHeights"
            | "letterSpacing"
            | "paragraphSpacing"
            | "paragraphIndent"
            | "number"
            | "opacity"
    )
}

/// Simplify a value string if it is an arithmetic expression
///
/// Returns `None` for plain values (`"16px"`, `"Inter"`, `"#fff"`) and for
/// anything that does not evaluate, so callers can keep the original.
pub fn simplify(input: &str) -> Option<String> {
    let trimmed = input.trim();
    // A lone leading minus is a negative literal, not an operation
    let body = trimmed.strip_prefix('-').unwrap_or(trimmed);
    if !body.contains(['+', '-', '*', '/', '(']) {
        return None;
    }
    evaluate(trimmed).ok().map(|q| q.to_string())
}
