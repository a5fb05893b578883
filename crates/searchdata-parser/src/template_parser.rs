//! Query template parser
//!
//! Splits a string query into literal text, positional placeholders (`?0`)
//! and value expressions (`#{#name}`). Templates are parsed once when a
//! repository method is registered; rendering against arguments happens per call.

use crate::error::{ParseError, Result};
use crate::expression_parser::{ExpressionParser, ValueExpression};

/// Piece of a parsed query template
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Text copied to the output unchanged
    Literal(String),

    /// `?N`, the N-th bindable argument
    Positional(usize),

    /// `#{...}`, evaluated against the arguments
    Expression {
        source: String,
        expression: ValueExpression,
    },
}

/// A string query split into segments
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl QueryTemplate {
    /// Parse a query template
    pub fn parse(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((offset, c)) = chars.next() {
            match c {
                '?' if chars.peek().is_some_and(|(_, next)| next.is_ascii_digit()) => {
                    let mut digits = String::new();
                    while let Some(&(_, d)) = chars.peek() {
                        if !d.is_ascii_digit() {
                            break;
                        }
                        digits.push(d);
                        chars.next();
                    }
                    let index = digits.parse::<usize>().map_err(|_| {
                        ParseError::InvalidPlaceholder(format!("?{}", digits))
                    })?;
                    Self::flush(&mut literal, &mut segments);
                    segments.push(Segment::Positional(index));
                }
                '#' if chars.peek().is_some_and(|&(_, next)| next == '{') => {
                    chars.next();
                    let body_start = offset + 2;
                    let body_end = Self::find_closing_brace(source, body_start)
                        .ok_or(ParseError::UnterminatedExpression { offset })?;
                    let body = &source[body_start..body_end];
                    let expression = ExpressionParser::parse(body)?;

                    Self::flush(&mut literal, &mut segments);
                    segments.push(Segment::Expression {
                        source: body.to_string(),
                        expression,
                    });

                    while chars.peek().is_some_and(|&(i, _)| i <= body_end) {
                        chars.next();
                    }
                }
                _ => literal.push(c),
            }
        }
        Self::flush(&mut literal, &mut segments);

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// Original template text
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True when rendering would only copy the source
    pub fn is_static(&self) -> bool {
        self.segments
            .iter()
            .all(|segment| matches!(segment, Segment::Literal(_)))
    }

    /// Highest positional index referenced, either as `?N` or `#{[N]}`
    pub fn max_positional_index(&self) -> Option<usize> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Positional(index) => Some(*index),
                Segment::Expression {
                    expression: ValueExpression::Positional { index, .. },
                    ..
                } => Some(*index),
                _ => None,
            })
            .max()
    }

    /// Parameter names referenced through `#{#name}`
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Expression { expression, .. } => expression.parameter_name(),
            _ => None,
        })
    }

    fn flush(literal: &mut String, segments: &mut Vec<Segment>) {
        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(literal)));
        }
    }

    /// Byte offset of the `}` closing an expression body starting at `start`
    fn find_closing_brace(source: &str, start: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut in_string = false;

        for (i, c) in source[start..].char_indices() {
            match c {
                '\'' => in_string = !in_string,
                '{' if !in_string => depth += 1,
                '}' if !in_string => {
                    if depth == 0 {
                        return Some(start + i);
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }

        None
    }
}
