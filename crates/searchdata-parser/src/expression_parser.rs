//! Expression parser
//!
//! Parses the value expressions found inside `#{...}` blocks of a string query.
//!
//! Supported syntax:
//! - Named parameter access: `#lastName`, `#address.city`, `#tags[0]`
//! - Positional parameter access: `[0]`, `[1].name`
//! - Literals: `'text'` (with `''` as an escaped quote), `42`, `3.5`, `true`, `false`, `null`

use crate::error::{ParseError, Result};
use searchdata_core::Value;

/// One step when walking into a parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

/// A parsed value expression
#[derive(Debug, Clone, PartialEq)]
pub enum ValueExpression {
    /// Constant value
    Literal(Value),

    /// Parameter referenced by its declared name
    Parameter { name: String, path: Vec<PathSegment> },

    /// Parameter referenced by its position among the bindable parameters
    Positional { index: usize, path: Vec<PathSegment> },
}

impl ValueExpression {
    /// Parameter names this expression depends on
    pub fn parameter_name(&self) -> Option<&str> {
        match self {
            ValueExpression::Parameter { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Expression parser
pub struct ExpressionParser;

impl ExpressionParser {
    /// Parse an expression from a string
    pub fn parse(input: &str) -> Result<ValueExpression> {
        let input = input.trim();

        if input.is_empty() {
            return Err(ParseError::InvalidExpression("Empty expression".to_string()));
        }

        if let Some(rest) = input.strip_prefix('#') {
            let (name, rest) = Self::split_identifier(rest);
            if name.is_empty() {
                return Err(ParseError::InvalidExpression(format!(
                    "Expected parameter name after '#': {}",
                    input
                )));
            }
            return Ok(ValueExpression::Parameter {
                name: name.to_string(),
                path: Self::parse_path(rest, input)?,
            });
        }

        if input.starts_with('[') {
            let (index, rest) = Self::parse_index(input, input)?;
            return Ok(ValueExpression::Positional {
                index,
                path: Self::parse_path(rest, input)?,
            });
        }

        Self::parse_literal(input).map(ValueExpression::Literal)
    }

    /// Parse a literal value
    fn parse_literal(input: &str) -> Result<Value> {
        if input.len() >= 2 && input.starts_with('\'') && input.ends_with('\'') {
            let body = &input[1..input.len() - 1];
            // a lone quote inside the body would have ended the literal
            if body.replace("''", "").contains('\'') {
                return Err(ParseError::InvalidExpression(format!(
                    "Unescaped quote in string literal: {}",
                    input
                )));
            }
            return Ok(Value::String(body.replace("''", "'")));
        }

        match input {
            "true" => return Ok(Value::Bool(true)),
            "false" => return Ok(Value::Bool(false)),
            "null" => return Ok(Value::Null),
            _ => {}
        }

        if input.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
            if let Ok(num) = input.parse::<f64>() {
                return Ok(Value::Number(num));
            }
        }

        Err(ParseError::InvalidExpression(format!("Cannot parse: {}", input)))
    }

    /// Parse a trailing access path such as `.city[0].name`
    fn parse_path(mut rest: &str, whole: &str) -> Result<Vec<PathSegment>> {
        let mut path = Vec::new();

        while !rest.is_empty() {
            if let Some(after_dot) = rest.strip_prefix('.') {
                let (field, remainder) = Self::split_identifier(after_dot);
                if field.is_empty() {
                    return Err(ParseError::InvalidExpression(format!(
                        "Expected field name after '.': {}",
                        whole
                    )));
                }
                path.push(PathSegment::Field(field.to_string()));
                rest = remainder;
            } else if rest.starts_with('[') {
                let (index, remainder) = Self::parse_index(rest, whole)?;
                path.push(PathSegment::Index(index));
                rest = remainder;
            } else {
                return Err(ParseError::InvalidExpression(format!(
                    "Unexpected '{}' in {}",
                    rest, whole
                )));
            }
        }

        Ok(path)
    }

    /// Parse `[N]` at the start of the input, returning N and what follows
    fn parse_index<'a>(input: &'a str, whole: &str) -> Result<(usize, &'a str)> {
        let close = input.find(']').ok_or_else(|| {
            ParseError::InvalidExpression(format!("Missing ']' in {}", whole))
        })?;
        let digits = input[1..close].trim();
        let index = digits.parse::<usize>().map_err(|_| {
            ParseError::InvalidExpression(format!("Invalid index '{}' in {}", digits, whole))
        })?;
        Ok((index, &input[close + 1..]))
    }

    /// Split a leading identifier (`[A-Za-z_][A-Za-z0-9_]*`) from the input
    fn split_identifier(input: &str) -> (&str, &str) {
        let end = input
            .char_indices()
            .find(|&(i, c)| {
                !(c == '_' || c.is_ascii_alphabetic() || (i > 0 && c.is_ascii_digit()))
            })
            .map(|(i, _)| i)
            .unwrap_or(input.len());
        input.split_at(end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_parameter() {
        let expr = ExpressionParser::parse("#lastName").unwrap();
        assert_eq!(
            expr,
            ValueExpression::Parameter {
                name: "lastName".to_string(),
                path: vec![],
            }
        );
        assert_eq!(expr.parameter_name(), Some("lastName"));
    }

    #[test]
    fn test_parse_named_parameter_with_path() {
        let expr = ExpressionParser::parse(" #address.city[1].name ").unwrap();
        assert_eq!(
            expr,
            ValueExpression::Parameter {
                name: "address".to_string(),
                path: vec![
                    PathSegment::Field("city".to_string()),
                    PathSegment::Index(1),
                    PathSegment::Field("name".to_string()),
                ],
            }
        );
    }

    #[test]
    fn test_parse_positional_parameter() {
        let expr = ExpressionParser::parse("[2].id").unwrap();
        assert_eq!(
            expr,
            ValueExpression::Positional {
                index: 2,
                path: vec![PathSegment::Field("id".to_string())],
            }
        );
    }

    #[test]
    fn test_parse_literals() {
        assert_eq!(
            ExpressionParser::parse("'it''s'").unwrap(),
            ValueExpression::Literal(Value::String("it's".to_string()))
        );
        assert_eq!(
            ExpressionParser::parse("-4.5").unwrap(),
            ValueExpression::Literal(Value::Number(-4.5))
        );
        assert_eq!(
            ExpressionParser::parse("true").unwrap(),
            ValueExpression::Literal(Value::Bool(true))
        );
        assert_eq!(
            ExpressionParser::parse("null").unwrap(),
            ValueExpression::Literal(Value::Null)
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(ExpressionParser::parse("").is_err());
        assert!(ExpressionParser::parse("#").is_err());
        assert!(ExpressionParser::parse("#a.").is_err());
        assert!(ExpressionParser::parse("[x]").is_err());
        assert!(ExpressionParser::parse("[0").is_err());
        assert!(ExpressionParser::parse("'a'b'").is_err());
        assert!(ExpressionParser::parse("lastName").is_err());
    }
}
