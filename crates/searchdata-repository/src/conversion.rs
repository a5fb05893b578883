//! Conversion of bound values into query-literal text

use crate::error::{RepositoryError, RepositoryResult};
use chrono::SecondsFormat;
use searchdata_core::Value;

/// Turns a bound value into the text spliced into a string query
pub trait ConversionService: Send + Sync {
    fn convert(&self, value: &Value) -> RepositoryResult<String>;
}

/// Conversion used when none is configured
///
/// Output is meant to sit inside a JSON string or number position of the
/// template: strings are escaped but not quoted, and array elements are
/// joined with `","` so the template's surrounding quotes close the list.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConversionService;

impl DefaultConversionService {
    pub fn new() -> Self {
        Self
    }

    fn convert_scalar(value: &Value) -> RepositoryResult<String> {
        match value {
            Value::Null => Ok("null".to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Number(n) => Self::format_number(*n),
            Value::String(s) => Ok(escape(s)),
            Value::Timestamp(ts) => Ok(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::Array(_) | Value::Object(_) => Err(RepositoryError::Conversion(format!(
                "cannot convert a nested {} to query text",
                value.type_name()
            ))),
        }
    }

    fn format_number(n: f64) -> RepositoryResult<String> {
        if !n.is_finite() {
            return Err(RepositoryError::Conversion(format!(
                "{} has no query literal",
                n
            )));
        }
        // integral values print without a fractional part
        if n.fract() == 0.0 && n.abs() < 1e15 {
            Ok(format!("{}", n as i64))
        } else {
            Ok(n.to_string())
        }
    }
}

impl ConversionService for DefaultConversionService {
    fn convert(&self, value: &Value) -> RepositoryResult<String> {
        match value {
            Value::Array(items) => {
                let parts = items
                    .iter()
                    .map(Self::convert_scalar)
                    .collect::<RepositoryResult<Vec<_>>>()?;
                Ok(parts.join("\",\""))
            }
            Value::Object(_) => Err(RepositoryError::Conversion(
                "cannot convert an object to query text".to_string(),
            )),
            scalar => Self::convert_scalar(scalar),
        }
    }
}

/// Escape backslashes and double quotes for use inside a JSON string
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '\\' || c == '"' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
