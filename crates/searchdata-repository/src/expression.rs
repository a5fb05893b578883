//! Evaluation of `#{...}` value expressions

use crate::accessor::ParametersParameterAccessor;
use crate::error::{RepositoryError, RepositoryResult};
use searchdata_core::Value;
use searchdata_parser::{PathSegment, ValueExpression};

/// Evaluates a parsed value expression against the current invocation's arguments
pub trait ValueExpressionEvaluator: Send + Sync {
    fn evaluate(
        &self,
        expression: &ValueExpression,
        arguments: &ParametersParameterAccessor<'_>,
    ) -> RepositoryResult<Value>;
}

/// Parameter and literal evaluator used when none is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultValueExpressionEvaluator;

impl DefaultValueExpressionEvaluator {
    pub fn new() -> Self {
        Self
    }

    fn walk<'v>(mut value: &'v Value, path: &[PathSegment]) -> RepositoryResult<&'v Value> {
        for segment in path {
            value = match segment {
                PathSegment::Field(name) => value.field(name)?,
                PathSegment::Index(index) => value.element(*index)?,
            };
        }
        Ok(value)
    }
}

impl ValueExpressionEvaluator for DefaultValueExpressionEvaluator {
    fn evaluate(
        &self,
        expression: &ValueExpression,
        arguments: &ParametersParameterAccessor<'_>,
    ) -> RepositoryResult<Value> {
        match expression {
            ValueExpression::Literal(value) => Ok(value.clone()),
            ValueExpression::Parameter { name, path } => {
                let root = arguments.value_by_name(name).ok_or_else(|| {
                    RepositoryError::ExpressionEvaluation(format!(
                        "Method '{}' has no parameter named '{}'",
                        arguments.method().name(),
                        name
                    ))
                })?;
                Self::walk(root, path).cloned()
            }
            ValueExpression::Positional { index, path } => {
                let root = arguments.bindable_value(*index).ok_or_else(|| {
                    RepositoryError::ExpressionEvaluation(format!(
                        "Method '{}' has no argument at position {}",
                        arguments.method().name(),
                        index
                    ))
                })?;
                Self::walk(root, path).cloned()
            }
        }
    }
}
