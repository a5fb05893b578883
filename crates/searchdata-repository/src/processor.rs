//! String query processor
//!
//! Renders a parsed [`QueryTemplate`] against one invocation's arguments.
//! Rendering keeps no state between calls, so one processor can serve every
//! concurrent invocation of every method.

use crate::accessor::ParametersParameterAccessor;
use crate::conversion::{ConversionService, DefaultConversionService};
use crate::error::{RepositoryError, RepositoryResult};
use crate::expression::{DefaultValueExpressionEvaluator, ValueExpressionEvaluator};
use searchdata_parser::{QueryTemplate, Segment};
use std::sync::Arc;

/// Expands `?N` placeholders and `#{...}` expressions into literal query text
#[derive(Clone)]
pub struct QueryStringProcessor {
    conversion: Arc<dyn ConversionService>,
    evaluator: Arc<dyn ValueExpressionEvaluator>,
}

impl QueryStringProcessor {
    pub fn new(
        conversion: Arc<dyn ConversionService>,
        evaluator: Arc<dyn ValueExpressionEvaluator>,
    ) -> Self {
        Self {
            conversion,
            evaluator,
        }
    }

    pub fn conversion(&self) -> Arc<dyn ConversionService> {
        self.conversion.clone()
    }

    pub fn evaluator(&self) -> Arc<dyn ValueExpressionEvaluator> {
        self.evaluator.clone()
    }

    /// Render `template` with the bound arguments
    pub fn render(
        &self,
        template: &QueryTemplate,
        arguments: &ParametersParameterAccessor<'_>,
    ) -> RepositoryResult<String> {
        let mut rendered = String::with_capacity(template.source().len());

        for segment in template.segments() {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Positional(index) => {
                    let value = arguments.bindable_value(*index).ok_or_else(|| {
                        RepositoryError::ExpressionEvaluation(format!(
                            "No argument bound for placeholder ?{} of method '{}'",
                            index,
                            arguments.method().name()
                        ))
                    })?;
                    rendered.push_str(&self.conversion.convert(value)?);
                }
                Segment::Expression { expression, .. } => {
                    let value = self.evaluator.evaluate(expression, arguments)?;
                    rendered.push_str(&self.conversion.convert(&value)?);
                }
            }
        }

        Ok(rendered)
    }
}

impl Default for QueryStringProcessor {
    fn default() -> Self {
        Self::new(
            Arc::new(DefaultConversionService::new()),
            Arc::new(DefaultValueExpressionEvaluator::new()),
        )
    }
}

impl std::fmt::Debug for QueryStringProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryStringProcessor").finish_non_exhaustive()
    }
}
