//! Binding invocation arguments to a query method's parameters

use crate::error::{RepositoryError, RepositoryResult};
use crate::method::{ParameterType, QueryMethod};
use crate::paging::{Limit, Pageable, Sort};
use searchdata_core::Value;
use std::collections::BTreeMap;

/// One argument of a repository method invocation
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Value(Value),
    Page(Pageable),
    Sort(Sort),
    Limit(Limit),
}

impl Argument {
    /// Value argument from anything convertible into a [`Value`]
    pub fn value(value: impl Into<Value>) -> Self {
        Argument::Value(value.into())
    }

    fn kind(&self) -> ParameterType {
        match self {
            Argument::Value(_) => ParameterType::Value,
            Argument::Page(_) => ParameterType::Pageable,
            Argument::Sort(_) => ParameterType::Sort,
            Argument::Limit(_) => ParameterType::Limit,
        }
    }
}

impl From<Value> for Argument {
    fn from(value: Value) -> Self {
        Argument::Value(value)
    }
}

impl From<Pageable> for Argument {
    fn from(pageable: Pageable) -> Self {
        Argument::Page(pageable)
    }
}

impl From<Sort> for Argument {
    fn from(sort: Sort) -> Self {
        Argument::Sort(sort)
    }
}

impl From<Limit> for Argument {
    fn from(limit: Limit) -> Self {
        Argument::Limit(limit)
    }
}

/// Arguments of one invocation, checked against the method's parameters
///
/// Borrowed for the duration of one call; nothing here outlives the invocation.
#[derive(Debug)]
pub struct ParametersParameterAccessor<'a> {
    method: &'a QueryMethod,
    arguments: &'a [Argument],
    bindable: Vec<(Option<&'a str>, &'a Value)>,
}

impl<'a> ParametersParameterAccessor<'a> {
    pub fn new(method: &'a QueryMethod, arguments: &'a [Argument]) -> RepositoryResult<Self> {
        let parameters = method.parameters();
        if parameters.len() != arguments.len() {
            return Err(RepositoryError::InvalidArgument(format!(
                "Method '{}' expects {} argument(s), got {}",
                method.name(),
                parameters.len(),
                arguments.len()
            )));
        }

        let mut bindable = Vec::new();
        for (position, (parameter, argument)) in parameters.iter().zip(arguments).enumerate() {
            if parameter.kind() != argument.kind() {
                return Err(RepositoryError::InvalidArgument(format!(
                    "Method '{}': argument {} must be {:?}, got {:?}",
                    method.name(),
                    position,
                    parameter.kind(),
                    argument.kind()
                )));
            }
            if let Argument::Value(value) = argument {
                bindable.push((parameter.name(), value));
            }
        }

        Ok(Self {
            method,
            arguments,
            bindable,
        })
    }

    pub fn method(&self) -> &'a QueryMethod {
        self.method
    }

    /// Values bound into the query, in declaration order
    pub fn bindable_values(&self) -> impl Iterator<Item = &'a Value> + '_ {
        self.bindable.iter().map(|(_, value)| *value)
    }

    /// The N-th bindable value (`?N` / `[N]`)
    pub fn bindable_value(&self, index: usize) -> Option<&'a Value> {
        self.bindable.get(index).map(|(_, value)| *value)
    }

    /// Bindable value by declared parameter name (`#name`)
    pub fn value_by_name(&self, name: &str) -> Option<&'a Value> {
        self.bindable
            .iter()
            .find(|(declared, _)| *declared == Some(name))
            .map(|(_, value)| *value)
    }

    pub fn pageable(&self) -> Option<&'a Pageable> {
        self.method
            .pageable_index()
            .and_then(|index| match &self.arguments[index] {
                Argument::Page(pageable) => Some(pageable),
                _ => None,
            })
    }

    /// Explicit sort argument, else the pageable's sort when it has one
    pub fn sort(&self) -> Option<&'a Sort> {
        let explicit = self
            .method
            .sort_index()
            .and_then(|index| match &self.arguments[index] {
                Argument::Sort(sort) => Some(sort),
                _ => None,
            });
        explicit.or_else(|| self.pageable().map(Pageable::sort).filter(|s| s.is_sorted()))
    }

    pub fn limit(&self) -> Option<Limit> {
        self.method
            .limit_index()
            .and_then(|index| match &self.arguments[index] {
                Argument::Limit(limit) => Some(*limit),
                _ => None,
            })
    }

    /// Bindable values keyed by parameter name, or `argN` when unnamed
    pub fn parameter_map(&self) -> BTreeMap<String, Value> {
        self.bindable
            .iter()
            .enumerate()
            .map(|(index, (name, value))| {
                let key = name
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("arg{}", index));
                (key, (*value).clone())
            })
            .collect()
    }
}
