//! Method-name grammar for derived queries
//!
//! A derived query method encodes its query in its name:
//!
//! ```text
//! findFirst3ByLastNameAndAgeGreaterThanOrderByAgeDesc
//! └──┬───┘ └─────────────┬─────────────┘└─────┬────┘
//!  subject           predicate              order
//! ```
//!
//! The subject decides the kind of query (select, count, exists, delete) and
//! whether the result is bounded; the predicate is a disjunction of
//! conjunctions of property parts. Translating the tree into the search
//! engine's query DSL is left to the operations layer.

use crate::error::{ParseError, Result};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

const QUERY_PATTERN: &str = "find|read|get|query|search|stream";
const COUNT_PATTERN: &str = "count";
const EXISTS_PATTERN: &str = "exists";
const DELETE_PATTERN: &str = "delete|remove";

fn prefix_template() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^({}|{}|{}|{})((\p{{Lu}}.*?))??By",
            QUERY_PATTERN, COUNT_PATTERN, EXISTS_PATTERN, DELETE_PATTERN
        ))
        .expect("prefix pattern is valid")
    })
}

fn subject_only_template() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^({}|{}|{}|{})(\p{{Lu}}[\p{{L}}\d]*)?$",
            QUERY_PATTERN, COUNT_PATTERN, EXISTS_PATTERN, DELETE_PATTERN
        ))
        .expect("subject pattern is valid")
    })
}

fn limited_query_template() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^({})(Distinct)?(First|Top)(\d*)?(\p{{Lu}}.*?)??(By|$)",
            QUERY_PATTERN
        ))
        .expect("limit pattern is valid")
    })
}

/// What a derived query does with the matching documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Select,
    Count,
    Exists,
    Delete,
}

/// The part of the method name before `By`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    kind: QueryKind,
    distinct: bool,
    max_results: Option<usize>,
}

impl Subject {
    fn parse(method: &str, subject: Option<&str>) -> Result<Self> {
        let Some(subject) = subject else {
            return Ok(Self {
                kind: QueryKind::Select,
                distinct: false,
                max_results: None,
            });
        };

        let kind = if Self::starts_with_keyword(subject, COUNT_PATTERN) {
            QueryKind::Count
        } else if Self::starts_with_keyword(subject, EXISTS_PATTERN) {
            QueryKind::Exists
        } else if Self::starts_with_keyword(subject, DELETE_PATTERN) {
            QueryKind::Delete
        } else {
            QueryKind::Select
        };

        let max_results = match limited_query_template().captures(subject) {
            Some(caps) => match caps.get(4).map(|m| m.as_str()).filter(|d| !d.is_empty()) {
                Some(digits) => Some(digits.parse::<usize>().map_err(|_| {
                    ParseError::InvalidMethodName {
                        method: method.to_string(),
                        message: format!("result limit '{}' is out of range", digits),
                    }
                })?),
                None => Some(1),
            },
            None => None,
        };

        Ok(Self {
            kind,
            distinct: subject.contains("Distinct"),
            max_results,
        })
    }

    fn starts_with_keyword(subject: &str, alternatives: &str) -> bool {
        alternatives.split('|').any(|keyword| {
            subject
                .strip_prefix(keyword)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_uppercase))
        })
    }

    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn max_results(&self) -> Option<usize> {
        self.max_results
    }
}

/// Comparison a part applies to its property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    Between,
    IsNotNull,
    IsNull,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    Before,
    After,
    NotLike,
    Like,
    StartingWith,
    EndingWith,
    IsNotEmpty,
    IsEmpty,
    NotContaining,
    Containing,
    NotIn,
    In,
    Near,
    Within,
    Regex,
    Exists,
    True,
    False,
    NegatingSimpleProperty,
    SimpleProperty,
}

impl PartKind {
    /// Detection order matters: longer keywords that end in a shorter one come first
    const ALL: [PartKind; 27] = [
        PartKind::Between,
        PartKind::IsNotNull,
        PartKind::IsNull,
        PartKind::LessThan,
        PartKind::LessThanEqual,
        PartKind::GreaterThan,
        PartKind::GreaterThanEqual,
        PartKind::Before,
        PartKind::After,
        PartKind::NotLike,
        PartKind::Like,
        PartKind::StartingWith,
        PartKind::EndingWith,
        PartKind::IsNotEmpty,
        PartKind::IsEmpty,
        PartKind::NotContaining,
        PartKind::Containing,
        PartKind::NotIn,
        PartKind::In,
        PartKind::Near,
        PartKind::Within,
        PartKind::Regex,
        PartKind::Exists,
        PartKind::True,
        PartKind::False,
        PartKind::NegatingSimpleProperty,
        PartKind::SimpleProperty,
    ];

    fn keywords(self) -> &'static [&'static str] {
        match self {
            PartKind::Between => &["IsBetween", "Between"],
            PartKind::IsNotNull => &["IsNotNull", "NotNull"],
            PartKind::IsNull => &["IsNull", "Null"],
            PartKind::LessThan => &["IsLessThan", "LessThan"],
            PartKind::LessThanEqual => &["IsLessThanEqual", "LessThanEqual"],
            PartKind::GreaterThan => &["IsGreaterThan", "GreaterThan"],
            PartKind::GreaterThanEqual => &["IsGreaterThanEqual", "GreaterThanEqual"],
            PartKind::Before => &["IsBefore", "Before"],
            PartKind::After => &["IsAfter", "After"],
            PartKind::NotLike => &["IsNotLike", "NotLike"],
            PartKind::Like => &["IsLike", "Like"],
            PartKind::StartingWith => &["IsStartingWith", "StartingWith", "StartsWith"],
            PartKind::EndingWith => &["IsEndingWith", "EndingWith", "EndsWith"],
            PartKind::IsNotEmpty => &["IsNotEmpty", "NotEmpty"],
            PartKind::IsEmpty => &["IsEmpty", "Empty"],
            PartKind::NotContaining => &["IsNotContaining", "NotContaining", "NotContains"],
            PartKind::Containing => &["IsContaining", "Containing", "Contains"],
            PartKind::NotIn => &["IsNotIn", "NotIn"],
            PartKind::In => &["IsIn", "In"],
            PartKind::Near => &["IsNear", "Near"],
            PartKind::Within => &["IsWithin", "Within"],
            PartKind::Regex => &["MatchesRegex", "Matches", "Regex"],
            PartKind::Exists => &["Exists"],
            PartKind::True => &["IsTrue", "True"],
            PartKind::False => &["IsFalse", "False"],
            PartKind::NegatingSimpleProperty => &["IsNot", "Not"],
            PartKind::SimpleProperty => &["Is", "Equals"],
        }
    }

    /// Number of method arguments a part of this kind consumes
    pub fn number_of_arguments(self) -> usize {
        match self {
            PartKind::Between => 2,
            PartKind::IsNotNull
            | PartKind::IsNull
            | PartKind::IsNotEmpty
            | PartKind::IsEmpty
            | PartKind::Exists
            | PartKind::True
            | PartKind::False => 0,
            _ => 1,
        }
    }

    /// Detect the kind from a raw part and return it with the bare property text
    fn detect(raw: &str) -> (PartKind, &str) {
        for kind in Self::ALL {
            for keyword in kind.keywords() {
                if let Some(property) = raw.strip_suffix(keyword) {
                    if !property.is_empty() {
                        return (kind, property);
                    }
                }
            }
        }
        (PartKind::SimpleProperty, raw)
    }
}

/// A single property criterion, e.g. `AgeGreaterThan`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    property: String,
    kind: PartKind,
    ignore_case: bool,
}

impl Part {
    fn parse(method: &str, raw: &str, all_ignore_case: bool) -> Result<Self> {
        let (raw, ignore_case) = strip_ignore_case(raw);
        let (kind, property) = PartKind::detect(raw);

        if property.is_empty() {
            return Err(ParseError::InvalidMethodName {
                method: method.to_string(),
                message: format!("part '{}' has no property", raw),
            });
        }

        Ok(Self {
            property: uncapitalize(property),
            kind,
            ignore_case: ignore_case || all_ignore_case,
        })
    }

    /// Property path in domain notation (`lastName`, `address_city`)
    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn kind(&self) -> PartKind {
        self.kind
    }

    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    pub fn number_of_arguments(&self) -> usize {
        self.kind.number_of_arguments()
    }
}

/// Conjunction of parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrPart {
    parts: Vec<Part>,
}

impl OrPart {
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// One `OrderBy` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub property: String,
    pub direction: Direction,
}

/// Parsed derived-query method name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartTree {
    subject: Subject,
    or_parts: Vec<OrPart>,
    orders: Vec<Order>,
}

impl PartTree {
    /// Parse a method name
    pub fn parse(method: &str) -> Result<Self> {
        if method.is_empty() {
            return Err(ParseError::InvalidMethodName {
                method: String::new(),
                message: "method name is empty".to_string(),
            });
        }

        let (subject, predicate) = match prefix_template().find(method) {
            Some(m) => (Some(m.as_str()), &method[m.end()..]),
            None if subject_only_template().is_match(method) => (Some(method), ""),
            None => (None, method),
        };

        let subject = Subject::parse(method, subject)?;
        let (predicate, orders) = Self::split_order_by(method, predicate)?;
        let (predicate, all_ignore_case) = strip_all_ignore_case(predicate);

        let or_parts = if predicate.is_empty() {
            Vec::new()
        } else {
            split_keyword(predicate, "Or")
                .into_iter()
                .map(|or_text| {
                    let parts = split_keyword(or_text, "And")
                        .into_iter()
                        .map(|raw| Part::parse(method, raw, all_ignore_case))
                        .collect::<Result<Vec<_>>>()?;
                    Ok::<_, ParseError>(OrPart { parts })
                })
                .collect::<Result<Vec<_>>>()?
        };

        tracing::trace!(method, ?subject, parts = or_parts.len(), "parsed part tree");

        Ok(Self {
            subject,
            or_parts,
            orders,
        })
    }

    fn split_order_by<'a>(method: &str, predicate: &'a str) -> Result<(&'a str, Vec<Order>)> {
        let Some(pos) = predicate.find("OrderBy") else {
            return Ok((predicate, Vec::new()));
        };

        let clause = &predicate[pos + "OrderBy".len()..];
        if clause.is_empty() {
            return Err(ParseError::InvalidMethodName {
                method: method.to_string(),
                message: "OrderBy must name at least one property".to_string(),
            });
        }

        let orders = split_order_blocks(clause)
            .into_iter()
            .map(|block| {
                let (property, direction) = if let Some(p) = block.strip_suffix("Desc") {
                    (p, Direction::Desc)
                } else if let Some(p) = block.strip_suffix("Asc") {
                    (p, Direction::Asc)
                } else {
                    (block, Direction::Asc)
                };
                if property.is_empty() {
                    return Err(ParseError::InvalidMethodName {
                        method: method.to_string(),
                        message: format!("order block '{}' has no property", block),
                    });
                }
                Ok(Order {
                    property: uncapitalize(property),
                    direction,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok((&predicate[..pos], orders))
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn or_parts(&self) -> &[OrPart] {
        &self.or_parts
    }

    /// All parts in declaration order
    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.or_parts.iter().flat_map(|or_part| or_part.parts.iter())
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn is_count_projection(&self) -> bool {
        self.subject.kind == QueryKind::Count
    }

    pub fn is_exists_projection(&self) -> bool {
        self.subject.kind == QueryKind::Exists
    }

    pub fn is_delete(&self) -> bool {
        self.subject.kind == QueryKind::Delete
    }

    pub fn is_distinct(&self) -> bool {
        self.subject.distinct
    }

    pub fn is_limiting(&self) -> bool {
        self.subject.max_results.is_some()
    }

    pub fn max_results(&self) -> Option<usize> {
        self.subject.max_results
    }

    /// Number of method arguments the predicate consumes
    pub fn number_of_arguments(&self) -> usize {
        self.parts().map(Part::number_of_arguments).sum()
    }
}

impl fmt::Display for PartTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let disjunction: Vec<String> = self
            .or_parts
            .iter()
            .map(|or_part| {
                or_part
                    .parts
                    .iter()
                    .map(|part| format!("{} {:?}", part.property, part.kind))
                    .collect::<Vec<_>>()
                    .join(" and ")
            })
            .collect();
        write!(f, "{}", disjunction.join(" or "))
    }
}

/// Split on a keyword that is followed by an uppercase letter (`LastNameOrAge`)
fn split_keyword<'a>(text: &'a str, keyword: &str) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut start = 0;

    for (pos, _) in text.match_indices(keyword) {
        if pos <= start {
            continue;
        }
        let after = &text[pos + keyword.len()..];
        if after.starts_with(char::is_uppercase) {
            pieces.push(&text[start..pos]);
            start = pos + keyword.len();
        }
    }
    pieces.push(&text[start..]);
    pieces
}

/// Split `LastNameAscAgeDesc` after each direction that is followed by an uppercase letter
fn split_order_blocks(clause: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut start = 0;

    for (i, c) in clause.char_indices() {
        if i <= start || !c.is_uppercase() {
            continue;
        }
        let head = &clause[start..i];
        if head.ends_with("Asc") || head.ends_with("Desc") {
            blocks.push(head);
            start = i;
        }
    }
    blocks.push(&clause[start..]);
    blocks
}

fn strip_ignore_case(raw: &str) -> (&str, bool) {
    ["IgnoreCase", "IgnoringCase"]
        .iter()
        .find_map(|suffix| raw.strip_suffix(suffix))
        .map_or((raw, false), |stripped| (stripped, true))
}

fn strip_all_ignore_case(predicate: &str) -> (&str, bool) {
    ["AllIgnoreCase", "AllIgnoringCase"]
        .iter()
        .find_map(|suffix| predicate.strip_suffix(suffix))
        .map_or((predicate, false), |stripped| (stripped, true))
}

fn uncapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_find_by() {
        let tree = PartTree::parse("findByLastName").unwrap();
        assert_eq!(tree.subject().kind(), QueryKind::Select);
        assert!(!tree.is_count_projection());
        assert!(!tree.is_delete());
        assert!(!tree.is_limiting());

        let parts: Vec<&Part> = tree.parts().collect();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].property(), "lastName");
        assert_eq!(parts[0].kind(), PartKind::SimpleProperty);
        assert_eq!(tree.number_of_arguments(), 1);
    }

    #[test]
    fn test_subject_kinds() {
        assert!(PartTree::parse("countByAge").unwrap().is_count_projection());
        assert!(PartTree::parse("existsByAge").unwrap().is_exists_projection());
        assert!(PartTree::parse("deleteByAge").unwrap().is_delete());
        assert!(PartTree::parse("removeByAge").unwrap().is_delete());
        assert!(PartTree::parse("findDistinctByAge").unwrap().is_distinct());
    }

    #[test]
    fn test_limiting_subject() {
        let tree = PartTree::parse("findFirstByAge").unwrap();
        assert!(tree.is_limiting());
        assert_eq!(tree.max_results(), Some(1));

        let tree = PartTree::parse("findTop10ByAge").unwrap();
        assert_eq!(tree.max_results(), Some(10));

        let tree = PartTree::parse("findDistinctFirst3ByAge").unwrap();
        assert_eq!(tree.max_results(), Some(3));
        assert!(tree.is_distinct());

        assert!(!PartTree::parse("countByAge").unwrap().is_limiting());
    }

    #[test]
    fn test_or_and_parts() {
        let tree = PartTree::parse("findByLastNameAndAgeGreaterThanOrOriginIn").unwrap();
        assert_eq!(tree.or_parts().len(), 2);
        assert_eq!(tree.or_parts()[0].parts().len(), 2);

        let kinds: Vec<PartKind> = tree.parts().map(Part::kind).collect();
        assert_eq!(
            kinds,
            vec![PartKind::SimpleProperty, PartKind::GreaterThan, PartKind::In]
        );
        let origin = tree.parts().last().unwrap();
        assert_eq!(origin.property(), "origin");
    }

    #[test]
    fn test_argument_counts() {
        let tree = PartTree::parse("findByAgeBetweenAndNameIsNotNullAndActiveTrue").unwrap();
        assert_eq!(tree.number_of_arguments(), 2);
    }

    #[test]
    fn test_keyword_precedence() {
        let tree = PartTree::parse("findByNameNotLikeAndTagsNotInAndTitleNotContaining").unwrap();
        let kinds: Vec<PartKind> = tree.parts().map(Part::kind).collect();
        assert_eq!(
            kinds,
            vec![PartKind::NotLike, PartKind::NotIn, PartKind::NotContaining]
        );
    }

    #[test]
    fn test_ignore_case() {
        let tree = PartTree::parse("findByLastNameIgnoreCaseAndCity").unwrap();
        let flags: Vec<bool> = tree.parts().map(Part::ignore_case).collect();
        assert_eq!(flags, vec![true, false]);

        let tree = PartTree::parse("findByLastNameAndCityAllIgnoreCase").unwrap();
        assert!(tree.parts().all(Part::ignore_case));
    }

    #[test]
    fn test_order_by() {
        let tree = PartTree::parse("findByCityOrderByLastNameAscAgeDesc").unwrap();
        assert_eq!(
            tree.orders(),
            &[
                Order {
                    property: "lastName".to_string(),
                    direction: Direction::Asc,
                },
                Order {
                    property: "age".to_string(),
                    direction: Direction::Desc,
                },
            ]
        );
        assert_eq!(tree.parts().count(), 1);

        assert!(PartTree::parse("findByCityOrderBy").is_err());
    }

    #[test]
    fn test_subject_only_method() {
        let tree = PartTree::parse("findAll").unwrap();
        assert_eq!(tree.parts().count(), 0);
        assert_eq!(tree.subject().kind(), QueryKind::Select);

        let tree = PartTree::parse("findTop5").unwrap();
        assert_eq!(tree.max_results(), Some(5));
    }

    #[test]
    fn test_name_without_prefix_is_predicate() {
        let tree = PartTree::parse("lastName").unwrap();
        assert_eq!(tree.parts().next().unwrap().property(), "lastName");
        assert!(PartTree::parse("").is_err());
    }

    #[test]
    fn test_display() {
        let tree = PartTree::parse("findByAgeLessThanOrName").unwrap();
        assert_eq!(tree.to_string(), "age LessThan or name SimpleProperty");
    }
}
