use std::cmp::Ordering;

use mongodb::bson::{Bson, Document};
use anyhow::Context as _;
use regex::{Regex, RegexBuilder};

use crate::core::time::{DateTime, Period};

#[derive(Debug, Clone, PartialEq, derive_more::From)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Timestamp(DateTime),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_owned())
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(value as i64)
    }
}

impl From<&FieldValue> for Bson {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Text(text) => Bson::String(text.clone()),
            FieldValue::Int(i) => Bson::Int64(*i),
            FieldValue::Float(f) => Bson::Double(*f),
            FieldValue::Bool(b) => Bson::Boolean(*b),
            FieldValue::Timestamp(dt) => Bson::DateTime(dt.into_bson()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(FieldValue),
    Ne(FieldValue),
    Gt(FieldValue),
    Gte(FieldValue),
    Lt(FieldValue),
    Lte(FieldValue),
    In(Vec<FieldValue>),
    Regex { pattern: String, case_insensitive: bool },
    Exists(bool),
}

impl Condition {
    pub fn eq(value: impl Into<FieldValue>) -> Self {
        Condition::Eq(value.into())
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Condition::Regex {
            pattern: pattern.into(),
            case_insensitive: false,
        }
    }

    pub fn regex_ignore_case(pattern: impl Into<String>) -> Self {
        Condition::Regex {
            pattern: pattern.into(),
            case_insensitive: true,
        }
    }
}

/// Evaluates a comparison the way the document store does: values of different types never compare,
/// a missing field only satisfies `Ne` and `Exists(false)`.
fn evaluate(condition: &Condition, value: Option<&Bson>) -> bool {
    match condition {
        Condition::Eq(expected) => compare(value, expected) == Some(Ordering::Equal),
        Condition::Ne(expected) => compare(value, expected) != Some(Ordering::Equal),
        Condition::Gt(bound) => compare(value, bound) == Some(Ordering::Greater),
        Condition::Gte(bound) => matches!(compare(value, bound), Some(Ordering::Greater | Ordering::Equal)),
        Condition::Lt(bound) => compare(value, bound) == Some(Ordering::Less),
        Condition::Lte(bound) => matches!(compare(value, bound), Some(Ordering::Less | Ordering::Equal)),
        Condition::In(candidates) => candidates
            .iter()
            .any(|candidate| compare(value, candidate) == Some(Ordering::Equal)),
        Condition::Exists(expected) => value.is_some() == *expected,
        //compiled up front into ClauseMatcher::Pattern
        Condition::Regex { .. } => false,
    }
}

fn compare(actual: Option<&Bson>, expected: &FieldValue) -> Option<Ordering> {
    match (actual?, expected) {
        (Bson::String(a), FieldValue::Text(e)) => Some(a.as_str().cmp(e.as_str())),
        (Bson::Boolean(a), FieldValue::Bool(e)) => Some(a.cmp(e)),
        (Bson::DateTime(a), FieldValue::Timestamp(e)) => Some(a.timestamp_millis().cmp(&e.timestamp_millis())),
        (Bson::Int32(a), FieldValue::Int(e)) => Some((*a as i64).cmp(e)),
        (Bson::Int64(a), FieldValue::Int(e)) => Some(a.cmp(e)),
        (Bson::Int32(a), FieldValue::Float(e)) => (*a as f64).partial_cmp(e),
        (Bson::Int64(a), FieldValue::Float(e)) => (*a as f64).partial_cmp(e),
        (Bson::Double(a), FieldValue::Int(e)) => a.partial_cmp(&(*e as f64)),
        (Bson::Double(a), FieldValue::Float(e)) => a.partial_cmp(e),
        _ => None,
    }
}

/// Ordered list of `(field, condition)` clauses. A document matches when every clause holds, so
/// combining two filters can only narrow the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Condition)>,
}

/// Extra predicates a caller adds on top of the period range.
pub type AdditionalConditions = Filter;

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn period(field: &str, period: &Period) -> Self {
        Self::new()
            .field(field, Condition::Gte(FieldValue::Timestamp(*period.start())))
            .field(field, Condition::Lte(FieldValue::Timestamp(*period.end())))
    }

    pub fn field(mut self, field: impl Into<String>, condition: Condition) -> Self {
        self.clauses.push((field.into(), condition));
        self
    }

    pub fn and(mut self, other: Filter) -> Self {
        self.clauses.extend(other.clauses);
        self
    }

    pub fn clauses(&self) -> &[(String, Condition)] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Prepares the filter for in-memory evaluation. Fails on a regex the `regex` engine does not
    /// accept, including PCRE-only syntax such as look-around and backreferences.
    pub fn compile(&self) -> anyhow::Result<FilterMatcher<'_>> {
        let mut clauses = Vec::with_capacity(self.clauses.len());
        for (field, condition) in &self.clauses {
            clauses.push((field.as_str(), ClauseMatcher::new(condition)?));
        }

        Ok(FilterMatcher { clauses })
    }
}

pub struct FilterMatcher<'a> {
    clauses: Vec<(&'a str, ClauseMatcher<'a>)>,
}

impl FilterMatcher<'_> {
    pub fn matches(&self, document: &Document) -> bool {
        self.clauses
            .iter()
            .all(|(field, matcher)| matcher.matches(lookup(document, field)))
    }
}

enum ClauseMatcher<'a> {
    Compare(&'a Condition),
    Pattern(Regex),
}

impl<'a> ClauseMatcher<'a> {
    fn new(condition: &'a Condition) -> anyhow::Result<Self> {
        match condition {
            Condition::Regex {
                pattern,
                case_insensitive,
            } => {
                let regex = RegexBuilder::new(pattern)
                    .case_insensitive(*case_insensitive)
                    .build()
                    .with_context(|| format!("Unsupported regex {pattern:?} in filter"))?;
                Ok(ClauseMatcher::Pattern(regex))
            }
            other => Ok(ClauseMatcher::Compare(other)),
        }
    }

    fn matches(&self, value: Option<&Bson>) -> bool {
        match self {
            ClauseMatcher::Compare(condition) => evaluate(condition, value),
            ClauseMatcher::Pattern(regex) => matches!(value, Some(Bson::String(text)) if regex.is_match(text)),
        }
    }
}

//dotted paths address embedded documents, e.g. "chartGeneralDetail.furnaceNo"
fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut parts = path.split('.');
    let mut current = document.get(parts.next()?)?;

    for part in parts {
        current = match current {
            Bson::Document(inner) => inner.get(part)?,
            _ => return None,
        };
    }

    Some(current)
}

#[cfg(test)]
mod tests {
    use mongodb::bson::doc;

    use super::*;

    fn dt(text: &str) -> DateTime {
        DateTime::parse(text).unwrap()
    }

    fn matches(filter: &Filter, document: &Document) -> bool {
        filter.compile().unwrap().matches(document)
    }

    #[test]
    fn test_period_filter_is_inclusive() {
        let period = Period::whole_days(dt("2024-01-01"), dt("2024-01-31"));
        let filter = Filter::period("createdAt", &period);

        assert!(matches(&filter, &doc! { "createdAt": period.start().into_bson() }));
        assert!(matches(&filter, &doc! { "createdAt": period.end().into_bson() }));
        assert!(!matches(&filter, &doc! { "createdAt": dt("2024-02-01").into_bson() }));
        assert!(!matches(&filter, &doc! { "title": "no timestamp" }));
    }

    #[test]
    fn test_type_mismatch_never_matches() {
        let filter = Filter::new().field("createdAt", Condition::Gte(FieldValue::Timestamp(dt("2024-01-01"))));

        assert!(!matches(&filter, &doc! { "createdAt": "2024-06-01" }));
    }

    #[test]
    fn test_regex_case_insensitive() {
        let filter = Filter::new().field("title", Condition::regex_ignore_case("task"));

        assert!(matches(&filter, &doc! { "title": "Weekly TASK review" }));
        assert!(!matches(&filter, &doc! { "title": "meeting" }));
        assert!(!matches(&filter, &doc! { "title": 42 }));
    }

    #[test]
    fn test_regex_case_sensitive() {
        let filter = Filter::new().field("title", Condition::regex("^task"));

        assert!(matches(&filter, &doc! { "title": "task 1" }));
        assert!(!matches(&filter, &doc! { "title": "Task 1" }));
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let filter = Filter::new().field("title", Condition::regex("(unclosed"));

        assert!(filter.compile().is_err());
    }

    #[test]
    fn test_pcre_only_regex_is_rejected() {
        let lookbehind = Filter::new().field("title", Condition::regex("(?<=Task )within"));
        let backreference = Filter::new().field("title", Condition::regex("(a)\\1"));

        assert!(lookbehind.compile().is_err());
        assert!(backreference.compile().is_err());
    }

    #[test]
    fn test_numeric_comparison_across_widths() {
        let filter = Filter::new()
            .field("furnaceNo", Condition::Gt(FieldValue::Int(2)))
            .field("furnaceNo", Condition::Lte(FieldValue::Float(4.5)));

        assert!(matches(&filter, &doc! { "furnaceNo": 3_i32 }));
        assert!(matches(&filter, &doc! { "furnaceNo": 4.5 }));
        assert!(!matches(&filter, &doc! { "furnaceNo": 2_i64 }));
    }

    #[test]
    fn test_ne_matches_missing_field() {
        let filter = Filter::new().field("cpNo", Condition::Ne("CP-1".into()));

        assert!(matches(&filter, &doc! {}));
        assert!(matches(&filter, &doc! { "cpNo": "CP-2" }));
        assert!(!matches(&filter, &doc! { "cpNo": "CP-1" }));
    }

    #[test]
    fn test_in_and_exists() {
        let filter = Filter::new()
            .field("cpNo", Condition::In(vec!["CP-1".into(), "CP-3".into()]))
            .field("deletedAt", Condition::Exists(false));

        assert!(matches(&filter, &doc! { "cpNo": "CP-3" }));
        assert!(!matches(&filter, &doc! { "cpNo": "CP-2" }));
        assert!(!matches(&filter, &doc! { "cpNo": "CP-1", "deletedAt": dt("2024-01-01").into_bson() }));
    }

    #[test]
    fn test_dotted_path() {
        let filter = Filter::new().field("chartGeneralDetail.furnaceNo", Condition::eq(7_i64));

        assert!(matches(&filter, &doc! { "chartGeneralDetail": { "furnaceNo": 7 } }));
        assert!(!matches(&filter, &doc! { "chartGeneralDetail": { "furnaceNo": 8 } }));
        assert!(!matches(&filter, &doc! { "chartGeneralDetail": 7 }));
    }

    #[test]
    fn test_and_only_narrows() {
        let period = Period::whole_days(dt("2024-01-01"), dt("2024-12-31"));
        let widened = Filter::new().field("createdAt", Condition::Gte(FieldValue::Timestamp(dt("2000-01-01"))));
        let filter = Filter::period("createdAt", &period).and(widened);

        assert!(!matches(&filter, &doc! { "createdAt": dt("2010-01-01").into_bson() }));
        assert!(matches(&filter, &doc! { "createdAt": dt("2024-05-01").into_bson() }));
    }
}
