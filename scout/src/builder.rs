//! Per-field query strategies.
//!
//! A builder turns a field name plus a value (or range bounds) into a
//! [`Query`] and declares which boolean group that sub-query belongs to.

use crate::query::{BoolQuery, Query};
use std::fmt::Debug;

/// Boolean group a compiled sub-query is placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolRole {
    /// Must match, contributes to scoring.
    Must,
    /// Optional, contributes to scoring.
    Should,
    /// Must match, no scoring.
    Filter,
    /// Must not match.
    MustNot,
}

/// Strategy for value-typed fields (term or full-text match).
pub trait FieldQueryBuilder: Send + Sync + Debug {
    fn build(&self, field_name: &str, value: &str) -> Query;

    fn role(&self) -> BoolRole;
}

/// Strategy for range-typed fields.
pub trait RangeQueryBuilder: Send + Sync + Debug {
    fn build(&self, field_name: &str, gte: Option<&str>, lte: Option<&str>) -> Query;

    fn role(&self) -> BoolRole;
}

/// Exact keyword match.
#[derive(Debug, Clone, Copy)]
pub struct TermQueryBuilder {
    role: BoolRole,
}

impl TermQueryBuilder {
    pub fn new(role: BoolRole) -> Self {
        Self { role }
    }
}

impl FieldQueryBuilder for TermQueryBuilder {
    fn build(&self, field_name: &str, value: &str) -> Query {
        Query::term(field_name, value)
    }

    fn role(&self) -> BoolRole {
        self.role
    }
}

/// Analyzed full-text match.
#[derive(Debug, Clone, Copy)]
pub struct MatchQueryBuilder {
    role: BoolRole,
}

impl MatchQueryBuilder {
    pub fn new(role: BoolRole) -> Self {
        Self { role }
    }
}

impl FieldQueryBuilder for MatchQueryBuilder {
    fn build(&self, field_name: &str, value: &str) -> Query {
        Query::text(field_name, value)
    }

    fn role(&self) -> BoolRole {
        self.role
    }
}

/// Matches one value against several text fields, any of which may hit.
///
/// The condition's own field name is ignored; the value is matched against
/// `targets` inside a nested bool with `minimum_should_match = 1`, and that
/// nested bool is required as a whole.
#[derive(Debug, Clone)]
pub struct FanOutMatchBuilder {
    targets: Vec<&'static str>,
}

impl FanOutMatchBuilder {
    pub fn new(targets: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            targets: targets.into_iter().collect(),
        }
    }
}

impl FieldQueryBuilder for FanOutMatchBuilder {
    fn build(&self, _field_name: &str, value: &str) -> Query {
        Query::Bool(BoolQuery {
            should: self
                .targets
                .iter()
                .map(|target| Query::text(*target, value))
                .collect(),
            minimum_should_match: Some(1),
            ..Default::default()
        })
    }

    fn role(&self) -> BoolRole {
        BoolRole::Must
    }
}

/// Inclusive `gte`/`lte` range.
#[derive(Debug, Clone, Copy)]
pub struct InclusiveRangeBuilder {
    role: BoolRole,
}

impl InclusiveRangeBuilder {
    pub fn new(role: BoolRole) -> Self {
        Self { role }
    }
}

impl RangeQueryBuilder for InclusiveRangeBuilder {
    fn build(&self, field_name: &str, gte: Option<&str>, lte: Option<&str>) -> Query {
        Query::range(field_name, gte.map(str::to_owned), lte.map(str::to_owned))
    }

    fn role(&self) -> BoolRole {
        self.role
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_builder() {
        let b = TermQueryBuilder::new(BoolRole::Filter);
        assert_eq!(b.build("company", "META"), Query::term("company", "META"));
        assert_eq!(b.role(), BoolRole::Filter);
    }

    #[test]
    fn test_match_builder() {
        let b = MatchQueryBuilder::new(BoolRole::Should);
        assert_eq!(b.build("title", "rust"), Query::text("title", "rust"));
        assert_eq!(b.role(), BoolRole::Should);
    }

    #[test]
    fn test_fan_out_builder() {
        let b = FanOutMatchBuilder::new(["title", "summary"]);
        let q = b.build("search_word", "kafka");

        let inner = q.as_bool().expect("Expected bool query");
        assert_eq!(
            inner.should,
            vec![Query::text("title", "kafka"), Query::text("summary", "kafka")]
        );
        assert_eq!(inner.minimum_should_match, Some(1));
        assert_eq!(b.role(), BoolRole::Must);
    }

    #[test]
    fn test_range_builder_keeps_open_bounds() {
        let b = InclusiveRangeBuilder::new(BoolRole::Filter);
        assert_eq!(
            b.build("min_years", None, Some("3")),
            Query::range("min_years", None, Some("3".to_string()))
        );
    }
}
