//! Engine-agnostic compiled query tree.
//!
//! Backends translate this into their own wire format; `scout-es` renders it
//! as Elasticsearch Query DSL.

/// A compiled query node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Matches every document.
    MatchAll,

    /// Exact, non-analyzed match.
    Term { field: String, value: String },

    /// Analyzed full-text match.
    Match { field: String, text: String },

    /// Inclusive range; at least one bound is set.
    Range {
        field: String,
        gte: Option<String>,
        lte: Option<String>,
    },

    Bool(BoolQuery),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoolQuery {
    pub must: Vec<Query>,
    pub should: Vec<Query>,
    pub filter: Vec<Query>,
    pub must_not: Vec<Query>,
    pub minimum_should_match: Option<u32>,
}

impl BoolQuery {
    pub fn is_empty(&self) -> bool {
        self.must.is_empty()
            && self.should.is_empty()
            && self.filter.is_empty()
            && self.must_not.is_empty()
    }

    /// Number of leaf and nested clauses across all groups.
    pub fn clause_count(&self) -> usize {
        self.must.len() + self.should.len() + self.filter.len() + self.must_not.len()
    }
}

impl Query {
    pub fn term(field: impl Into<String>, value: impl Into<String>) -> Self {
        Query::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn text(field: impl Into<String>, text: impl Into<String>) -> Self {
        Query::Match {
            field: field.into(),
            text: text.into(),
        }
    }

    pub fn range(field: impl Into<String>, gte: Option<String>, lte: Option<String>) -> Self {
        Query::Range {
            field: field.into(),
            gte,
            lte,
        }
    }

    pub fn is_match_all(&self) -> bool {
        matches!(self, Query::MatchAll)
    }

    pub fn as_bool(&self) -> Option<&BoolQuery> {
        match self {
            Query::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Adds optional scoring clauses on top of an existing query.
    ///
    /// The base query becomes the single `must` clause, so the extra `should`
    /// clauses only raise scores and never widen or narrow the match set.
    pub fn with_boosts(self, boosts: Vec<Query>) -> Query {
        if boosts.is_empty() {
            return self;
        }
        Query::Bool(BoolQuery {
            must: vec![self],
            should: boosts,
            ..Default::default()
        })
    }
}
