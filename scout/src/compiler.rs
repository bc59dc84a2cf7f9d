//! Condition list → compiled boolean query.

use crate::builder::BoolRole;
use crate::condition::Condition;
use crate::error::{Error, Result};
use crate::field::FieldName;
use crate::query::{BoolQuery, Query};
use crate::registry::{QueryBuilderRegistry, RangeBuilderRegistry};

/// Groups role-tagged sub-queries into one bool query.
#[derive(Debug, Default)]
pub struct BoolComposer {
    query: BoolQuery,
}

impl BoolComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, role: BoolRole, query: Query) {
        match role {
            BoolRole::Must => self.query.must.push(query),
            BoolRole::Should => self.query.should.push(query),
            BoolRole::Filter => self.query.filter.push(query),
            BoolRole::MustNot => self.query.must_not.push(query),
        }
    }

    /// With no clauses the result is match-all. `minimum_should_match` is
    /// set to 1 only when at least one `should` clause exists.
    pub fn finish(mut self) -> Query {
        if self.query.is_empty() {
            return Query::MatchAll;
        }
        if !self.query.should.is_empty() {
            self.query.minimum_should_match = Some(1);
        }
        Query::Bool(self.query)
    }
}

pub struct QueryCompiler;

impl QueryCompiler {
    /// Resolves every condition through the registries.
    ///
    /// A field known to neither registry fails the whole compilation.
    /// Conditions with no value (value fields) or no bounds (range fields)
    /// are skipped with a warning.
    pub fn compile<F: FieldName>(
        conditions: &[Condition<F>],
        queries: &QueryBuilderRegistry<F>,
        ranges: &RangeBuilderRegistry<F>,
    ) -> Result<Query> {
        let mut composer = BoolComposer::new();

        for condition in conditions {
            let field = condition.field();
            let name = field.field_name();

            if let Some(builder) = queries.get(field) {
                match condition.value() {
                    Some(value) => composer.add(builder.role(), builder.build(name, value)),
                    None => {
                        tracing::warn!(field = name, "Skipping condition without a value");
                        metrics::counter!("scout_conditions_skipped_total", "reason" => "no_value")
                            .increment(1);
                    }
                }
            } else if let Some(builder) = ranges.get(field) {
                if condition.has_bounds() {
                    composer.add(
                        builder.role(),
                        builder.build(name, condition.gte(), condition.lte()),
                    );
                } else {
                    tracing::warn!(field = name, "Skipping range condition without bounds");
                    metrics::counter!("scout_conditions_skipped_total", "reason" => "no_bounds")
                        .increment(1);
                }
            } else {
                return Err(Error::UnknownField(name.to_string()));
            }
        }

        Ok(composer.finish())
    }
}
