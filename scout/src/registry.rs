//! Immutable field → builder lookups, built once per schema.

use crate::builder::{
    BoolRole, FieldQueryBuilder, InclusiveRangeBuilder, MatchQueryBuilder, RangeQueryBuilder,
    TermQueryBuilder,
};
use crate::field::FieldName;
use std::collections::HashMap;
use std::sync::Arc;

/// Builders for value-typed fields.
#[derive(Debug, Clone)]
pub struct QueryBuilderRegistry<F: FieldName> {
    builders: HashMap<F, Arc<dyn FieldQueryBuilder>>,
}

impl<F: FieldName> QueryBuilderRegistry<F> {
    pub fn builder() -> QueryRegistryBuilder<F> {
        QueryRegistryBuilder {
            builders: HashMap::new(),
        }
    }

    pub fn get(&self, field: F) -> Option<&dyn FieldQueryBuilder> {
        self.builders.get(&field).map(|b| b.as_ref())
    }

    pub fn contains(&self, field: F) -> bool {
        self.builders.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}

pub struct QueryRegistryBuilder<F: FieldName> {
    builders: HashMap<F, Arc<dyn FieldQueryBuilder>>,
}

impl<F: FieldName> QueryRegistryBuilder<F> {
    pub fn term(self, field: F, role: BoolRole) -> Self {
        self.with(field, TermQueryBuilder::new(role))
    }

    pub fn text(self, field: F, role: BoolRole) -> Self {
        self.with(field, MatchQueryBuilder::new(role))
    }

    /// Registers a custom strategy. A later registration for the same field
    /// replaces the earlier one.
    pub fn with(mut self, field: F, builder: impl FieldQueryBuilder + 'static) -> Self {
        self.builders.insert(field, Arc::new(builder));
        self
    }

    pub fn build(self) -> QueryBuilderRegistry<F> {
        QueryBuilderRegistry {
            builders: self.builders,
        }
    }
}

/// Builders for range-typed fields.
#[derive(Debug, Clone)]
pub struct RangeBuilderRegistry<F: FieldName> {
    builders: HashMap<F, Arc<dyn RangeQueryBuilder>>,
}

impl<F: FieldName> RangeBuilderRegistry<F> {
    pub fn builder() -> RangeRegistryBuilder<F> {
        RangeRegistryBuilder {
            builders: HashMap::new(),
        }
    }

    pub fn get(&self, field: F) -> Option<&dyn RangeQueryBuilder> {
        self.builders.get(&field).map(|b| b.as_ref())
    }

    pub fn contains(&self, field: F) -> bool {
        self.builders.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}

pub struct RangeRegistryBuilder<F: FieldName> {
    builders: HashMap<F, Arc<dyn RangeQueryBuilder>>,
}

impl<F: FieldName> RangeRegistryBuilder<F> {
    pub fn inclusive(self, field: F, role: BoolRole) -> Self {
        self.with(field, InclusiveRangeBuilder::new(role))
    }

    pub fn with(mut self, field: F, builder: impl RangeQueryBuilder + 'static) -> Self {
        self.builders.insert(field, Arc::new(builder));
        self
    }

    pub fn build(self) -> RangeBuilderRegistry<F> {
        RangeBuilderRegistry {
            builders: self.builders,
        }
    }
}

/// Both lookups for one schema, shared by reference across calls.
#[derive(Debug, Clone)]
pub struct FieldRegistries<F: FieldName> {
    pub queries: Arc<QueryBuilderRegistry<F>>,
    pub ranges: Arc<RangeBuilderRegistry<F>>,
}

impl<F: FieldName> FieldRegistries<F> {
    pub fn new(queries: QueryBuilderRegistry<F>, ranges: RangeBuilderRegistry<F>) -> Self {
        Self {
            queries: Arc::new(queries),
            ranges: Arc::new(ranges),
        }
    }

    /// True when neither lookup knows the field.
    pub fn is_unknown(&self, field: F) -> bool {
        !self.queries.contains(field) && !self.ranges.contains(field)
    }
}
