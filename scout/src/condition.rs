//! Filter conditions and the pagination window they are evaluated in.

use crate::error::{Error, Result};
use crate::field::FieldName;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use std::fmt::Display;
use std::str::FromStr;

/// A single filter expression over one field.
///
/// Either `value` is set (term or match) or at least one range bound is.
/// Bounds are already normalised to sortable strings: numbers as decimal
/// text, timestamps as epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition<F> {
    field: F,
    value: Option<String>,
    gte: Option<String>,
    lte: Option<String>,
}

impl<F: FieldName> Condition<F> {
    /// Builds a condition from raw parts. Nothing is validated here; the
    /// compiler skips conditions that carry neither a value nor a bound.
    pub fn from_parts(
        field: F,
        value: Option<String>,
        gte: Option<String>,
        lte: Option<String>,
    ) -> Self {
        Self {
            field,
            value,
            gte,
            lte,
        }
    }

    /// Exact or full-text value, depending on the field's builder.
    pub fn new(field: F, value: impl Into<String>) -> Self {
        Self::from_parts(field, Some(value.into()), None, None)
    }

    pub fn flag(field: F, value: bool) -> Self {
        Self::new(field, value.to_string())
    }

    /// Any displayable value, e.g. numbers or enum labels.
    pub fn display(field: F, value: impl Display) -> Self {
        Self::new(field, value.to_string())
    }

    pub fn range(field: F, gte: Option<String>, lte: Option<String>) -> Self {
        Self::from_parts(field, None, gte, lte)
    }

    pub fn at_least(field: F, gte: impl Display) -> Self {
        Self::range(field, Some(gte.to_string()), None)
    }

    pub fn at_most(field: F, lte: impl Display) -> Self {
        Self::range(field, None, Some(lte.to_string()))
    }

    pub fn between(field: F, gte: impl Display, lte: impl Display) -> Self {
        Self::range(field, Some(gte.to_string()), Some(lte.to_string()))
    }

    /// Timestamp range, bounds encoded as epoch milliseconds.
    pub fn time_range<Tz: TimeZone>(
        field: F,
        from: Option<DateTime<Tz>>,
        to: Option<DateTime<Tz>>,
    ) -> Self {
        Self::range(
            field,
            from.map(|t| t.timestamp_millis().to_string()),
            to.map(|t| t.timestamp_millis().to_string()),
        )
    }

    /// Wall-clock range interpreted in a fixed offset.
    pub fn local_time_range(
        field: F,
        from: Option<NaiveDateTime>,
        to: Option<NaiveDateTime>,
        offset: FixedOffset,
    ) -> Self {
        let millis = |t: NaiveDateTime| {
            t.and_local_timezone(offset)
                .single()
                .map(|t| t.timestamp_millis().to_string())
        };
        Self::range(field, from.and_then(millis), to.and_then(millis))
    }

    pub fn field(&self) -> F {
        self.field
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn gte(&self) -> Option<&str> {
        self.gte.as_deref()
    }

    pub fn lte(&self) -> Option<&str> {
        self.lte.as_deref()
    }

    pub fn has_bounds(&self) -> bool {
        self.gte.is_some() || self.lte.is_some()
    }
}

/// Parses `field=value` or `field=lo..hi` (either side of `..` may be empty).
impl<F> FromStr for Condition<F>
where
    F: FieldName + FromStr<Err = Error>,
{
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (name, rhs) = s
            .split_once('=')
            .ok_or_else(|| Error::InvalidCondition(format!("expected field=value, got '{s}'")))?;
        let field: F = name.trim().parse()?;
        let rhs = rhs.trim();

        match rhs.split_once("..") {
            Some((lo, hi)) => {
                let bound = |b: &str| (!b.trim().is_empty()).then(|| b.trim().to_string());
                Ok(Self::range(field, bound(lo), bound(hi)))
            }
            None => Ok(Self::new(field, rhs)),
        }
    }
}

/// Ordered conditions plus a `[from, to)` pagination window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryWindow<F> {
    conditions: Vec<Condition<F>>,
    from: usize,
    to: usize,
}

impl<F: FieldName> QueryWindow<F> {
    /// Negative `from` is clamped to 0; `to < from` is rejected.
    pub fn new(conditions: Vec<Condition<F>>, from: i64, to: i64) -> Result<Self> {
        let from = from.max(0);
        if to < from {
            return Err(Error::InvalidWindow { from, to });
        }
        Ok(Self {
            conditions,
            from: from as usize,
            to: to as usize,
        })
    }

    /// Fills in missing bounds: `from` defaults to 0 and `to` to
    /// `from + default_page_size`, saturating at `i64::MAX`.
    pub fn with_defaults(
        conditions: Vec<Condition<F>>,
        from: Option<i64>,
        to: Option<i64>,
        default_page_size: usize,
    ) -> Result<Self> {
        let from = from.unwrap_or(0).max(0);
        let page_size = i64::try_from(default_page_size).unwrap_or(i64::MAX);
        let to = to.unwrap_or_else(|| from.saturating_add(page_size));
        Self::new(conditions, from, to)
    }

    pub fn conditions(&self) -> &[Condition<F>] {
        &self.conditions
    }

    pub fn from(&self) -> usize {
        self.from
    }

    pub fn to(&self) -> usize {
        self.to
    }

    pub fn size(&self) -> usize {
        self.to - self.from
    }

    /// Documents to fetch so that `has_next` can be decided: one past the page.
    pub fn fetch_size(&self) -> usize {
        self.size() + 1
    }

    pub fn has_condition_on(&self, field: F) -> bool {
        self.conditions.iter().any(|c| c.field() == field)
    }

    /// Appends a condition unless the window already constrains that field.
    pub fn with_default_condition(mut self, condition: Condition<F>) -> Self {
        if !self.has_condition_on(condition.field()) {
            self.conditions.push(condition);
        }
        self
    }
}

/// One page of results trimmed from an over-fetched hit list.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_next: bool,
    pub total_hits: u64,
}

impl<T> Page<T> {
    /// `fetched` holds up to `requested + 1` items; anything past
    /// `requested` only signals that another page exists.
    pub fn from_overfetch(mut fetched: Vec<T>, requested: usize, total_hits: u64) -> Self {
        let has_next = fetched.len() > requested;
        fetched.truncate(requested);
        Self {
            items: fetched,
            has_next,
            total_hits,
        }
    }

    /// Maps items while keeping `has_next` and `total_hits`; `None` drops
    /// an item without affecting paging.
    pub fn try_filter_map<U, E>(
        self,
        mut f: impl FnMut(T) -> std::result::Result<Option<U>, E>,
    ) -> std::result::Result<Page<U>, E> {
        let mut items = Vec::with_capacity(self.items.len());
        for item in self.items {
            if let Some(mapped) = f(item)? {
                items.push(mapped);
            }
        }
        Ok(Page {
            items,
            has_next: self.has_next,
            total_hits: self.total_hits,
        })
    }
}
