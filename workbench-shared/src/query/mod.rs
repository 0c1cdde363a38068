//! List filtering and pagination
//!
//! Every `list` call takes a resource filter and a [`Pagination`]. A filter
//! turns its populated fields into an ordered list of [`Condition`]s; the
//! repositories apply those conditions on top of "not soft-deleted", then sort,
//! skip `offset` rows and keep at most `limit`.
//!
//! - String fields (name, email, category, SKU) match case-insensitive
//!   substrings; an empty string means "no filter"
//! - Identity and enumerated fields (ids, status, priority) match exactly
//! - Ranges are inclusive and each bound is independent
//!
//! The same conditions are rendered to SQL by [`sql`] and evaluated in
//! process by the in-memory repositories, so both storages agree on which
//! rows a filter selects.

pub mod sort;
pub mod sql;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

pub use sort::{parse_sort, SortError, SortKey};

/// A typed column value used in predicates
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Uuid(Uuid),
    Float(f64),
    Int(i64),
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Orders two values of compatible types
    ///
    /// Integers and floats compare numerically with each other. Anything else
    /// across types is incomparable.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Uuid(a), Value::Uuid(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

/// One predicate over a named column
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Case-insensitive substring match (`ILIKE '%needle%'`)
    Contains { column: &'static str, needle: String },

    /// Exact equality
    Equals { column: &'static str, value: Value },

    /// Inclusive lower bound
    AtLeast { column: &'static str, value: Value },

    /// Inclusive upper bound
    AtMost { column: &'static str, value: Value },
}

impl Condition {
    pub fn column(&self) -> &'static str {
        match self {
            Condition::Contains { column, .. }
            | Condition::Equals { column, .. }
            | Condition::AtLeast { column, .. }
            | Condition::AtMost { column, .. } => column,
        }
    }

    /// Evaluates the predicate against a column value
    ///
    /// `None` is SQL NULL, which fails every predicate.
    pub fn matches(&self, actual: Option<&Value>) -> bool {
        let Some(actual) = actual else {
            return false;
        };

        match self {
            Condition::Contains { needle, .. } => match actual {
                Value::Text(haystack) => haystack.to_lowercase().contains(&needle.to_lowercase()),
                _ => false,
            },
            Condition::Equals { value, .. } => actual.compare(value) == Some(Ordering::Equal),
            Condition::AtLeast { value, .. } => {
                matches!(actual.compare(value), Some(Ordering::Greater | Ordering::Equal))
            }
            Condition::AtMost { value, .. } => {
                matches!(actual.compare(value), Some(Ordering::Less | Ordering::Equal))
            }
        }
    }
}

/// Accumulates conditions in the order fields are visited
///
/// Skips absent fields and blank strings.
#[derive(Debug, Default)]
pub struct Conditions(Vec<Condition>);

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(mut self, column: &'static str, needle: &Option<String>) -> Self {
        if let Some(needle) = needle.as_deref().filter(|s| !s.is_empty()) {
            self.0.push(Condition::Contains {
                column,
                needle: needle.to_string(),
            });
        }
        self
    }

    pub fn equals<V: Into<Value> + Clone>(mut self, column: &'static str, value: &Option<V>) -> Self {
        if let Some(value) = value.clone() {
            let value = value.into();
            if value != Value::Text(String::new()) {
                self.0.push(Condition::Equals { column, value });
            }
        }
        self
    }

    pub fn range<V: Into<Value> + Clone>(
        mut self,
        column: &'static str,
        from: &Option<V>,
        to: &Option<V>,
    ) -> Self {
        if let Some(from) = from.clone() {
            self.0.push(Condition::AtLeast {
                column,
                value: from.into(),
            });
        }
        if let Some(to) = to.clone() {
            self.0.push(Condition::AtMost {
                column,
                value: to.into(),
            });
        }
        self
    }

    pub fn build(self) -> Vec<Condition> {
        self.0
    }
}

/// A resource filter
pub trait Filter {
    /// Predicates for every populated field, in a fixed field order
    fn conditions(&self) -> Vec<Condition>;
}

/// Limit, offset and sort for a list call
///
/// `limit <= 0` means unbounded and `offset <= 0` starts at the first row.
/// `sort` is a comma separated list of `column [asc|desc]` terms; empty means
/// storage order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
    pub sort: String,
}

impl Pagination {
    pub fn new(limit: i64, offset: i64, sort: impl Into<String>) -> Self {
        Self {
            limit,
            offset,
            sort: sort.into(),
        }
    }

    /// All rows, newest first
    pub fn newest_first() -> Self {
        Self::new(0, 0, "created_at desc")
    }

    pub fn effective_limit(&self) -> Option<usize> {
        (self.limit > 0).then_some(self.limit as usize)
    }

    pub fn effective_offset(&self) -> usize {
        self.offset.max(0) as usize
    }

    pub fn sort_keys(&self) -> Result<Vec<SortKey>, SortError> {
        parse_sort(&self.sort)
    }
}
