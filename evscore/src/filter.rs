//! Storage query fragments
//!
//! The types here are what the authorization engine hands to the storage
//! layer: a conjunctive `Filter`, a field `Projection` and `Pagination`.
//! They are deliberately storage agnostic; every backend translates them
//! into its own query language, and `Filter::matches` provides the same
//! semantics for documents already held in memory.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored entity in its document form.
pub type Document = Map<String, Value>;

/// The predicate applied to a single property.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub enum Op {
    Eq(Value),
    /// Set membership; an empty set matches nothing.
    In(Vec<Value>),
}

/// A single condition on a named document property.  Dotted property
/// names address nested objects.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Condition {
    pub property: String,
    pub op: Op,
}

/// A conjunction (AND) of conditions.  An empty filter matches every
/// document.
///
/// Combining filters only ever appends conditions, so the result of
/// `a.and(b)` can never match more than either of `a` or `b`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Filter {
    conditions: Vec<Condition>,
}

/// The fields to be returned by a query.  `None` means no restriction.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Projection(Option<Vec<String>>);

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Pagination {
    pub skip: usize,
    pub limit: Option<usize>,
}

mod impls;
