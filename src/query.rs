//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Builder for the filter expressions accepted by [`FetchRequest`](crate::FetchRequest).
//!
//! A query is a list of maps. The conditions inside one map must all match (AND),
//! and an item matches the query if any of the maps matches (OR). Each condition
//! is a map entry whose key is a dotted field path, optionally followed by an
//! operator token, and whose value is the operand:
//!
//! ```
//! use deta_base_rust_sdk::Query;
//! use serde_json::json;
//!
//! let groups = Query::field("user.profile.age").greater_than(21)
//!     .and("user.name").prefix("J")
//!     .or("admin").equal_to(true)
//!     .build();
//! assert_eq!(groups.len(), 2);
//! assert_eq!(groups[0].get_field_value("user.profile.age?gt"), Some(&json!(21)));
//! assert_eq!(groups[0].get_field_value("user.name?pfx"), Some(&json!("J")));
//! assert_eq!(groups[1].get_field_value("admin"), Some(&json!(true)));
//! ```
use serde_json::Value;
use tracing::debug;

use crate::types::MapValue;

/// Comparison operators understood by the query endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOperator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    /// Inclusive two-sided bound. The operand is a `[low, high]` array.
    Range,
    /// Substring of a string, or member of an array.
    Contains,
    NotContains,
    /// String starts with.
    Prefix,
}

impl QueryOperator {
    /// The suffix appended to the field path for this operator. Equality has none.
    pub fn token(&self) -> &'static str {
        match self {
            QueryOperator::Equal => "",
            QueryOperator::NotEqual => "?ne",
            QueryOperator::GreaterThan => "?gt",
            QueryOperator::GreaterOrEqual => "?gte",
            QueryOperator::LessThan => "?lt",
            QueryOperator::LessOrEqual => "?lte",
            QueryOperator::Range => "?r",
            QueryOperator::Contains => "?contains",
            QueryOperator::NotContains => "?not_contains",
            QueryOperator::Prefix => "?pfx",
        }
    }
}

/// Field path part of a condition key: everything before the operator token.
pub(crate) fn condition_path(condition_key: &str) -> &str {
    match condition_key.split_once('?') {
        Some((path, _)) => path,
        None => condition_key,
    }
}

/// A list of AND-groups, OR-ed together by the service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    groups: Vec<MapValue>,
}

/// A [`Query`] waiting for the operator and operand of its current field.
///
/// Within one AND-group, each path and operator pair holds a single operand. Adding the
/// same pair again replaces the earlier operand; use [`Query::or()`] to match either.
#[derive(Debug, Clone)]
#[must_use = "a field without a condition adds nothing to the query"]
pub struct FieldQuery {
    query: Query,
    path: String,
}

impl Query {
    /// Start a query with a condition on `path`.
    pub fn field(path: &str) -> FieldQuery {
        FieldQuery {
            query: Query {
                groups: vec![MapValue::new()],
            },
            path: path.to_string(),
        }
    }

    /// Add another condition to the current AND-group.
    pub fn and(self, path: &str) -> FieldQuery {
        FieldQuery {
            query: self,
            path: path.to_string(),
        }
    }

    /// Start a new AND-group. Items matching either group are returned.
    pub fn or(mut self, path: &str) -> FieldQuery {
        self.groups.push(MapValue::new());
        FieldQuery {
            query: self,
            path: path.to_string(),
        }
    }

    pub fn groups(&self) -> &[MapValue] {
        &self.groups
    }

    /// Produce one map per AND-group.
    pub fn build(self) -> Vec<MapValue> {
        self.groups
    }

    fn push_condition(mut self, path: &str, op: QueryOperator, operand: Value) -> Query {
        let k = format!("{}{}", path, op.token());
        if let Some(group) = self.groups.last_mut() {
            if let Some(old) = group.get_field_value(&k) {
                debug!("query: condition '{}' replaces earlier operand {}", k, old);
            }
            group.put(&k, operand);
        }
        self
    }
}

impl From<Query> for Vec<MapValue> {
    fn from(q: Query) -> Vec<MapValue> {
        q.build()
    }
}

impl FieldQuery {
    /// Add a condition with an explicit operator.
    pub fn condition(self, op: QueryOperator, operand: impl Into<Value>) -> Query {
        self.query.push_condition(&self.path, op, operand.into())
    }

    pub fn equal_to(self, v: impl Into<Value>) -> Query {
        self.condition(QueryOperator::Equal, v)
    }
    pub fn not_equal_to(self, v: impl Into<Value>) -> Query {
        self.condition(QueryOperator::NotEqual, v)
    }
    pub fn greater_than(self, v: impl Into<Value>) -> Query {
        self.condition(QueryOperator::GreaterThan, v)
    }
    pub fn greater_than_or_equal(self, v: impl Into<Value>) -> Query {
        self.condition(QueryOperator::GreaterOrEqual, v)
    }
    pub fn less_than(self, v: impl Into<Value>) -> Query {
        self.condition(QueryOperator::LessThan, v)
    }
    pub fn less_than_or_equal(self, v: impl Into<Value>) -> Query {
        self.condition(QueryOperator::LessOrEqual, v)
    }
    /// Match values between `low` and `high`, both inclusive.
    pub fn range(self, low: impl Into<Value>, high: impl Into<Value>) -> Query {
        let bounds = Value::Array(vec![low.into(), high.into()]);
        self.condition(QueryOperator::Range, bounds)
    }
    pub fn contains(self, v: impl Into<Value>) -> Query {
        self.condition(QueryOperator::Contains, v)
    }
    pub fn not_contains(self, v: impl Into<Value>) -> Query {
        self.condition(QueryOperator::NotContains, v)
    }
    pub fn prefix(self, v: &str) -> Query {
        self.condition(QueryOperator::Prefix, v)
    }
}
