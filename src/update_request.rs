//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use serde_json::{Map, Value};
use std::result::Result;
use tracing::trace;

use crate::error::{generic_err, validation_err, NoSQLError};
use crate::session::Session;
use crate::transport::HttpMethod;
use crate::types::{MapValue, KEY_FIELD};

/// Struct used for partially updating a single item.
///
/// Fields given with [`set()`](UpdateRequest::set()) replace existing values (nested paths
/// such as `"profile.age"` are allowed). The key of an item can never change: a `key`
/// field given in the fields to set is dropped before the request is sent.
///
/// The service also supports numeric increments, list appends and prepends, and
/// field removal, which are sent only when used.
#[derive(Default, Debug)]
pub struct UpdateRequest {
    pub(crate) collection: String,
    pub(crate) key: String,
    pub(crate) set: MapValue,
    pub(crate) increment: MapValue,
    pub(crate) append: MapValue,
    pub(crate) prepend: MapValue,
    pub(crate) delete: Vec<String>,
}

/// Struct representing the result of an [`UpdateRequest`] execution.
///
/// Note: the service echoes back only the update operations it applied, not the
/// resulting item. Use a [`GetRequest`](crate::GetRequest) to read the full item.
#[derive(Default, Debug)]
pub struct UpdateResult {
    pub(crate) key: Option<String>,
    pub(crate) set: MapValue,
    pub(crate) increment: MapValue,
    pub(crate) append: MapValue,
    pub(crate) prepend: MapValue,
    pub(crate) delete: Vec<String>,
}

impl UpdateResult {
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }
    /// Get the fields that were set.
    pub fn set(&self) -> &MapValue {
        &self.set
    }
    pub fn increment(&self) -> &MapValue {
        &self.increment
    }
    pub fn append(&self) -> &MapValue {
        &self.append
    }
    pub fn prepend(&self) -> &MapValue {
        &self.prepend
    }
    /// Get the names of removed fields.
    pub fn delete(&self) -> &Vec<String> {
        &self.delete
    }
    pub fn into_set(self) -> MapValue {
        self.set
    }
}

impl UpdateRequest {
    /// Create a new `UpdateRequest` for the item with the given key.
    pub fn new(collection: &str, key: &str) -> UpdateRequest {
        UpdateRequest {
            collection: collection.to_string(),
            key: key.to_string(),
            ..Default::default()
        }
    }

    /// Set a single field.
    pub fn set(mut self, field: &str, val: impl Into<Value>) -> UpdateRequest {
        self.set.put(field, val);
        self
    }

    /// Set every field of the given map.
    pub fn set_fields(mut self, fields: MapValue) -> UpdateRequest {
        for (k, v) in fields.m {
            self.set.m.insert(k, v);
        }
        self
    }

    /// Add `by` (which may be negative) to a numeric field.
    pub fn increment(mut self, field: &str, by: impl Into<Value>) -> UpdateRequest {
        self.increment.put(field, by);
        self
    }

    /// Append values to a list field.
    pub fn append(mut self, field: &str, vals: Vec<Value>) -> UpdateRequest {
        self.append.put_array(field, vals);
        self
    }

    /// Prepend values to a list field.
    pub fn prepend(mut self, field: &str, vals: Vec<Value>) -> UpdateRequest {
        self.prepend.put_array(field, vals);
        self
    }

    /// Remove a field from the item.
    pub fn delete(mut self, field: &str) -> UpdateRequest {
        self.delete.push(field.to_string());
        self
    }

    pub(crate) fn body(&mut self) -> Value {
        if self.set.take_field_value(KEY_FIELD).is_some() {
            trace!("update: dropping key field from fields to set");
        }
        let mut body = Map::new();
        body.insert("set".to_string(), std::mem::take(&mut self.set).into_json());
        let ops = [
            ("increment", std::mem::take(&mut self.increment)),
            ("append", std::mem::take(&mut self.append)),
            ("prepend", std::mem::take(&mut self.prepend)),
        ];
        for (name, op) in ops {
            if !op.is_empty() {
                body.insert(name.to_string(), op.into_json());
            }
        }
        if !self.delete.is_empty() {
            body.insert(
                "delete".to_string(),
                Value::from(std::mem::take(&mut self.delete)),
            );
        }
        Value::Object(body)
    }

    /// Execute the request, returning an [`UpdateResult`].
    pub async fn execute(mut self, s: &Session) -> Result<UpdateResult, NoSQLError> {
        if self.key.is_empty() {
            return validation_err!("update: key must be non-empty");
        }
        let url = s.collection_url(&self.collection, &["items", self.key.as_str()])?;
        let body = self.body();
        let resp = match s.send_and_receive(HttpMethod::Patch, url, Some(&body)).await? {
            Some(Value::Object(m)) => MapValue::from_json_map(m),
            Some(v) => return generic_err!("update: unexpected response from service: {}", v),
            None => return generic_err!("update: empty response from service"),
        };
        let delete = resp
            .get_array("delete")
            .map(|a| {
                a.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        Ok(UpdateResult {
            key: resp.get_string(KEY_FIELD),
            set: resp.get_map("set").unwrap_or_default(),
            increment: resp.get_map("increment").unwrap_or_default(),
            append: resp.get_map("append").unwrap_or_default(),
            prepend: resp.get_map("prepend").unwrap_or_default(),
            delete,
        })
    }
}
