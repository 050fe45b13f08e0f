//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use serde_json::Value;
use std::result::Result;

use crate::error::{validation_err, NoSQLError};
use crate::session::Session;
use crate::transport::HttpMethod;
use crate::types::KEY_FIELD;

/// Struct used for deleting a single item from a collection.
#[derive(Default, Debug)]
pub struct DeleteRequest {
    pub(crate) collection: String,
    pub(crate) key: String,
}

/// Struct representing the result of a [`DeleteRequest`] execution.
///
/// This struct is returned from a [`DeleteRequest::execute()`] call.
#[derive(Default, Debug)]
pub struct DeleteResult {
    pub(crate) success: bool,
}

impl DeleteResult {
    /// Get the result of the operation: `true` if the service confirmed the
    /// deletion of the requested key.
    pub fn success(&self) -> bool {
        self.success
    }
}

impl DeleteRequest {
    /// Create a new `DeleteRequest`.
    ///
    /// `collection` and `key` are required and must be non-empty.
    pub fn new(collection: &str, key: &str) -> DeleteRequest {
        DeleteRequest {
            collection: collection.to_string(),
            key: key.to_string(),
        }
    }

    /// Execute the request, returning a [`DeleteResult`].
    ///
    /// Errors from the service are returned as-is. See
    /// [`Collection::delete()`](crate::Collection::delete()) for a variant that
    /// reduces every outcome to a boolean.
    pub async fn execute(&self, s: &Session) -> Result<DeleteResult, NoSQLError> {
        if self.key.is_empty() {
            return validation_err!("delete: key must be non-empty");
        }
        let url = s.collection_url(&self.collection, &["items", self.key.as_str()])?;
        let resp = s.send_and_receive(HttpMethod::Delete, url, None).await?;
        let echoed = resp
            .as_ref()
            .and_then(|v| v.get(KEY_FIELD))
            .and_then(Value::as_str);
        Ok(DeleteResult {
            success: echoed == Some(self.key.as_str()),
        })
    }
}
