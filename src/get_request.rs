//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use serde::de::DeserializeOwned;
use std::result::Result;

use crate::error::{generic_err, validation_err, NoSQLError};
use crate::session::Session;
use crate::transport::HttpMethod;
use crate::types::MapValue;

/// Struct used for getting a single item from a collection by its key.
#[derive(Default, Debug)]
pub struct GetRequest {
    pub(crate) collection: String,
    pub(crate) key: String,
}

/// Struct representing the result of a [`GetRequest`] operation.
///
/// This struct is returned from a [`GetRequest::execute()`] call.
#[derive(Default, Debug)]
pub struct GetResult {
    pub(crate) item: MapValue,
}

impl GetResult {
    /// Get the returned item.
    pub fn item(&self) -> &MapValue {
        &self.item
    }
    pub fn into_item(self) -> MapValue {
        self.item
    }
}

impl GetRequest {
    /// Create a new `GetRequest`.
    ///
    /// `collection` and `key` are required and must be non-empty.
    pub fn new(collection: &str, key: &str) -> GetRequest {
        GetRequest {
            collection: collection.to_string(),
            key: key.to_string(),
        }
    }

    /// Execute the request, returning a [`GetResult`].
    ///
    /// If no item with the key exists, a [`NotFound`](crate::NoSQLErrorCode::NotFound)
    /// error is returned, with [`NoSQLError::key()`] set to the missing key.
    pub async fn execute(&self, s: &Session) -> Result<GetResult, NoSQLError> {
        if self.key.is_empty() {
            return validation_err!("get: key must be non-empty");
        }
        let url = s.collection_url(&self.collection, &["items", self.key.as_str()])?;
        match s.send_and_receive(HttpMethod::Get, url, None).await? {
            Some(v) => Ok(GetResult {
                item: MapValue::from_json_object(v)?,
            }),
            None => generic_err!("get: empty response from service"),
        }
    }

    /// Execute the request, populating a Rust native struct.
    ///
    /// `T` must implement serde's `Deserialize`:
    /// ```no_run
    /// use deta_base_rust_sdk::{GetRequest, Session};
    /// use serde::Deserialize;
    /// # #[tokio::main]
    /// # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let session = Session::builder().from_environment()?.build()?;
    /// #[derive(Debug, Deserialize)]
    /// struct Person {
    ///     key: String,
    ///     name: String,
    ///     age: u32,
    /// }
    /// let person: Person = GetRequest::new("people", "p-123")
    ///     .execute_into(&session)
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn execute_into<T: DeserializeOwned>(&self, s: &Session) -> Result<T, NoSQLError> {
        self.execute(s).await?.item.to_struct()
    }
}
