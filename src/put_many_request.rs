//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use serde_json::{json, Value};
use std::result::Result;
use std::time::Duration;

use crate::error::{generic_err, validation_err, NoSQLError};
use crate::put_request::{shape_item, Expiry, ItemsResponse};
use crate::session::Session;
use crate::transport::HttpMethod;
use crate::types::{Item, MapValue};

/// Maximum number of items accepted by a single [`PutManyRequest`].
pub const MAX_PUT_MANY_ITEMS: usize = 25;

/// Struct used to store several items in a single operation.
///
/// Items are shaped the same way as in [`PutRequest`](crate::PutRequest). At most
/// [`MAX_PUT_MANY_ITEMS`] items may be sent at once; larger batches are rejected
/// before any network activity.
#[derive(Default, Debug)]
pub struct PutManyRequest {
    pub(crate) collection: String,
    pub(crate) items: Vec<(Item, Option<String>)>,
    pub(crate) expiry: Option<Expiry>,
}

/// Struct representing the combined results of a [`PutManyRequest`] operation.
#[derive(Default, Debug)]
pub struct PutManyResult {
    pub(crate) processed: Vec<MapValue>,
    pub(crate) failed: Vec<MapValue>,
}

impl PutManyResult {
    /// Get the stored items, in request order.
    pub fn processed(&self) -> &Vec<MapValue> {
        &self.processed
    }
    /// Get the items the service reported as not stored.
    pub fn failed(&self) -> &Vec<MapValue> {
        &self.failed
    }
    pub fn into_processed(self) -> Vec<MapValue> {
        self.processed
    }
}

impl PutManyRequest {
    pub fn new(collection: &str) -> PutManyRequest {
        PutManyRequest {
            collection: collection.to_string(),
            ..Default::default()
        }
    }

    /// Add an item. The service generates its key unless the item is a map with a `key` field.
    pub fn add(mut self, item: impl Into<Item>) -> PutManyRequest {
        self.items.push((item.into(), None));
        self
    }

    /// Add an item with an explicit key.
    pub fn add_with_key(mut self, item: impl Into<Item>, key: &str) -> PutManyRequest {
        self.items.push((item.into(), Some(key.to_string())));
        self
    }

    /// Add all items from an iterator.
    pub fn items<I, T>(mut self, items: I) -> PutManyRequest
    where
        I: IntoIterator<Item = T>,
        T: Into<Item>,
    {
        self.items
            .extend(items.into_iter().map(|i| (i.into(), None)));
        self
    }

    /// Expire all items after the given duration.
    pub fn expire_in(mut self, d: Duration) -> PutManyRequest {
        self.expiry = Some(Expiry::In(d));
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Execute the request, returning a [`PutManyResult`].
    pub async fn execute(self, s: &Session) -> Result<PutManyResult, NoSQLError> {
        if self.items.len() > MAX_PUT_MANY_ITEMS {
            return validation_err!(
                "put_many: {} items given, at most {} allowed per request",
                self.items.len(),
                MAX_PUT_MANY_ITEMS
            );
        }
        if self.items.is_empty() {
            return validation_err!("put_many: no items given");
        }
        let mut payloads: Vec<Value> = Vec::with_capacity(self.items.len());
        for (item, key) in self.items {
            payloads.push(shape_item(item, key.as_deref(), self.expiry.as_ref())?.into_json());
        }
        let url = s.collection_url(&self.collection, &["items"])?;
        let body = json!({ "items": payloads });
        let resp: ItemsResponse = match s.send_and_receive(HttpMethod::Put, url, Some(&body)).await? {
            Some(v) => serde_json::from_value(v)?,
            None => return generic_err!("put_many: empty response from service"),
        };
        Ok(PutManyResult {
            processed: resp.processed.map(|p| p.into_map_values()).unwrap_or_default(),
            failed: resp.failed.map(|f| f.into_map_values()).unwrap_or_default(),
        })
    }
}
