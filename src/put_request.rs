//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use chrono::{DateTime, TimeZone, Utc};
use serde_derive::Deserialize;
use serde_json::{json, Map, Value};
use std::result::Result;
use std::time::Duration;
use tracing::debug;

use crate::error::{generic_err, validation_err, NoSQLError};
use crate::session::Session;
use crate::transport::HttpMethod;
use crate::types::{Item, MapValue, EXPIRES_FIELD};

/// Struct used for storing a single item in a collection.
///
/// This request can perform two kinds of writes:
/// - Overwrite any existing item with the same key. This is the default.
/// - Succeed only if no item with the key exists. Use [`if_absent()`](PutRequest::if_absent()) for
///   this case. If the key is already taken the request fails with a
///   [`Conflict`](crate::NoSQLErrorCode::Conflict) error. This is slower than a plain put, as
///   the service must check for an existing item.
///
/// If no key is given, the service generates one. On success, [`PutResult::item()`] holds
/// the stored item, including its key.
#[derive(Default, Debug)]
pub struct PutRequest {
    pub(crate) collection: String,
    pub(crate) item: Option<Item>,
    pub(crate) key: Option<String>,
    pub(crate) if_absent: bool,
    pub(crate) expiry: Option<Expiry>,
}

/// Struct representing the result of a [`PutRequest`] execution.
#[derive(Default, Debug)]
pub struct PutResult {
    pub(crate) item: MapValue,
}

impl PutResult {
    /// Get the stored item, as returned by the service.
    pub fn item(&self) -> &MapValue {
        &self.item
    }
    /// Get the key of the stored item.
    pub fn key(&self) -> Option<&str> {
        self.item.key()
    }
    pub fn into_item(self) -> MapValue {
        self.item
    }
}

/// When a stored item expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Relative to the time the request is executed.
    In(Duration),
    /// Absolute unix timestamp, in seconds.
    At(i64),
}

impl Expiry {
    pub(crate) fn timestamp(&self) -> Result<i64, NoSQLError> {
        match self {
            Expiry::In(d) => match i64::try_from(d.as_secs())
                .ok()
                .and_then(|secs| Utc::now().timestamp().checked_add(secs))
            {
                Some(t) => Ok(t),
                None => validation_err!("expiry of {} seconds is out of range", d.as_secs()),
            },
            Expiry::At(t) => Ok(*t),
        }
    }
}

// Wire shape shared by put, insert and put-many responses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ItemsResponse {
    #[serde(default)]
    pub(crate) processed: Option<ItemList>,
    #[serde(default)]
    pub(crate) failed: Option<ItemList>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ItemList {
    #[serde(default)]
    pub(crate) items: Vec<Map<String, Value>>,
}

impl ItemList {
    pub(crate) fn into_map_values(self) -> Vec<MapValue> {
        self.items.into_iter().map(MapValue::from_json_map).collect()
    }
}

// Resolve an item into its wire payload, merging key and expiry.
pub(crate) fn shape_item(
    item: Item,
    key: Option<&str>,
    expiry: Option<&Expiry>,
) -> Result<MapValue, NoSQLError> {
    if let Some(k) = key {
        if k.is_empty() {
            return validation_err!("item key, if given, must be non-empty");
        }
    }
    let mut payload = item.into_payload(key)?;
    if let Some(e) = expiry {
        payload.put_i64(EXPIRES_FIELD, e.timestamp()?);
    }
    Ok(payload)
}

impl PutRequest {
    /// Create a new PutRequest.
    ///
    /// `collection` is the name of the collection to store the item in. It is required to be non-empty.
    pub fn new(collection: &str) -> PutRequest {
        PutRequest {
            collection: collection.to_string(),
            ..Default::default()
        }
    }

    /// Set the item to store.
    ///
    /// Maps are stored as given. Strings, numbers, booleans and lists are stored as
    /// `{"value": item}`.
    pub fn value(mut self, item: impl Into<Item>) -> PutRequest {
        self.item = Some(item.into());
        self
    }

    /// Set the item to store from a native Rust struct that serializes to a map.
    pub fn put<T: serde::Serialize + ?Sized>(self, row: &T) -> Result<PutRequest, NoSQLError> {
        Ok(self.value(Item::from_serialize(row)?))
    }

    /// Set the key of the item. If the item is a map containing a `key` field, this
    /// value replaces it.
    ///
    /// If no key is given, the service generates a random one.
    pub fn key(mut self, key: &str) -> PutRequest {
        self.key = Some(key.to_string());
        self
    }

    /// Succeed only if no item with the same key exists.
    pub fn if_absent(mut self) -> PutRequest {
        self.if_absent = true;
        self
    }

    /// Expire the item after the given duration.
    pub fn expire_in(mut self, d: Duration) -> PutRequest {
        self.expiry = Some(Expiry::In(d));
        self
    }

    /// Expire the item at the given time.
    pub fn expire_at<Tz: TimeZone>(mut self, t: &DateTime<Tz>) -> PutRequest {
        self.expiry = Some(Expiry::At(t.timestamp()));
        self
    }

    /// Execute the request, returning a [`PutResult`].
    pub async fn execute(self, s: &Session) -> Result<PutResult, NoSQLError> {
        let item = match self.item {
            Some(i) => i,
            None => return validation_err!("PutRequest: no item given"),
        };
        let payload = shape_item(item, self.key.as_deref(), self.expiry.as_ref())?;
        let url = s.collection_url(&self.collection, &["items"])?;
        let method = if self.if_absent {
            HttpMethod::Post
        } else {
            HttpMethod::Put
        };
        let body = json!({ "items": [payload.into_json()] });
        let resp = s.send_and_receive(method, url, Some(&body)).await?;
        let resp: ItemsResponse = match resp {
            Some(v) => serde_json::from_value(v)?,
            None => return generic_err!("put: empty response from service"),
        };
        if let Some(f) = &resp.failed {
            if !f.items.is_empty() {
                debug!("put: service reported {} failed item(s)", f.items.len());
            }
        }
        match resp.processed.and_then(|p| p.into_map_values().into_iter().next()) {
            Some(item) if item.key().is_some_and(|k| !k.is_empty()) => Ok(PutResult { item }),
            Some(_) => generic_err!("put: stored item has no key"),
            None => generic_err!("put: response did not contain the stored item"),
        }
    }
}
