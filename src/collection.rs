//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use serde::de::DeserializeOwned;
use std::result::Result;
use tracing::{debug, trace};

use crate::delete_request::DeleteRequest;
use crate::error::NoSQLError;
use crate::fetch_request::{FetchRequest, FetchResult, DEFAULT_FETCH_LIMIT};
use crate::get_request::GetRequest;
use crate::put_many_request::PutManyRequest;
use crate::put_request::PutRequest;
use crate::session::Session;
use crate::types::{Item, MapValue};
use crate::update_request::UpdateRequest;

/// A handle to one named collection.
///
/// Obtained from [`Session::collection()`]. It holds only the collection name and a
/// clone of the session, so it is cheap to create and can be shared across tasks.
///
/// The methods here are shortcuts for the request structs; use those directly for
/// options such as item expiry or update operations other than `set`.
#[derive(Clone, Debug)]
pub struct Collection {
    name: String,
    session: Session,
}

impl Collection {
    pub(crate) fn new(name: &str, session: &Session) -> Collection {
        Collection {
            name: name.to_string(),
            session: session.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Store an item, replacing any existing item with the same key.
    ///
    /// Returns the stored item, including the key generated by the service if none was given.
    pub async fn put(&self, item: impl Into<Item>, key: Option<&str>) -> Result<MapValue, NoSQLError> {
        let mut req = PutRequest::new(&self.name).value(item);
        if let Some(k) = key {
            req = req.key(k);
        }
        Ok(req.execute(&self.session).await?.into_item())
    }

    /// Store an item only if no item with the same key exists.
    ///
    /// Fails with a [`Conflict`](crate::NoSQLErrorCode::Conflict) error if the key is taken.
    pub async fn insert(
        &self,
        item: impl Into<Item>,
        key: Option<&str>,
    ) -> Result<MapValue, NoSQLError> {
        let mut req = PutRequest::new(&self.name).value(item).if_absent();
        if let Some(k) = key {
            req = req.key(k);
        }
        Ok(req.execute(&self.session).await?.into_item())
    }

    /// Store up to [`MAX_PUT_MANY_ITEMS`](crate::MAX_PUT_MANY_ITEMS) items at once.
    pub async fn put_many<I, T>(&self, items: I) -> Result<Vec<MapValue>, NoSQLError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Item>,
    {
        let res = PutManyRequest::new(&self.name)
            .items(items)
            .execute(&self.session)
            .await?;
        Ok(res.into_processed())
    }

    /// Get the item with the given key.
    pub async fn get(&self, key: &str) -> Result<MapValue, NoSQLError> {
        Ok(GetRequest::new(&self.name, key)
            .execute(&self.session)
            .await?
            .into_item())
    }

    /// Get the item with the given key as a native Rust struct.
    pub async fn get_into<T: DeserializeOwned>(&self, key: &str) -> Result<T, NoSQLError> {
        GetRequest::new(&self.name, key)
            .execute_into(&self.session)
            .await
    }

    /// Set the given fields on the item with the given key.
    ///
    /// A `key` field in `fields` is ignored. Note the returned map holds only the fields
    /// that were set, not the full updated item.
    pub async fn update(&self, key: &str, fields: MapValue) -> Result<MapValue, NoSQLError> {
        Ok(UpdateRequest::new(&self.name, key)
            .set_fields(fields)
            .execute(&self.session)
            .await?
            .into_set())
    }

    /// Delete the item with the given key.
    ///
    /// Returns `true` only if the service confirmed the deletion. Every failure, including
    /// network errors, yields `false`.
    pub async fn delete(&self, key: &str) -> bool {
        match DeleteRequest::new(&self.name, key)
            .execute(&self.session)
            .await
        {
            Ok(res) => res.success(),
            Err(e) => {
                debug!("delete of key '{}' in '{}' failed: {}", key, self.name, e);
                false
            }
        }
    }

    /// Fetch one page of items matching `queries`.
    ///
    /// `queries` may be a [`Query`](crate::Query) or a list of AND-group maps. Pass an
    /// empty `last` for the first page, then the [`FetchResult::last()`] of the previous
    /// page until it is empty.
    pub async fn fetch(
        &self,
        queries: impl Into<Vec<MapValue>>,
        limit: u32,
        last: &str,
    ) -> Result<FetchResult, NoSQLError> {
        FetchRequest::new(&self.name)
            .queries(queries.into())
            .limit(limit)
            .last(last)
            .execute(&self.session)
            .await
    }

    /// Fetch every item matching `queries`, following continuation tokens.
    pub async fn fetch_all(
        &self,
        queries: impl Into<Vec<MapValue>>,
    ) -> Result<Vec<MapValue>, NoSQLError> {
        let queries = queries.into();
        let mut items = Vec::new();
        let mut last = String::new();
        loop {
            let page = self.fetch(queries.clone(), DEFAULT_FETCH_LIMIT, &last).await?;
            trace!("fetch_all: page of {} items, last='{}'", page.count(), page.last());
            last = page.last().to_string();
            items.extend(page.into_items());
            if last.is_empty() {
                return Ok(items);
            }
        }
    }
}
