//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use serde_derive::Deserialize;
use serde_json::{json, Map, Value};
use std::result::Result;

use crate::error::{generic_err, validation_err, NoSQLError};
use crate::query::{condition_path, Query};
use crate::session::Session;
use crate::transport::HttpMethod;
use crate::types::{MapValue, KEY_FIELD};

/// Number of items returned per page when no limit is given.
pub const DEFAULT_FETCH_LIMIT: u32 = 1000;

/// Struct used for searching a collection.
///
/// A fetch returns one page of results. To read the complete result set, execute the
/// request again with [`last()`](FetchRequest::last()) set to the previous
/// [`FetchResult::last()`] until that token is empty:
/// ```no_run
/// use deta_base_rust_sdk::{FetchRequest, Query, Session};
/// # #[tokio::main]
/// # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let session = Session::builder().from_environment()?.build()?;
/// let mut last = String::new();
/// loop {
///     let page = FetchRequest::new("users")
///         .query(Query::field("age").greater_than(21))
///         .limit(100)
///         .last(&last)
///         .execute(&session)
///         .await?;
///     for item in page.items() {
///         println!("{}", item);
///     }
///     if page.last().is_empty() {
///         break;
///     }
///     last = page.last().to_string();
/// }
/// # Ok(())
/// # }
/// ```
///
/// Conditions on the `key` field are not accepted; use a [`GetRequest`](crate::GetRequest)
/// to read an item by key.
#[derive(Debug)]
pub struct FetchRequest {
    pub(crate) collection: String,
    pub(crate) queries: Vec<MapValue>,
    pub(crate) limit: u32,
    pub(crate) last: String,
}

/// Struct representing one page of results of a [`FetchRequest`].
#[derive(Default, Debug)]
pub struct FetchResult {
    pub(crate) items: Vec<MapValue>,
    pub(crate) count: usize,
    pub(crate) last: String,
}

impl FetchResult {
    pub fn items(&self) -> &Vec<MapValue> {
        &self.items
    }
    /// Number of items in this page.
    pub fn count(&self) -> usize {
        self.count
    }
    /// Continuation token for the next page. Empty if this is the last page.
    pub fn last(&self) -> &str {
        &self.last
    }
    pub fn into_items(self) -> Vec<MapValue> {
        self.items
    }
}

#[derive(Debug, Default, Deserialize)]
struct FetchResponse {
    #[serde(default)]
    paging: Paging,
    #[serde(default)]
    items: Vec<Map<String, Value>>,
}

#[derive(Debug, Default, Deserialize)]
struct Paging {
    #[serde(default)]
    size: Option<usize>,
    #[serde(default)]
    last: Option<String>,
}

impl FetchRequest {
    pub fn new(collection: &str) -> FetchRequest {
        FetchRequest {
            collection: collection.to_string(),
            queries: Vec::new(),
            limit: DEFAULT_FETCH_LIMIT,
            last: String::new(),
        }
    }

    /// Set the filter. An empty filter matches every item.
    pub fn query(mut self, q: Query) -> FetchRequest {
        self.queries = q.build();
        self
    }

    /// Set the filter from raw AND-group maps.
    pub fn queries(mut self, groups: Vec<MapValue>) -> FetchRequest {
        self.queries = groups;
        self
    }

    /// Maximum number of items in the returned page. Must be at least 1.
    pub fn limit(mut self, limit: u32) -> FetchRequest {
        self.limit = limit;
        self
    }

    /// Continuation token returned by a previous fetch.
    pub fn last(mut self, last: &str) -> FetchRequest {
        self.last = last.to_string();
        self
    }

    fn validate(&self) -> Result<(), NoSQLError> {
        if self.limit < 1 {
            return validation_err!("fetch: limit must be at least 1, got {}", self.limit);
        }
        for group in &self.queries {
            if let Some((k, _)) = group.iter().find(|(k, _)| condition_path(k) == KEY_FIELD) {
                return validation_err!(
                    "fetch: cannot filter on '{}', use get to read an item by key",
                    k
                );
            }
        }
        Ok(())
    }

    /// Execute the request, returning a single page as a [`FetchResult`].
    pub async fn execute(&self, s: &Session) -> Result<FetchResult, NoSQLError> {
        self.validate()?;
        let url = s.collection_url(&self.collection, &["query"])?;
        let query: Vec<Value> = self.queries.iter().map(|q| q.clone().into_json()).collect();
        let body = json!({
            "query": query,
            "limit": self.limit,
            "last": self.last,
        });
        let resp: FetchResponse = match s.send_and_receive(HttpMethod::Post, url, Some(&body)).await? {
            Some(v) => serde_json::from_value(v)?,
            None => return generic_err!("fetch: empty response from service"),
        };
        let items: Vec<MapValue> = resp.items.into_iter().map(MapValue::from_json_map).collect();
        Ok(FetchResult {
            count: resp.paging.size.unwrap_or(items.len()),
            last: resp.paging.last.unwrap_or_default(),
            items,
        })
    }
}
