//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Deta Base Rust SDK
//!
//! This is a Rust client for [Deta Base](https://deta.space/docs/en/build/reference/deta-base),
//! a hosted NoSQL document store. Items are JSON objects stored in named collections
//! ("bases") under a project, and addressed by a string key.
//!
//! This SDK supplies and uses Rust `async` methods throughout, using the [tokio](https://crates.io/crates/tokio) runtime. There is currently no blocking support.
//!
//! The general flow for an application is:
//! - Create a [`SessionBuilder`] with the project key and any other needed parameters
//! - Create a [`Session`] from the [`SessionBuilder`] that will be used throughout the application, across all threads
//! - Get a [`Collection`] from the [`Session`] and call its methods, or use the Request structs such as [`GetRequest`], [`PutRequest`], [`FetchRequest`], etc. for more options.
//!
//! ## Simple Example
//! The following code creates a [`Session`] from values in the current environment and then reads a single item from a collection.
//! ```no_run
//! use deta_base_rust_sdk::Session;
//! use std::error::Error;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn Error>> {
//!     let session = Session::builder()
//!         .from_environment()?
//!         .build()?;
//!     let users = session.collection("users");
//!     let item = users.get("user-10").await?;
//!     println!("item={}", item);
//!     Ok(())
//! }
//! ```
//!
//! ## Prerequisites
//! - Rust 1.78 or later
//! - A Deta project key. The project id is the part of the key before the first `_`.
//!
//! ## Installation
//! Add the following dependency to your `Cargo.toml` file:
//! ```text
//! [dependencies]
//! deta-base-rust-sdk = "0.1"
//! ```
//!
//! ## Configuring the SDK
//!
//! All configuration is done on the [`SessionBuilder`]. Later calls override earlier
//! ones, so defaults can be set in code and overridden by [`SessionBuilder::from_environment()`],
//! which reads:
//!
//! | variable | builder method |
//! |---|---|
//! | `DETA_PROJECT_KEY` | [`SessionBuilder::project_key()`] |
//! | `DETA_PROJECT_ID` | [`SessionBuilder::project_id()`] |
//! | `DETA_BASE_HOST` | [`SessionBuilder::host()`] |
//! | `DETA_BASE_ENDPOINT` | [`SessionBuilder::endpoint()`] |
//!
//! ```no_run
//! # use deta_base_rust_sdk::Session;
//! # fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let session = Session::builder()
//!     .project_key("a0abcyxz_aSecretValue")?
//!     // for a local emulator:
//!     // .endpoint("http://localhost:8080")?
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! Building a session does not perform any network activity. There is no default
//! request timeout; use [`SessionBuilder::timeout()`] to set one, or drop the future to
//! cancel an operation.
//!
//! ## Quickstart
//!
//! ```no_run
//! use deta_base_rust_sdk::types::MapValue;
//! use deta_base_rust_sdk::{NoSQLErrorCode, Query, Session};
//! use std::error::Error;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn Error>> {
//!     let session = Session::builder().from_environment()?.build()?;
//!     let users = session.collection("users");
//!
//!     // put replaces any existing item with the same key
//!     let stored = users
//!         .put(MapValue::new().str("name", "jane").i64("age", 31), Some("user-10"))
//!         .await?;
//!     println!("stored={}", stored);
//!
//!     // insert fails if the key is taken
//!     match users.insert(MapValue::new().str("name", "john"), Some("user-10")).await {
//!         Err(e) if e.code == NoSQLErrorCode::Conflict => println!("key already exists"),
//!         other => println!("insert={:?}", other),
//!     }
//!
//!     // scalars are stored as {"value": ...}; the service generates the key
//!     let note = users.put("just a string", None).await?;
//!     println!("note key={:?}", note.key());
//!
//!     // partial update
//!     users.update("user-10", MapValue::new().i64("age", 32)).await?;
//!
//!     // query: (age > 30 AND name starts with "j") OR admin == true
//!     let q = Query::field("age").greater_than(30)
//!         .and("name").prefix("j")
//!         .or("admin").equal_to(true);
//!     for item in users.fetch_all(q).await? {
//!         println!("match={}", item);
//!     }
//!
//!     if !users.delete("user-10").await {
//!         println!("delete did not succeed");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! The SDK logs through [tracing](https://crates.io/crates/tracing). To see its output, install a
//! subscriber in the application, for example:
//! ```text
//! tracing_subscriber::fmt()
//!     .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
//!     .init();
//! ```
//! and run with `RUST_LOG=deta_base_rust_sdk=debug`.
//!
//! ## Examples
//!
//! A complete runnable program is in `demos/quickstart`:
//! ```text
//! DETA_PROJECT_KEY=... cargo run --example quickstart
//! ```
//!
//! ## License
//!
//! This SDK is licensed under the Universal Permissive License 1.0.
//!

pub(crate) mod collection;
pub use crate::collection::Collection;

pub(crate) mod delete_request;
pub use crate::delete_request::{DeleteRequest, DeleteResult};

pub(crate) mod error;
pub use crate::error::{NoSQLError, NoSQLErrorCode};

pub(crate) mod fetch_request;
pub use crate::fetch_request::{FetchRequest, FetchResult, DEFAULT_FETCH_LIMIT};

pub(crate) mod get_request;
pub use crate::get_request::{GetRequest, GetResult};

#[cfg(test)]
pub(crate) mod mapvalue_tests;

pub(crate) mod put_many_request;
pub use crate::put_many_request::{PutManyRequest, PutManyResult, MAX_PUT_MANY_ITEMS};

pub(crate) mod put_request;
pub use crate::put_request::{Expiry, PutRequest, PutResult};

pub mod query;
pub use crate::query::{FieldQuery, Query, QueryOperator};


pub(crate) mod session;
pub use crate::session::Session;

pub(crate) mod session_builder;
pub use crate::session_builder::{ApiKeySource, SessionBuilder, DEFAULT_HOST};

pub mod transport;
pub use crate::transport::{HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport};

pub mod types;

pub(crate) mod update_request;
pub use crate::update_request::{UpdateRequest, UpdateResult};
