//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//

// This is an example program showing the basic operations on a collection:
// put, insert, get, update, fetch and delete. It writes a handful of items
// into a "quickstart_users" collection, queries them back, and removes them.

// To run this example:
//    DETA_PROJECT_KEY=<your project key> cargo run --example quickstart
//
// for extra output:
//    RUST_LOG=debug cargo run --example quickstart
//
// or, for a LOT of tracing output:
//    RUST_LOG=trace cargo run --example quickstart

use deta_base_rust_sdk::types::MapValue;
use deta_base_rust_sdk::NoSQLError;
use deta_base_rust_sdk::NoSQLErrorCode;
use deta_base_rust_sdk::PutRequest;
use deta_base_rust_sdk::Query;
use deta_base_rust_sdk::Session;
use deta_base_rust_sdk::UpdateRequest;
use std::error::Error;
use std::time::Duration;
use tracing::info;

// This method shows various ways to configure a Session.
fn get_session() -> Result<Session, NoSQLError> {
    // Note: later methods called on this builder will override earlier methods.
    // This allows for setting desired defaults that can be overridden by, for example,
    // .from_environment().
    Session::builder()
        // For a local emulator:
        // .endpoint("http://localhost:8080")?
        //
        // For a non-default host:
        // .host("database.example.com")?
        //
        // If the project key does not start with the project id:
        // .project_id("a0abcyxz")?
        //
        // Optional: a request timeout (there is none by default)
        .timeout(Duration::from_secs(15))?
        //
        // Read DETA_PROJECT_KEY and friends:
        .from_environment()?
        //
        // Build the session
        .build()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Set up a tracing subscriber to see output based on RUST_LOG environment setting
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_ansi(false)
        .compact()
        .init();

    // Create a session. This should be used throughout the program
    info!("Creating new session...");
    let session = get_session()?;
    let users = session.collection("quickstart_users");

    // Put an item into the collection, replacing any previous one with that key
    let stored = users
        .put(MapValue::new().str("name", "jane").i64("age", 31), Some("u10"))
        .await?;
    println!("put={}", stored);

    // Insert fails if the key already exists
    match users.insert(MapValue::new().str("name", "john"), Some("u10")).await {
        Err(e) if e.code == NoSQLErrorCode::Conflict => println!("insert: u10 already exists"),
        other => println!("insert={:?}", other),
    }

    // Non-map values are stored as {"value": ...}, with a generated key
    let note = users.put("a plain string", None).await?;
    println!("note key={:?}", note.key());

    // write in some more items, so the fetch below has more to return
    let batch: Vec<MapValue> = (20..30)
        .map(|i| {
            MapValue::new()
                .str("key", &format!("u{}", i))
                .str("name", "somename")
                .i64("age", i)
        })
        .collect();
    let stored = users.put_many(batch).await?;
    println!("put_many stored {} items", stored.len());

    // An item that removes itself after an hour
    PutRequest::new("quickstart_users")
        .value(MapValue::new().str("name", "temporary"))
        .key("temp1")
        .expire_in(Duration::from_secs(3600))
        .execute(&session)
        .await?;

    // Get the item back
    let item = users.get("u10").await?;
    println!("get={}", item);

    // Update: the result holds only the fields that were set
    let set = users.update("u10", MapValue::new().i64("age", 32)).await?;
    println!("update set={}", set);

    // Other update operations are available on UpdateRequest
    let res = UpdateRequest::new("quickstart_users", "u10")
        .increment("logins", 1)
        .append("tags", vec!["rust".into()])
        .execute(&session)
        .await?;
    println!("update result={:?}", res);

    // One page of a query: (age >= 25 AND name starts with "some") OR name == "jane"
    let q = Query::field("age")
        .greater_than_or_equal(25)
        .and("name")
        .prefix("some")
        .or("name")
        .equal_to("jane");
    let page = users.fetch(q.clone(), 3, "").await?;
    println!("fetch page: count={} last={:?}", page.count(), page.last());

    // All pages
    let all = users.fetch_all(q).await?;
    println!("fetch_all returned {} items", all.len());

    // Clean up
    let mut keys: Vec<String> = vec!["u10".to_string(), "temp1".to_string()];
    keys.extend((20..30).map(|i| format!("u{}", i)));
    if let Some(k) = note.key() {
        keys.push(k.to_string());
    }
    for k in keys {
        if !users.delete(&k).await {
            println!("delete of {} did not succeed", k);
        }
    }

    Ok(())
}
