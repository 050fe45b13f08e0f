//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use deta_base_rust_sdk::transport::{HttpMethod, HttpRequest, HttpResponse, Transport};
use deta_base_rust_sdk::types::MapValue;
use deta_base_rust_sdk::{
    NoSQLError, NoSQLErrorCode, PutRequest, Query, Session, SessionBuilder,
};

// A tiny in-memory stand-in for the service: it understands single-item
// put/get/delete, which is enough to drive the public api end to end.
#[derive(Debug, Default)]
struct MemoryTransport {
    items: Mutex<serde_json::Map<String, Value>>,
    calls: AtomicUsize,
    last_body: Mutex<Option<Value>>,
}

impl MemoryTransport {
    fn key_of(url: &str) -> String {
        url.rsplit('/').next().unwrap_or_default().to_string()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, NoSQLError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let body: Option<Value> = req.body.as_deref().map(|b| serde_json::from_str(b).unwrap());
        *self.last_body.lock().unwrap() = body.clone();
        let mut items = self.items.lock().unwrap();
        let resp = match req.method {
            HttpMethod::Put | HttpMethod::Post => {
                let mut stored = Vec::new();
                for item in body.unwrap()["items"].as_array().unwrap() {
                    let mut item = item.clone();
                    let key = match item.get("key").and_then(Value::as_str) {
                        Some(k) => k.to_string(),
                        None => format!("gen{}", items.len() + 1),
                    };
                    if req.method == HttpMethod::Post && items.contains_key(&key) {
                        return Ok(HttpResponse::new(
                            409,
                            &json!({"errors": [format!("Key {} already exists", key)]}).to_string(),
                        ));
                    }
                    item["key"] = Value::from(key.as_str());
                    items.insert(key, item.clone());
                    stored.push(item);
                }
                HttpResponse::new(207, &json!({"processed": {"items": stored}}).to_string())
            }
            HttpMethod::Get => {
                let key = Self::key_of(&req.url);
                match items.get(&key) {
                    Some(item) => HttpResponse::new(200, &item.to_string()),
                    None => HttpResponse::new(404, &json!({"key": key}).to_string()),
                }
            }
            HttpMethod::Delete => {
                let key = Self::key_of(&req.url);
                items.remove(&key);
                HttpResponse::new(200, &json!({"key": key}).to_string())
            }
            HttpMethod::Patch => HttpResponse::new(400, r#"{"errors":["not supported"]}"#),
        };
        Ok(resp)
    }
}

fn memory_session() -> Result<(Session, Arc<MemoryTransport>), NoSQLError> {
    let transport = Arc::new(MemoryTransport::default());
    let session = Session::builder()
        .project_key("testproj_secret")?
        .transport(transport.clone())?
        .build()?;
    Ok((session, transport))
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct User {
    key: String,
    name: String,
    age: u32,
}

#[tokio::test]
async fn put_get_delete_cycle() -> Result<(), Box<dyn Error>> {
    let (session, transport) = memory_session()?;
    let users = session.collection("users");
    assert_eq!(users.name(), "users");

    let stored = users
        .put(MapValue::new().str("name", "jane").i64("age", 31), Some("u10"))
        .await?;
    assert_eq!(stored.key(), Some("u10"));

    let user: User = users.get_into("u10").await?;
    assert_eq!(
        user,
        User {
            key: "u10".to_string(),
            name: "jane".to_string(),
            age: 31
        }
    );

    let e = users
        .insert(MapValue::new().str("name", "john"), Some("u10"))
        .await
        .unwrap_err();
    assert_eq!(e.code, NoSQLErrorCode::Conflict);

    assert!(users.delete("u10").await);
    let e = users.get("u10").await.unwrap_err();
    assert_eq!(e.code, NoSQLErrorCode::NotFound);
    assert_eq!(e.key(), Some("u10"));
    assert_eq!(transport.calls.load(Ordering::SeqCst), 5);
    Ok(())
}

#[tokio::test]
async fn generated_key_reads_back_same_item() -> Result<(), Box<dyn Error>> {
    let (session, _) = memory_session()?;
    let users = session.collection("users");

    let stored = users
        .put(MapValue::new().str("name", "ann").i64("age", 40), None)
        .await?;
    let key = stored.key().ok_or("stored item has no key")?;
    assert!(!key.is_empty());

    let item = users.get(key).await?;
    assert_eq!(item, stored);
    assert_eq!(item.get_string("name"), Some("ann".to_string()));
    assert_eq!(item.get_i64("age"), Some(40));
    Ok(())
}

#[tokio::test]
async fn put_native_struct_with_expiry() -> Result<(), Box<dyn Error>> {
    let (session, transport) = memory_session()?;
    let user = User {
        key: "u1".to_string(),
        name: "ann".to_string(),
        age: 22,
    };
    let before = chrono::Utc::now().timestamp();
    let res = PutRequest::new("users")
        .put(&user)?
        .expire_in(Duration::from_secs(3600))
        .execute(&session)
        .await?;
    assert_eq!(res.key(), Some("u1"));

    let body = transport.last_body.lock().unwrap().clone().unwrap();
    let expires = body["items"][0]["__expires"].as_i64().unwrap();
    assert!(expires >= before + 3600);
    assert!(expires <= chrono::Utc::now().timestamp() + 3600);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn session_is_shared_across_tasks() -> Result<(), Box<dyn Error>> {
    let (session, transport) = memory_session()?;
    let mut tasks = Vec::new();
    for i in 0..8 {
        let users = session.collection("users");
        tasks.push(tokio::spawn(async move {
            users.put(i as i64, Some(&format!("k{}", i))).await
        }));
    }
    for t in tasks {
        t.await??;
    }
    assert_eq!(transport.items.lock().unwrap().len(), 8);
    assert_eq!(session.collection("users").get("k3").await?.get_i64("value"), Some(3));
    Ok(())
}

#[test]
fn build_requires_credentials() {
    let e = SessionBuilder::new().build().unwrap_err();
    assert_eq!(e.code, NoSQLErrorCode::ValidationError);
    // a key without the id prefix needs an explicit project id
    let e = SessionBuilder::new()
        .project_key("secretonly")
        .unwrap()
        .build()
        .unwrap_err();
    assert_eq!(e.code, NoSQLErrorCode::ValidationError);
    let s = SessionBuilder::new()
        .project_key("secretonly")
        .unwrap()
        .project_id("p9")
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(s.project_id(), "p9");
}

// Runs against the real service only when DETA_PROJECT_KEY is set.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn smoke_test() -> Result<(), Box<dyn Error>> {
    if std::env::var("DETA_PROJECT_KEY").is_err() {
        return Ok(());
    }
    // Set up a tracing subscriber to see output based on RUST_LOG environment setting
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_ansi(false)
        .compact()
        .try_init();

    let session = Session::builder()
        .timeout(Duration::from_secs(30))?
        .from_environment()?
        .build()?;
    let c = session.collection("rust_sdk_smoke");

    let stored = c
        .put(MapValue::new().str("name", "jane").i64("age", 31), Some("smoke1"))
        .await?;
    println!("put={}", stored);
    let item = c.get("smoke1").await?;
    assert_eq!(item.get_string("name"), Some("jane".to_string()));

    let set = c.update("smoke1", MapValue::new().i64("age", 32)).await?;
    assert_eq!(set.get_i64("age"), Some(32));

    let found = c
        .fetch(Query::field("age").greater_than_or_equal(32), 10, "")
        .await?;
    println!("fetch={:?}", found);
    assert!(found.items().iter().any(|i| i.key() == Some("smoke1")));

    assert!(c.delete("smoke1").await);
    Ok(())
}
