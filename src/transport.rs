//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Pluggable http transport used by a [`Session`](crate::Session).
//!
//! Requests and responses are plain data. A [`Transport`] only moves bytes: it
//! returns the response for every http status, and fails only when no response
//! could be obtained at all. Status interpretation is done by the session.
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::fmt::Debug;
use std::result::Result;
use std::time::Duration;
use tracing::trace;

use crate::error::{validation_err, NoSQLError};

/// Http method of a [`HttpRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An http request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Get the value of the first header matching `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An http response described as plain data.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            body: body.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait implemented by http clients that can carry requests for a [`Session`](crate::Session).
///
/// The default implementation is [`ReqwestTransport`]. Applications can supply
/// their own with [`SessionBuilder::transport()`](crate::SessionBuilder::transport()).
#[async_trait]
pub trait Transport: Debug + Send + Sync + 'static {
    /// Send a single request and return its response, whatever the status.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, NoSQLError>;
}

/// [`Transport`] backed by a [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with a new internal client.
    ///
    /// If `timeout` is `None`, no timeout is configured and requests wait as long as
    /// the underlying connection allows.
    pub fn new(timeout: Option<Duration>) -> Result<ReqwestTransport, NoSQLError> {
        let mut cb = reqwest::Client::builder();
        if let Some(t) = timeout {
            cb = cb.timeout(t).connect_timeout(t);
        }
        Ok(ReqwestTransport { client: cb.build()? })
    }

    /// Create a transport that shares an existing client (and its connection pool).
    pub fn with_client(client: &Client) -> ReqwestTransport {
        ReqwestTransport {
            client: client.clone(),
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, NoSQLError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };
        let mut headers = HeaderMap::new();
        for (k, v) in &request.headers {
            let name = match HeaderName::from_bytes(k.as_bytes()) {
                Ok(n) => n,
                Err(e) => return validation_err!("invalid header name '{}': {}", k, e),
            };
            headers.insert(name, HeaderValue::from_str(v)?);
        }
        let mut rb = self.client.request(method, &request.url).headers(headers);
        if let Some(body) = request.body {
            rb = rb.body(body);
        }
        let resp = rb.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        trace!("{} {} -> {}", request.method.as_str(), request.url, status);
        Ok(HttpResponse { status, body })
    }
}
