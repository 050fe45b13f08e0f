//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use serde_json::Value;
use std::result::Result;
use std::sync::Arc;
use tracing::{debug, trace};
use url::Url;

use crate::collection::Collection;
use crate::error::{generic_err, user_agent, validation_err, NoSQLError};
use crate::session_builder::{ApiKeySource, SessionBuilder};
use crate::transport::{HttpMethod, HttpRequest, Transport};

/// **The main service session**.
///
/// This should be created once and used throughout the application lifetime,
/// across all tasks and threads.
///
/// Note: there is no need to enclose this struct in an `Rc` or [`Arc`], as it uses an
/// [`Arc`] internally, so calling `.clone()` on this struct will always return the
/// same underlying session.
#[derive(Clone, Debug)]
pub struct Session {
    // Use an inner Arc so cloning keeps the same contents
    pub(crate) inner: Arc<SessionRef>,
}

#[derive(Debug)]
pub(crate) struct SessionRef {
    pub(crate) project_id: String,
    pub(crate) project_key: String,
    // "http[s]://{host}/v1/{project_id}"
    pub(crate) base_url: String,
    pub(crate) api_key_source: ApiKeySource,
    pub(crate) transport: Arc<dyn Transport>,
}

impl Session {
    /// Create a new [`SessionBuilder`].
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    // Create the new Session based on builder configuration
    pub(crate) fn new(b: SessionBuilder) -> Result<Session, NoSQLError> {
        if b.project_key.is_empty() {
            if b.from_environment {
                return validation_err!(
                    "cannot build session: no project key specified. set DETA_PROJECT_KEY environment."
                );
            }
            return validation_err!("cannot build session: no project key specified");
        }
        if b.project_id.is_empty() {
            return validation_err!(
                "cannot build session: project id not given and not derivable from project key"
            );
        }
        let transport = b.make_transport()?;
        let base_url = b.base_url();
        // fail early on a host that cannot form a url
        Url::parse(&base_url)?;
        debug!(
            "Creating new Session: project={}, endpoint={}, api key source={:?}",
            b.project_id, base_url, b.api_key_source
        );
        Ok(Session {
            inner: Arc::new(SessionRef {
                project_id: b.project_id,
                project_key: b.project_key,
                base_url,
                api_key_source: b.api_key_source,
                transport,
            }),
        })
    }

    /// Get a handle to the named collection. This does not perform any network activity.
    pub fn collection(&self, name: &str) -> Collection {
        Collection::new(name, self)
    }

    pub fn project_id(&self) -> &str {
        &self.inner.project_id
    }

    fn api_key(&self) -> &str {
        match self.inner.api_key_source {
            ApiKeySource::ProjectId => &self.inner.project_id,
            ApiKeySource::ProjectKey => &self.inner.project_key,
        }
    }

    // Build "{base}/{collection}/{segments...}", with each piece percent-encoded
    // as a single path segment.
    pub(crate) fn collection_url(
        &self,
        collection: &str,
        segments: &[&str],
    ) -> Result<String, NoSQLError> {
        if collection.is_empty() {
            return validation_err!("collection name must be non-empty");
        }
        let mut url = Url::parse(&self.inner.base_url)?;
        match url.path_segments_mut() {
            Ok(mut ps) => {
                ps.pop_if_empty().push(collection).extend(segments);
            }
            Err(_) => {
                return validation_err!("endpoint {} cannot be a base url", self.inner.base_url);
            }
        }
        Ok(url.to_string())
    }

    /// Send one request and return the decoded json body, if any.
    ///
    /// Non-successful statuses are mapped with [`NoSQLError::from_response()`].
    pub(crate) async fn send_and_receive(
        &self,
        method: HttpMethod,
        url: String,
        body: Option<&Value>,
    ) -> Result<Option<Value>, NoSQLError> {
        let mut headers = vec![
            ("Accept".to_string(), "application/json".to_string()),
            ("X-API-Key".to_string(), self.api_key().to_string()),
            ("User-Agent".to_string(), user_agent().to_string()),
        ];
        let body = match body {
            Some(b) => {
                headers.push(("Content-Type".to_string(), "application/json".to_string()));
                Some(serde_json::to_string(b)?)
            }
            None => None,
        };
        trace!("{} {} body={:?}", method.as_str(), url, body);
        let req = HttpRequest {
            method,
            url,
            headers,
            body,
        };
        let resp = self.inner.transport.send(req).await?;
        if !resp.is_success() {
            let err = NoSQLError::from_response(resp.status, &resp.body);
            debug!("request failed: status={} error={}", resp.status, err);
            return Err(err);
        }
        if resp.body.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str(&resp.body) {
            Ok(v) => Ok(Some(v)),
            Err(e) => generic_err!("malformed response body: {}: {}", e, resp.body),
        }
    }
}
