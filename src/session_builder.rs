//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Builder for creating a [`Session`](crate::Session)
//!

use std::default::Default;
use std::env;
use std::result::Result;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{validation_err, NoSQLError};
use crate::session::Session;
use crate::transport::{ReqwestTransport, Transport};
use reqwest::Client;

/// Host of the public Deta Base service.
pub const DEFAULT_HOST: &str = "database.deta.sh";

/// Builder used to set all the parameters to create a [`Session`](crate::Session).
///
/// ```no_run
/// # use deta_base_rust_sdk::Session;
/// # fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let session = Session::builder()
///     .project_key("a0abcyxz_aSecretValue")?
///     .from_environment()?
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default, Debug, Clone)]
pub struct SessionBuilder {
    pub(crate) project_id: String,
    pub(crate) project_key: String,
    pub(crate) host: String,
    // full "scheme://host[:port]" override, mostly for local testing
    pub(crate) endpoint: String,
    pub(crate) use_https: bool,
    pub(crate) api_key_source: ApiKeySource,
    pub(crate) timeout: Option<Duration>,
    pub(crate) client: Option<Client>,
    pub(crate) transport: Option<Arc<dyn Transport>>,
    // For error messaging
    pub(crate) from_environment: bool,
}

/// Which credential is sent in the `X-API-Key` header.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeySource {
    /// Send the project identifier. This is the default.
    #[default]
    ProjectId,
    /// Send the project key (secret).
    ProjectKey,
}

impl SessionBuilder {
    /// Create a new SessionBuilder struct.
    ///
    /// The default SessionBuilder has no credentials. Consider calling
    /// [`from_environment()`](SessionBuilder::from_environment()) to collect them from the
    /// local environment.
    pub fn new() -> Self {
        SessionBuilder {
            host: DEFAULT_HOST.to_string(),
            use_https: true,
            ..Default::default()
        }
    }
    /// Build a new [`Session`].
    ///
    /// This does not perform any network activity.
    pub fn build(self) -> Result<Session, NoSQLError> {
        Session::new(self)
    }
    /// Gather configuration settings from the current environment.
    ///
    /// Values found in the environment override values set by earlier calls, and
    /// can be overridden by later calls.
    ///
    /// | variable | description |
    /// | -------- | ----------- |
    /// | `DETA_PROJECT_KEY` | The project key. See [`SessionBuilder::project_key()`]. |
    /// | `DETA_PROJECT_ID` | The project identifier. See [`SessionBuilder::project_id()`]. |
    /// | `DETA_BASE_HOST` | The service host. See [`SessionBuilder::host()`]. |
    /// | `DETA_BASE_ENDPOINT` | A full endpoint override. See [`SessionBuilder::endpoint()`]. |
    ///
    pub fn from_environment(mut self) -> Result<Self, NoSQLError> {
        self.from_environment = true;
        if let Ok(val) = env::var("DETA_PROJECT_KEY") {
            self = self.project_key(&val)?;
        }
        if let Ok(val) = env::var("DETA_PROJECT_ID") {
            self = self.project_id(&val)?;
        }
        if let Ok(val) = env::var("DETA_BASE_HOST") {
            self = self.host(&val)?;
        }
        if let Ok(val) = env::var("DETA_BASE_ENDPOINT") {
            self = self.endpoint(&val)?;
        }
        Ok(self)
    }
    /// Set the project key.
    ///
    /// Project keys have the form `<projectId>_<secret>`. If no project id was set,
    /// it is taken from the part of the key before the first `_`.
    pub fn project_key(mut self, key: &str) -> Result<Self, NoSQLError> {
        if key.is_empty() {
            return validation_err!("project key must be non-empty");
        }
        if self.project_id.is_empty() {
            if let Some((id, _)) = key.split_once('_') {
                self.project_id = id.to_string();
            }
        }
        self.project_key = key.to_string();
        Ok(self)
    }
    /// Set the project identifier explicitly.
    pub fn project_id(mut self, id: &str) -> Result<Self, NoSQLError> {
        if id.is_empty() {
            return validation_err!("project id must be non-empty");
        }
        self.project_id = id.to_string();
        Ok(self)
    }
    /// Set the service host. Requests are sent over https.
    ///
    /// The default is [`DEFAULT_HOST`].
    pub fn host(mut self, host: &str) -> Result<Self, NoSQLError> {
        if host.is_empty() {
            return validation_err!("host must be non-empty");
        }
        self.host = host.trim_end_matches('/').to_string();
        self.endpoint = String::new();
        self.use_https = true;
        Ok(self)
    }
    /// Set a specific endpoint connection to use, overriding the host.
    ///
    /// This is typically used to point the session at a local server for testing:
    /// ```text
    ///     http://localhost:8080
    /// ```
    pub fn endpoint(mut self, endpoint: &str) -> Result<Self, NoSQLError> {
        // normalize to just domain[:port]
        let ep = endpoint.trim_end_matches('/');
        if let Some(b) = ep.strip_prefix("https://") {
            self.use_https = true;
            self.endpoint = b.to_string();
        } else if let Some(b) = ep.strip_prefix("http://") {
            self.use_https = false;
            self.endpoint = b.to_string();
        } else {
            self.endpoint = ep.to_string();
        }
        if self.endpoint.is_empty() {
            return validation_err!("invalid endpoint '{}'", endpoint);
        }
        Ok(self)
    }
    /// Choose which credential is sent in the `X-API-Key` header.
    ///
    /// The default is [`ApiKeySource::ProjectId`].
    pub fn api_key_source(mut self, source: ApiKeySource) -> Result<Self, NoSQLError> {
        self.api_key_source = source;
        Ok(self)
    }
    /// Specify a timeout for the internally created http client.
    ///
    /// No timeout is configured by default. This has no effect if a
    /// [`transport()`](SessionBuilder::transport()) is given.
    pub fn timeout(mut self, timeout: Duration) -> Result<Self, NoSQLError> {
        if timeout.is_zero() {
            return validation_err!("timeout must be greater than zero");
        }
        self.timeout = Some(timeout);
        Ok(self)
    }
    /// Specify a [`reqwest::Client`] to use for all http/s connections.
    ///
    /// If your application already has a reqwest Client, you can pass that
    /// into the SessionBuilder to avoid creating multiple connection pools.
    pub fn reqwest_client(mut self, client: &Client) -> Result<Self, NoSQLError> {
        self.client = Some(client.clone());
        Ok(self)
    }
    /// Specify a custom [`Transport`] for all requests.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Result<Self, NoSQLError> {
        self.transport = Some(transport);
        Ok(self)
    }

    pub(crate) fn base_url(&self) -> String {
        let host = if self.endpoint.is_empty() {
            &self.host
        } else {
            &self.endpoint
        };
        let scheme = if self.use_https { "https" } else { "http" };
        format!("{}://{}/v1/{}", scheme, host, self.project_id)
    }

    pub(crate) fn make_transport(&self) -> Result<Arc<dyn Transport>, NoSQLError> {
        if let Some(t) = &self.transport {
            return Ok(t.clone());
        }
        if let Some(c) = &self.client {
            return Ok(Arc::new(ReqwestTransport::with_client(c)));
        }
        Ok(Arc::new(ReqwestTransport::new(self.timeout)?))
    }
}
