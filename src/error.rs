//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use num_enum::TryFromPrimitive;
use serde_json::Value;

include!(concat!(env!("OUT_DIR"), "/ua.rs"));

pub(crate) fn sdk_version() -> &'static str {
    SDK_VERSION
}

pub(crate) fn user_agent() -> &'static str {
    USER_AGENT
}

/// Error returned by all fallible operations in this library.
///
/// The [`code`](NoSQLError::code) field identifies the kind of failure. For
/// [`NoSQLErrorCode::NotFound`] errors raised because a specific item key does not
/// exist, [`key`](NoSQLError::key) holds that key.
#[derive(Debug, Clone)]
pub struct NoSQLError {
    pub code: NoSQLErrorCode,
    pub message: String,
    pub key: Option<String>,
}

impl std::error::Error for NoSQLError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl std::fmt::Display for NoSQLError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if let Some(k) = &self.key {
            return write!(
                f,
                "code={:?} key=\"{}\" message=\"{}\"",
                self.code, k, self.message
            );
        }
        write!(f, "code={:?} message=\"{}\"", self.code, self.message)
    }
}

impl NoSQLError {
    pub fn new(code: NoSQLErrorCode, msg: &str) -> NoSQLError {
        NoSQLError {
            code,
            message: msg.to_string(),
            key: None,
        }
    }

    /// Create a [`NoSQLErrorCode::NotFound`] error for a specific item key.
    pub fn key_not_found(key: &str) -> NoSQLError {
        NoSQLError {
            code: NoSQLErrorCode::NotFound,
            message: format!("key '{}' not found", key),
            key: Some(key.to_string()),
        }
    }

    /// The item key this error refers to, if any.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Map a non-successful http response into an error.
    ///
    /// The remote service signals failures with a status code and one of two body
    /// shapes: `{"key": "..."}` for a missing item, or `{"errors": ["..."]}` for
    /// everything else. Unknown statuses and unexpected bodies become
    /// [`NoSQLErrorCode::GenericError`].
    pub(crate) fn from_response(status: u16, body: &str) -> NoSQLError {
        let generic = || {
            NoSQLError::new(
                NoSQLErrorCode::GenericError,
                &format!(
                    "got unexpected http status: {}, response text: {}",
                    status, body
                ),
            )
        };
        let parsed: Value = match serde_json::from_str(body) {
            Ok(v) => v,
            Err(_) => return generic(),
        };
        if status == 404 {
            if let Some(k) = parsed.get("key").and_then(Value::as_str) {
                return NoSQLError::key_not_found(k);
            }
        }
        let first_error = match parsed.get("errors").and_then(Value::as_array) {
            Some(errs) => errs
                .first()
                .map(|e| match e.as_str() {
                    Some(s) => s.to_string(),
                    None => e.to_string(),
                })
                .unwrap_or_default(),
            None => return generic(),
        };
        match NoSQLErrorCode::try_from(status) {
            Ok(
                code @ (NoSQLErrorCode::NotFound
                | NoSQLErrorCode::ValidationError
                | NoSQLErrorCode::Unauthorized
                | NoSQLErrorCode::Conflict),
            ) => NoSQLError::new(code, &first_error),
            _ => generic(),
        }
    }
}

macro_rules! validation_error {
    ($($t:tt)*) => {{
        let m = format!($($t)*);
        crate::error::NoSQLError {
            code: crate::error::NoSQLErrorCode::ValidationError,
            message: format!("{} ({})", m, crate::error::sdk_version()),
            key: None,
        }
    }};
}

pub(crate) use validation_error;

macro_rules! validation_err {
    ($($t:tt)*) => {{
        Err(crate::error::validation_error!($($t)*))
    }};
}

pub(crate) use validation_err;

macro_rules! generic_error {
    ($($t:tt)*) => {{
        let m = format!($($t)*);
        crate::error::NoSQLError {
            code: crate::error::NoSQLErrorCode::GenericError,
            message: format!("{} ({})", m, crate::error::sdk_version()),
            key: None,
        }
    }};
}

pub(crate) use generic_error;

macro_rules! generic_err {
    ($($t:tt)*) => {{
        Err(crate::error::generic_error!($($t)*))
    }};
}

pub(crate) use generic_err;

impl From<reqwest::Error> for NoSQLError {
    fn from(e: reqwest::Error) -> Self {
        generic_error!("reqwest error: {}", e.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for NoSQLError {
    fn from(e: reqwest::header::InvalidHeaderValue) -> Self {
        validation_error!("invalid header value: {}", e.to_string())
    }
}

impl From<url::ParseError> for NoSQLError {
    fn from(e: url::ParseError) -> Self {
        validation_error!("error parsing url: {}", e.to_string())
    }
}

impl From<serde_json::Error> for NoSQLError {
    fn from(e: serde_json::Error) -> Self {
        generic_error!("invalid json: {}", e.to_string())
    }
}

// NoSQLErrorCode represents the kind of failure.
//
// Codes that can be reported by the remote service share their value with the
// http status that carries them. Codes that are only detected locally use
// small values that never appear as http statuses.
#[derive(Debug, Clone, Copy, Eq, PartialEq, TryFromPrimitive)]
#[repr(u16)]
pub enum NoSQLErrorCode {
    /// GenericError is the fallback for unexpected statuses, malformed or empty
    /// response bodies, and transport failures.
    GenericError = 0,

    /// UnsupportedType represents an item value that is neither a map nor one of
    /// the accepted scalar or array kinds (for example, JSON `null`).
    UnsupportedType = 1,

    /// ValidationError represents a bad request. It is returned by the service
    /// as a 400, and is also raised locally before any network call for
    /// violations such as oversized batches, empty keys or invalid fetch limits.
    ValidationError = 400,

    /// Unauthorized represents a rejected API key.
    Unauthorized = 401,

    /// NotFound represents a missing item or resource.
    NotFound = 404,

    /// Conflict represents an insert of a key that already exists.
    Conflict = 409,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_missing_key_body() {
        let e = NoSQLError::from_response(404, r#"{"key":"u1"}"#);
        assert_eq!(e.code, NoSQLErrorCode::NotFound);
        assert_eq!(e.key(), Some("u1"));
    }

    #[test]
    fn maps_error_list_bodies() {
        let cases = [
            (404, NoSQLErrorCode::NotFound),
            (400, NoSQLErrorCode::ValidationError),
            (401, NoSQLErrorCode::Unauthorized),
            (409, NoSQLErrorCode::Conflict),
        ];
        for (status, code) in cases {
            let e = NoSQLError::from_response(status, r#"{"errors":["first","second"]}"#);
            assert_eq!(e.code, code, "status {}", status);
            assert_eq!(e.message, "first");
            assert!(e.key().is_none());
        }
    }

    #[test]
    fn user_agent_carries_sdk_version() {
        assert!(user_agent().starts_with("DetaBase-RustSDK/"));
        assert!(user_agent().contains(sdk_version()));
        assert_eq!(sdk_version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn falls_back_to_generic() {
        let e = NoSQLError::from_response(500, r#"{"errors":["boom"]}"#);
        assert_eq!(e.code, NoSQLErrorCode::GenericError);
        let e = NoSQLError::from_response(409, "");
        assert_eq!(e.code, NoSQLErrorCode::GenericError);
        let e = NoSQLError::from_response(400, r#"{"message":"nope"}"#);
        assert_eq!(e.code, NoSQLErrorCode::GenericError);
        assert!(e.message.contains("400"));
    }
}
