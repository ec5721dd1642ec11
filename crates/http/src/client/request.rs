//! Request and response values passed through the client pipeline

use super::ClientError;
use reqwest::{Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value as JsonValue;
use std::fmt;

/// One logical API call
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Path relative to the client's base URL, starting with `/`
    pub path: String,
    pub body: Option<JsonValue>,
    /// Set once the call has been through a session refresh; a retried
    /// request is never refreshed again
    pub retried: bool,
    /// Allowed without a session even though its path is not in the public
    /// set, e.g. `POST /users` next to a protected `GET /users`
    pub public: bool,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            retried: false,
            public: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Exempt this one call from the gate and from refresh-and-retry
    #[must_use]
    pub fn as_public(mut self) -> Self {
        self.public = true;
        self
    }

    /// Attach a JSON body
    ///
    /// # Errors
    ///
    /// Returns an error if `body` cannot be serialized
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

impl fmt::Display for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Successful response with its parsed body
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    /// Parsed JSON body, `Null` when the body was empty
    pub body: JsonValue,
}

impl ApiResponse {
    /// Deserialize the body into a typed value
    ///
    /// # Errors
    ///
    /// Returns an error if the body does not match `T`
    pub fn json<T: DeserializeOwned>(self) -> Result<T, ClientError> {
        Ok(serde_json::from_value(self.body)?)
    }
}
