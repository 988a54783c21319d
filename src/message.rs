//! Request and response value objects.
//!
//! # Design Decisions
//! - One opaque field-map shape for all endpoints rather than a typed
//!   request/response pair per endpoint; the remote API client collaborator
//!   interprets the fields
//! - Ordered map so serialized form is deterministic
//! - Requests are immutable once submitted; the builder consumes self

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// An opaque request for a remote call.
///
/// Built once with [`RemoteRequest::with`] and then treated as immutable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteRequest {
    fields: BTreeMap<String, String>,
}

impl RemoteRequest {
    /// Create an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, consuming and returning the request.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Look up a field value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Number of fields set on the request.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the request carries no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render the request as a JSON object for submission.
    pub fn to_json(&self) -> PipelineResult<String> {
        serde_json::to_string(&self.fields)
            .map_err(|e| PipelineError::Transport(format!("request serialization failed: {}", e)))
    }
}

/// An opaque response from a remote call.
///
/// Consumed by reference to derive the next stage's request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteResponse {
    fields: BTreeMap<String, String>,
}

impl RemoteResponse {
    /// Create an empty response.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, consuming and returning the response.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Look up a field value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Parse a flat JSON object of string values into a response.
    pub fn from_json(body: &str) -> PipelineResult<Self> {
        let fields: BTreeMap<String, String> = serde_json::from_str(body)
            .map_err(|e| PipelineError::RemoteService(format!("malformed response body: {}", e)))?;
        Ok(Self { fields })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let req = RemoteRequest::new()
            .with("text", "jaguar jungle food")
            .with("resultMime", "application/x-tf+xml+gz");

        assert_eq!(req.get("text"), Some("jaguar jungle food"));
        assert_eq!(req.get("resultMime"), Some("application/x-tf+xml+gz"));
        assert_eq!(req.get("missing"), None);
        assert_eq!(req.len(), 2);
        assert!(!req.is_empty());
    }

    #[test]
    fn test_request_json_is_deterministic() {
        let req = RemoteRequest::new().with("b", "2").with("a", "1");
        assert_eq!(req.to_json().unwrap(), r#"{"a":"1","b":"2"}"#);
    }

    #[test]
    fn test_response_from_json() {
        let resp = RemoteResponse::from_json(r#"{"text":"<p>tide</p>","menu":"<div/>"}"#).unwrap();
        assert_eq!(resp.get("text"), Some("<p>tide</p>"));
        assert_eq!(resp.get("menu"), Some("<div/>"));
    }

    #[test]
    fn test_response_from_malformed_json() {
        let err = RemoteResponse::from_json("not json").unwrap_err();
        assert!(matches!(err, PipelineError::RemoteService(_)));
    }
}
