use super::AccessToken;
use serde_json::Value;

pub use reqwest::{Method, StatusCode};

/// One outgoing business call, before the gate has decided on a credential.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub bearer: Option<AccessToken>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        let mut request = Self::new(Method::POST, path);
        request.body = Some(body);
        request
    }

    pub fn with_bearer(mut self, bearer: Option<AccessToken>) -> Self {
        self.bearer = bearer;
        self
    }
}

/// What came back from the transport. Non-auth statuses (5xx included) are
/// handed to the caller untouched; only the statuses below are interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    /// Credential rejected outright: forces logout on non-public paths.
    pub fn is_session_invalid(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED || self.status == StatusCode::FORBIDDEN
    }

    /// Credential merely stale: triggers the refresh-and-retry protocol.
    /// Deliberately distinct from outright rejection so a stale token never
    /// forces logout before a refresh was attempted.
    pub fn is_session_expired(&self) -> bool {
        self.status == StatusCode::GONE
    }
}
