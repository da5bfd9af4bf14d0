use crate::application_port::GateError;
use crate::domain_model::{AccessToken, ApiRequest, ApiResponse};
use crate::domain_port::Transport;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RefreshBody {
    #[serde(rename = "accessToken")]
    access_token: String,
}

/// Transport over reqwest.
///
/// The cookie store is the implicit credential channel: the backend sets an
/// HTTP-only refresh cookie at login, and `refresh` rides it with an empty
/// body. Business calls carry exactly the credential the gate decided on.
pub struct ReqwestTransport {
    http: reqwest::Client,
    base_url: String,
    refresh_path: String,
}

impl ReqwestTransport {
    pub fn new(
        base_url: impl Into<String>,
        refresh_path: impl Into<String>,
    ) -> Result<Self, GateError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| GateError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            refresh_path: refresh_path.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, GateError> {
        let mut builder = self
            .http
            .request(request.method.clone(), self.url(&request.path));
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(&token.0);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let response = builder
            .send()
            .await
            .map_err(|e| GateError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .json::<serde_json::Value>()
            .await
            .unwrap_or(serde_json::Value::Null);
        Ok(ApiResponse { status, body })
    }

    async fn refresh(&self) -> Result<AccessToken, GateError> {
        let response = self
            .http
            .post(self.url(&self.refresh_path))
            .send()
            .await
            .map_err(|e| GateError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(GateError::RefreshFailed(format!(
                "refresh endpoint returned {status}"
            )));
        }
        let body: RefreshBody = response
            .json()
            .await
            .map_err(|e| GateError::RefreshFailed(format!("refresh body: {e}")))?;
        Ok(AccessToken(body.access_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_without_doubled_slashes() {
        let transport =
            ReqwestTransport::new("https://api.example.test/", "/auth/refresh").unwrap();
        assert_eq!(
            transport.url("/students"),
            "https://api.example.test/students"
        );
    }
}
