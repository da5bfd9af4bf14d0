use crate::application_port::GateError;
use crate::domain_model::{ApiRequest, ApiResponse};

/// The surface business modules call through. Every call passes the request
/// gate on the way out and the response gate on the way back; callers never
/// see the refresh protocol, only its outcome.
#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    async fn request(&self, request: ApiRequest) -> Result<ApiResponse, GateError>;
}
