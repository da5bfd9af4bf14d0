use crate::application_port::GateError;
use crate::domain_model::{AccessToken, ApiRequest, ApiResponse};

/// Raw HTTP seam under the gates.
///
/// `execute` performs one business call exactly as given: the credential on
/// the request (or its absence) is final, nothing is injected. `refresh`
/// performs the body-less refresh call; its credential travels in the
/// transport's own implicit channel (an HTTP-only cookie), never as an
/// explicit parameter.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, GateError>;
    async fn refresh(&self) -> Result<AccessToken, GateError>;
}
