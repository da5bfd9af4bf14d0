use crate::application_port::GateError;
use crate::domain_model::{AccessToken, ApiRequest, ApiResponse, StatusCode};
use crate::domain_port::Transport;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

// Scriptable transport for exercising the gates without a network: statuses
// pop FIFO per executed call (default 200), refresh outcomes likewise.
// Extend with more knobs as scenarios need them.
#[derive(Default)]
pub struct FakeTransport {
    sent: Mutex<Vec<ApiRequest>>,
    statuses: Mutex<VecDeque<StatusCode>>,
    refresh_outcomes: Mutex<VecDeque<Result<AccessToken, GateError>>>,
    refresh_calls: AtomicUsize,
    refresh_delay: Mutex<Option<Duration>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_status(&self, status: StatusCode) {
        lock(&self.statuses).push_back(status);
    }

    pub fn push_refresh(&self, outcome: Result<AccessToken, GateError>) {
        lock(&self.refresh_outcomes).push_back(outcome);
    }

    /// Widens the race window so followers can pile up behind the lead.
    pub fn set_refresh_delay(&self, delay: Duration) {
        *lock(&self.refresh_delay) = Some(delay);
    }

    /// Every executed call, in send order, credential included.
    pub fn sent(&self) -> Vec<ApiRequest> {
        lock(&self.sent).clone()
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Transport for FakeTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, GateError> {
        lock(&self.sent).push(request);
        let status = lock(&self.statuses).pop_front().unwrap_or(StatusCode::OK);
        Ok(ApiResponse {
            status,
            body: json!({ "ok": status.is_success() }),
        })
    }

    async fn refresh(&self) -> Result<AccessToken, GateError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *lock(&self.refresh_delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        lock(&self.refresh_outcomes)
            .pop_front()
            .unwrap_or_else(|| Err(GateError::RefreshFailed("unscripted refresh".to_owned())))
    }
}
