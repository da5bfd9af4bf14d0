use crate::application_port::GateError;
use crate::domain_model::{AccessToken, Role};
use crate::domain_port::{LoginRedirector, SessionStore, Transport};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::oneshot;

pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(30);

type WaiterOutcome = Result<AccessToken, GateError>;

/// Outcome of asking for a refresh. The caller that finds the flag down
/// wins the lead and must run the network call; everyone else parks on a
/// waiter until the lead drains the queue.
pub enum Admission {
    Lead,
    Follower(oneshot::Receiver<WaiterOutcome>),
}

struct FlightState {
    in_flight: bool,
    waiters: VecDeque<oneshot::Sender<WaiterOutcome>>,
}

/// Single-flight refresh for one role slot.
///
/// At most one refresh network call is outstanding at any instant. The
/// waiter queue is drained FIFO, completely and exactly once per attempt,
/// and the flag is released only after the drain, so an admit that lands
/// mid-drain belongs to the next cycle. A hung refresh is bounded by
/// `refresh_timeout` and force-rejects the queue.
///
/// Refresh failure is fatal for the session: persisted state is wiped (both
/// role slots and the legacy pair) and the login redirect fires exactly
/// once, regardless of how many callers were parked.
pub struct RefreshCoordinator {
    role: Role,
    transport: Arc<dyn Transport>,
    store: Arc<dyn SessionStore>,
    redirector: Arc<dyn LoginRedirector>,
    state: Mutex<FlightState>,
    refresh_timeout: Duration,
}

impl RefreshCoordinator {
    pub fn new(
        role: Role,
        transport: Arc<dyn Transport>,
        store: Arc<dyn SessionStore>,
        redirector: Arc<dyn LoginRedirector>,
    ) -> Self {
        Self {
            role,
            transport,
            store,
            redirector,
            state: Mutex::new(FlightState {
                in_flight: false,
                waiters: VecDeque::new(),
            }),
            refresh_timeout: DEFAULT_REFRESH_TIMEOUT,
        }
    }

    pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = timeout;
        self
    }

    fn state(&self) -> MutexGuard<'_, FlightState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Race for the lead. A `Lead` admission obliges the caller to invoke
    /// `run_refresh`; a `Follower` must await its receiver instead.
    pub fn admit(&self) -> Admission {
        let mut state = self.state();
        if state.in_flight {
            let (tx, rx) = oneshot::channel();
            state.waiters.push_back(tx);
            Admission::Follower(rx)
        } else {
            state.in_flight = true;
            Admission::Lead
        }
    }

    /// Lead-only: perform the refresh call, settle persistence and side
    /// effects, then drain the queue.
    pub async fn run_refresh(&self) -> WaiterOutcome {
        let call = tokio::time::timeout(self.refresh_timeout, self.transport.refresh());
        let outcome = match call.await {
            Ok(Ok(token)) => match self.store.set_token(self.role, &token).await {
                Ok(()) => {
                    tracing::debug!("access token refreshed for [{}]", self.role);
                    Ok(token)
                }
                Err(e) => Err(GateError::from(e)),
            },
            Ok(Err(e)) => Err(e),
            Err(_) => Err(GateError::RefreshFailed(format!(
                "refresh call exceeded {:?}",
                self.refresh_timeout
            ))),
        };

        if let Err(error) = &outcome {
            tracing::warn!("token refresh failed for [{}]: {error}", self.role);
            if let Err(e) = self.store.clear_all().await {
                tracing::error!("session wipe after failed refresh: {e}");
            }
            self.redirector.redirect_to_login();
        }

        self.drain(&outcome);
        outcome
    }

    /// Drains every parked waiter FIFO with the attempt's outcome, then
    /// lowers the flag. Both happen under the one lock, so no new lead can
    /// be admitted while the drain is in progress and no waiter is ever
    /// left pending.
    fn drain(&self, outcome: &WaiterOutcome) {
        let mut state = self.state();
        while let Some(waiter) = state.waiters.pop_front() {
            // A follower that went away cannot wedge the drain.
            let _ = waiter.send(outcome.clone());
        }
        state.in_flight = false;
    }
}
