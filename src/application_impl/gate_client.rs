use crate::application_impl::{Admission, RefreshCoordinator};
use crate::application_port::{ApiClient, GateError, PublicPaths};
use crate::domain_model::{AccessToken, ApiRequest, ApiResponse, Role};
use crate::domain_port::{LoginRedirector, SessionStore, Transport};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

/// The client every business call rides through, bound to one role.
///
/// Request gate in front of the transport decides the credential (attach,
/// go bare, or park on an in-flight refresh); response gate behind it
/// interprets the auth statuses and drives the retry-once protocol. A call
/// that enters the gate always leaves it: sent at least once, possibly
/// bare, never silently dropped.
pub struct GateClient {
    role: Role,
    transport: Arc<dyn Transport>,
    store: Arc<dyn SessionStore>,
    redirector: Arc<dyn LoginRedirector>,
    public_paths: PublicPaths,
    coordinator: RefreshCoordinator,
}

impl GateClient {
    pub fn new(
        role: Role,
        transport: Arc<dyn Transport>,
        store: Arc<dyn SessionStore>,
        redirector: Arc<dyn LoginRedirector>,
        public_paths: PublicPaths,
    ) -> Self {
        let coordinator = RefreshCoordinator::new(
            role,
            transport.clone(),
            store.clone(),
            redirector.clone(),
        );
        Self {
            role,
            transport,
            store,
            redirector,
            public_paths,
            coordinator,
        }
    }

    pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.coordinator = self.coordinator.with_refresh_timeout(timeout);
        self
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Request gate: decide the credential for one outgoing call.
    ///
    /// Public paths and missing tokens go bare. An expired token races for
    /// the refresh lead; the losers park until the lead drains the queue.
    /// Either way the call itself survives: a failed refresh sends it bare
    /// and lets the downstream auth response drive the logout.
    async fn outgoing_bearer(&self, path: &str) -> Result<Option<AccessToken>, GateError> {
        if self.public_paths.is_public(path) {
            return Ok(None);
        }
        let Some(token) = self.store.token(self.role).await? else {
            return Ok(None);
        };
        if !token.is_expired(Utc::now()) {
            return Ok(Some(token));
        }
        match self.coordinator.admit() {
            Admission::Lead => match self.coordinator.run_refresh().await {
                Ok(fresh) => Ok(Some(fresh)),
                Err(_) => Ok(None),
            },
            Admission::Follower(waiter) => match waiter.await {
                Ok(Ok(fresh)) => Ok(Some(fresh)),
                Ok(Err(_)) | Err(_) => Ok(None),
            },
        }
    }

    /// One refresh for the response gate's retry branch: lead it, or ride
    /// the one already in flight.
    async fn refreshed_token(&self) -> Result<AccessToken, GateError> {
        match self.coordinator.admit() {
            Admission::Lead => self.coordinator.run_refresh().await,
            Admission::Follower(waiter) => match waiter.await {
                Ok(outcome) => outcome,
                Err(_) => Err(GateError::RefreshFailed("refresh lead went away".to_owned())),
            },
        }
    }

    async fn send(
        &self,
        request: &ApiRequest,
        bearer: Option<AccessToken>,
    ) -> Result<ApiResponse, GateError> {
        self.transport
            .execute(request.clone().with_bearer(bearer))
            .await
    }

    /// Forced logout: full wipe (both role slots and the legacy pair) plus
    /// the hard navigation to the login surface.
    async fn force_logout(&self) {
        if let Err(e) = self.store.clear_all().await {
            tracing::error!("session wipe on forced logout: {e}");
        }
        self.redirector.redirect_to_login();
    }

    async fn reject_invalid(&self, public: bool) -> GateError {
        if !public {
            self.force_logout().await;
        }
        GateError::SessionInvalid
    }
}

#[async_trait::async_trait]
impl ApiClient for GateClient {
    async fn request(&self, request: ApiRequest) -> Result<ApiResponse, GateError> {
        let public = self.public_paths.is_public(&request.path);
        let bearer = self.outgoing_bearer(&request.path).await?;
        let first = self.send(&request, bearer).await?;

        if first.is_session_invalid() {
            return Err(self.reject_invalid(public).await);
        }

        // Retry-once: one refresh, one replay. Expiry on the replay is a
        // hard failure, never a second refresh. Public paths skip the
        // protocol entirely and hand the response back as-is.
        if first.is_session_expired() && !public {
            let fresh = self.refreshed_token().await?;
            let replay = self.send(&request, Some(fresh)).await?;
            if replay.is_session_invalid() {
                return Err(self.reject_invalid(public).await);
            }
            if replay.is_session_expired() {
                return Err(GateError::SessionExpired);
            }
            return Ok(replay);
        }

        Ok(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::{
        FakeRedirector, FakeSessionStore, FakeTransport, fake_session,
    };
    use crate::domain_model::{StatusCode, token_expiring_in};
    use futures_util::future::join_all;

    struct Harness {
        transport: Arc<FakeTransport>,
        store: Arc<FakeSessionStore>,
        redirector: Arc<FakeRedirector>,
        client: GateClient,
    }

    fn harness() -> Harness {
        let transport = Arc::new(FakeTransport::new());
        let store = Arc::new(FakeSessionStore::new());
        let redirector = Arc::new(FakeRedirector::new());
        let client = GateClient::new(
            Role::Operator,
            transport.clone(),
            store.clone(),
            redirector.clone(),
            PublicPaths::new(["/dynamic-forms"]),
        );
        Harness {
            transport,
            store,
            redirector,
            client,
        }
    }

    async fn seed_token(store: &FakeSessionStore, ttl_secs: i64) -> AccessToken {
        let mut session = fake_session("operator");
        session.access_token = token_expiring_in(ttl_secs);
        store.save_session(Role::Operator, &session).await.unwrap();
        session.access_token
    }

    #[tokio::test]
    async fn absent_token_goes_bare_and_passes_through() {
        let h = harness();

        let response = h.client.request(ApiRequest::get("/students")).await.unwrap();

        assert_eq!(response.status, StatusCode::OK);
        let sent = h.transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].bearer, None);
    }

    #[tokio::test]
    async fn valid_token_is_attached_verbatim() {
        let h = harness();
        let token = seed_token(&h.store, 3600).await;

        let response = h.client.request(ApiRequest::get("/students")).await.unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(h.transport.sent()[0].bearer, Some(token));
        assert_eq!(h.transport.refresh_calls(), 0);
    }

    #[tokio::test]
    async fn public_path_never_carries_a_credential() {
        let h = harness();
        seed_token(&h.store, 3600).await;

        h.client
            .request(ApiRequest::get("/api/dynamic-forms/7"))
            .await
            .unwrap();

        assert_eq!(h.transport.sent()[0].bearer, None);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_expired_calls_share_a_single_refresh() {
        let h = harness();
        seed_token(&h.store, -60).await;
        let fresh = token_expiring_in(3600);
        h.transport.set_refresh_delay(Duration::from_millis(20));
        h.transport.push_refresh(Ok(fresh.clone()));

        let calls = vec![
            h.client.request(ApiRequest::get("/students")),
            h.client.request(ApiRequest::get("/courses")),
            h.client.request(ApiRequest::get("/branches")),
        ];
        let outcomes = join_all(calls).await;

        for outcome in outcomes {
            assert_eq!(outcome.unwrap().status, StatusCode::OK);
        }
        assert_eq!(h.transport.refresh_calls(), 1);
        let sent = h.transport.sent();
        assert_eq!(sent.len(), 3);
        for request in sent {
            assert_eq!(request.bearer, Some(fresh.clone()));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failed_refresh_sends_every_queued_call_bare_and_redirects_once() {
        let h = harness();
        seed_token(&h.store, -60).await;
        h.transport.set_refresh_delay(Duration::from_millis(20));
        h.transport
            .push_refresh(Err(GateError::RefreshFailed("denied".to_owned())));

        let calls: Vec<_> = (0..5)
            .map(|i| h.client.request(ApiRequest::get(format!("/students/{i}"))))
            .collect();
        let outcomes = join_all(calls).await;

        // No call is dropped: all five go out, bare.
        let sent = h.transport.sent();
        assert_eq!(sent.len(), 5);
        for request in &sent {
            assert_eq!(request.bearer, None);
        }
        for outcome in outcomes {
            assert!(outcome.is_ok());
        }
        assert_eq!(h.transport.refresh_calls(), 1);
        assert_eq!(h.redirector.hits(), 1);
        assert_eq!(h.store.session(Role::Operator).await.unwrap(), None);
    }

    #[tokio::test]
    async fn expired_response_refreshes_and_replays_once() {
        let h = harness();
        seed_token(&h.store, 3600).await;
        let fresh = token_expiring_in(7200);
        h.transport.push_status(StatusCode::GONE);
        h.transport.push_refresh(Ok(fresh.clone()));

        let response = h.client.request(ApiRequest::get("/students")).await.unwrap();

        assert_eq!(response.status, StatusCode::OK);
        let sent = h.transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].bearer, Some(fresh));
        assert_eq!(h.transport.refresh_calls(), 1);
    }

    #[tokio::test]
    async fn second_expiry_on_the_replay_is_a_hard_failure() {
        let h = harness();
        seed_token(&h.store, 3600).await;
        h.transport.push_status(StatusCode::GONE);
        h.transport.push_status(StatusCode::GONE);
        h.transport.push_refresh(Ok(token_expiring_in(7200)));

        let outcome = h.client.request(ApiRequest::get("/students")).await;

        assert_eq!(outcome, Err(GateError::SessionExpired));
        assert_eq!(h.transport.refresh_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_responses_under_way_share_the_refresh_in_flight() {
        let h = harness();
        seed_token(&h.store, 3600).await;
        let fresh = token_expiring_in(7200);
        h.transport.push_status(StatusCode::GONE);
        h.transport.push_status(StatusCode::GONE);
        h.transport.set_refresh_delay(Duration::from_millis(20));
        h.transport.push_refresh(Ok(fresh.clone()));

        let outcomes = join_all(vec![
            h.client.request(ApiRequest::get("/students")),
            h.client.request(ApiRequest::get("/courses")),
        ])
        .await;

        for outcome in outcomes {
            assert_eq!(outcome.unwrap().status, StatusCode::OK);
        }
        assert_eq!(h.transport.refresh_calls(), 1);
        let sent = h.transport.sent();
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[2].bearer, Some(fresh.clone()));
        assert_eq!(sent[3].bearer, Some(fresh));
    }

    #[tokio::test]
    async fn invalid_response_forces_logout_on_protected_paths() {
        let h = harness();
        seed_token(&h.store, 3600).await;
        h.transport.push_status(StatusCode::UNAUTHORIZED);

        let outcome = h.client.request(ApiRequest::get("/students")).await;

        assert_eq!(outcome, Err(GateError::SessionInvalid));
        assert_eq!(h.redirector.hits(), 1);
        assert_eq!(h.store.session(Role::Operator).await.unwrap(), None);
    }

    #[tokio::test]
    async fn invalid_response_on_a_public_path_leaves_the_session_alone() {
        let h = harness();
        seed_token(&h.store, 3600).await;
        h.transport.push_status(StatusCode::FORBIDDEN);

        let outcome = h
            .client
            .request(ApiRequest::get("/api/dynamic-forms/7"))
            .await;

        assert_eq!(outcome, Err(GateError::SessionInvalid));
        assert_eq!(h.redirector.hits(), 0);
        assert!(h.store.session(Role::Operator).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn expired_response_on_a_public_path_passes_through() {
        let h = harness();
        h.transport.push_status(StatusCode::GONE);

        let response = h
            .client
            .request(ApiRequest::get("/api/dynamic-forms/7"))
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::GONE);
        assert_eq!(h.transport.refresh_calls(), 0);
        assert_eq!(h.redirector.hits(), 0);
    }

    #[tokio::test]
    async fn server_errors_are_not_an_auth_signal() {
        let h = harness();
        seed_token(&h.store, 3600).await;
        h.transport.push_status(StatusCode::INTERNAL_SERVER_ERROR);

        let response = h.client.request(ApiRequest::get("/students")).await.unwrap();

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(h.transport.refresh_calls(), 0);
        assert_eq!(h.redirector.hits(), 0);
        assert!(h.store.session(Role::Operator).await.unwrap().is_some());
    }
}
