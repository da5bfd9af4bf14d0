use thiserror::Error;

/// Auth-class outcomes of the gated client. `Clone` because a refresh
/// failure is fanned out to every parked waiter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GateError {
    #[error("session invalid: credential rejected")]
    SessionInvalid,
    #[error("session expired")]
    SessionExpired,
    #[error("refresh failed: {0}")]
    RefreshFailed(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("store error: {0}")]
    Store(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// Persisted state that no longer decodes. Read paths treat this as
    /// absence; it must never crash restoration.
    #[error("malformed persisted state: {0}")]
    Malformed(String),
    #[error("storage io: {0}")]
    Io(String),
}

impl From<StoreError> for GateError {
    fn from(error: StoreError) -> Self {
        GateError::Store(error.to_string())
    }
}
