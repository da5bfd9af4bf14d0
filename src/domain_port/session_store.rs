use crate::application_port::StoreError;
use crate::domain_model::{AccessToken, Profile, Role, Session};

/// Role-scoped persistent session storage. The two role slots are
/// independent; the legacy view is the unscoped token/profile pair from
/// the previous storage generation, kept only so restoration can migrate
/// it once.
///
/// Contract notes:
/// - `session` returns `Some` only when token and profile are both present.
/// - `clear` removes token and profile together; no reader may observe one
///   without the other.
/// - Reads of undecodable state yield `None`, not an error.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    async fn token(&self, role: Role) -> Result<Option<AccessToken>, StoreError>;
    async fn set_token(&self, role: Role, token: &AccessToken) -> Result<(), StoreError>;

    async fn profile(&self, role: Role) -> Result<Option<Profile>, StoreError>;
    async fn set_profile(&self, role: Role, profile: &Profile) -> Result<(), StoreError>;

    async fn session(&self, role: Role) -> Result<Option<Session>, StoreError>;
    async fn save_session(&self, role: Role, session: &Session) -> Result<(), StoreError>;

    async fn clear(&self, role: Role) -> Result<(), StoreError>;

    /// Forced-logout wipe: both role slots and the legacy pair, so the next
    /// boot starts from a clean restoration.
    async fn clear_all(&self) -> Result<(), StoreError>;

    async fn legacy_session(&self) -> Result<Option<Session>, StoreError>;
    async fn clear_legacy(&self) -> Result<(), StoreError>;
}
