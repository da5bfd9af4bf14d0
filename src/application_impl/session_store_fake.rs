use crate::application_port::StoreError;
use crate::domain_model::{AccessToken, Profile, Role, Session};
use crate::domain_port::SessionStore;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default, Clone)]
struct Slot {
    token: Option<AccessToken>,
    profile: Option<Profile>,
}

impl Slot {
    fn session(&self) -> Option<Session> {
        Some(Session::new(self.token.clone()?, self.profile.clone()?))
    }

    fn put(&mut self, session: &Session) {
        self.token = Some(session.access_token.clone());
        self.profile = Some(session.profile.clone());
    }
}

#[derive(Debug, Default)]
struct Slots {
    operator: Slot,
    super_operator: Slot,
    legacy: Slot,
}

/// In-memory store mirroring the persisted layout. All slots live under one
/// lock, so `clear` and `clear_all` are atomic as observed by readers.
#[derive(Debug, Default)]
pub struct FakeSessionStore {
    slots: Mutex<Slots>,
}

impl FakeSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_legacy(&self, session: &Session) {
        self.slots().legacy.put(session);
    }

    fn slots(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn slot_mut(slots: &mut Slots, role: Role) -> &mut Slot {
    match role {
        Role::Operator => &mut slots.operator,
        Role::SuperOperator => &mut slots.super_operator,
    }
}

#[async_trait::async_trait]
impl SessionStore for FakeSessionStore {
    async fn token(&self, role: Role) -> Result<Option<AccessToken>, StoreError> {
        Ok(slot_mut(&mut self.slots(), role).token.clone())
    }

    async fn set_token(&self, role: Role, token: &AccessToken) -> Result<(), StoreError> {
        slot_mut(&mut self.slots(), role).token = Some(token.clone());
        Ok(())
    }

    async fn profile(&self, role: Role) -> Result<Option<Profile>, StoreError> {
        Ok(slot_mut(&mut self.slots(), role).profile.clone())
    }

    async fn set_profile(&self, role: Role, profile: &Profile) -> Result<(), StoreError> {
        slot_mut(&mut self.slots(), role).profile = Some(profile.clone());
        Ok(())
    }

    async fn session(&self, role: Role) -> Result<Option<Session>, StoreError> {
        Ok(slot_mut(&mut self.slots(), role).session())
    }

    async fn save_session(&self, role: Role, session: &Session) -> Result<(), StoreError> {
        slot_mut(&mut self.slots(), role).put(session);
        Ok(())
    }

    async fn clear(&self, role: Role) -> Result<(), StoreError> {
        *slot_mut(&mut self.slots(), role) = Slot::default();
        Ok(())
    }

    async fn clear_all(&self) -> Result<(), StoreError> {
        *self.slots() = Slots::default();
        Ok(())
    }

    async fn legacy_session(&self) -> Result<Option<Session>, StoreError> {
        Ok(self.slots().legacy.session())
    }

    async fn clear_legacy(&self) -> Result<(), StoreError> {
        self.slots().legacy = Slot::default();
        Ok(())
    }
}

/// Deterministic session for exercising the store and the gates.
pub fn fake_session(role_label: &str) -> Session {
    let email = format!("{role_label}@example.test");
    Session::new(
        AccessToken(format!("fake-access-token:{role_label}")),
        Profile {
            id: uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_OID, email.as_bytes()),
            name: role_label.to_owned(),
            email,
            role: role_label.to_owned(),
        },
    )
}
