use super::{AccessToken, Role};
use serde::{Deserialize, Serialize};

/// Last-known identity of the logged-in user, as the backend reported it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: uuid::Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// One role's session. Persisted all-or-nothing: a token without a profile
/// (or the reverse) is never written, and reads treat such a pair as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: AccessToken,
    pub profile: Profile,
}

impl Session {
    pub fn new(access_token: AccessToken, profile: Profile) -> Self {
        Self {
            access_token,
            profile,
        }
    }

    /// The slot a legacy unscoped session belongs to, inferred from the
    /// profile's role label.
    pub fn inferred_role(&self) -> Role {
        Role::from_legacy_label(&self.profile.role)
    }
}
