use crate::application_port::StoreError;
use crate::domain_model::{Role, Session};
use crate::domain_port::SessionStore;

/// What startup reconciliation settled on.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoredSession {
    pub role: Role,
    pub session: Session,
}

/// Runs once at boot, before any business call.
///
/// Precedence: operator slot, then super-operator slot, then the legacy
/// unscoped pair. A legacy pair is migrated into the slot inferred from its
/// profile's role label and then deleted, so a second run (a double-mount)
/// sees only role slots and lands on the same state. Slots that no longer
/// decode read as absent, so a broken blob degrades to an unauthenticated
/// start instead of a crash.
pub async fn restore_session(
    store: &dyn SessionStore,
) -> Result<Option<RestoredSession>, StoreError> {
    for role in [Role::Operator, Role::SuperOperator] {
        if let Some(session) = store.session(role).await? {
            tracing::debug!("restored [{role}] session from its slot");
            return Ok(Some(RestoredSession { role, session }));
        }
    }

    let Some(legacy) = store.legacy_session().await? else {
        return Ok(None);
    };
    let role = legacy.inferred_role();
    store.save_session(role, &legacy).await?;
    store.clear_legacy().await?;
    tracing::info!("migrated legacy session into the [{role}] slot");
    Ok(Some(RestoredSession {
        role,
        session: legacy,
    }))
}
