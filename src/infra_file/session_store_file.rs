use crate::application_port::StoreError;
use crate::domain_model::{AccessToken, Profile, Role, Session};
use crate::domain_port::SessionStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

const SCHEMA_VERSION: u32 = 2;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
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

/// Current persisted layout: one slot per role plus the legacy pair, under
/// an explicit schema-version tag so future migrations never have to sniff
/// shapes again.
#[derive(Debug, Serialize, Deserialize)]
struct Document {
    version: u32,
    operator: Slot,
    super_operator: Slot,
    legacy: Slot,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            operator: Slot::default(),
            super_operator: Slot::default(),
            legacy: Slot::default(),
        }
    }
}

/// The previous storage generation: a single unscoped token/profile pair,
/// no version tag. Decoded once at load and surfaced as the legacy view.
#[derive(Debug, Deserialize)]
struct DocumentV1 {
    token: Option<AccessToken>,
    profile: Option<Profile>,
}

/// JSON-file session store, the persistent-key/value analogue of browser
/// storage. The whole document mutates under one lock and is rewritten per
/// mutation, so `clear` and `clear_all` are atomic as observed by readers.
pub struct FileSessionStore {
    path: PathBuf,
    document: Mutex<Document>,
}

impl FileSessionStore {
    /// Loads the document at `path`, migrating a v1 blob into the legacy
    /// slot. Undecodable content is discarded as absent, never an error.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let document = load_document(&path);
        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    fn document(&self) -> MutexGuard<'_, Document> {
        self.document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, document: &Document) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(document)
            .map_err(|e| StoreError::Io(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| StoreError::Io(e.to_string()))
    }

    fn mutate(&self, apply: impl FnOnce(&mut Document)) -> Result<(), StoreError> {
        let mut document = self.document();
        apply(&mut document);
        self.persist(&document)
    }
}

fn load_document(path: &Path) -> Document {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => return Document::default(),
    };
    if let Ok(document) = serde_json::from_str::<Document>(&raw) {
        return document;
    }
    if let Ok(v1) = serde_json::from_str::<DocumentV1>(&raw) {
        tracing::info!("found a v1 session blob at {path:?}, keeping it as the legacy view");
        return Document {
            legacy: Slot {
                token: v1.token,
                profile: v1.profile,
            },
            ..Document::default()
        };
    }
    tracing::warn!("discarding undecodable session blob at {path:?}");
    Document::default()
}

fn slot_mut(document: &mut Document, role: Role) -> &mut Slot {
    match role {
        Role::Operator => &mut document.operator,
        Role::SuperOperator => &mut document.super_operator,
    }
}

fn slot(document: &Document, role: Role) -> &Slot {
    match role {
        Role::Operator => &document.operator,
        Role::SuperOperator => &document.super_operator,
    }
}

#[async_trait::async_trait]
impl SessionStore for FileSessionStore {
    async fn token(&self, role: Role) -> Result<Option<AccessToken>, StoreError> {
        Ok(slot(&self.document(), role).token.clone())
    }

    async fn set_token(&self, role: Role, token: &AccessToken) -> Result<(), StoreError> {
        self.mutate(|doc| slot_mut(doc, role).token = Some(token.clone()))
    }

    async fn profile(&self, role: Role) -> Result<Option<Profile>, StoreError> {
        Ok(slot(&self.document(), role).profile.clone())
    }

    async fn set_profile(&self, role: Role, profile: &Profile) -> Result<(), StoreError> {
        self.mutate(|doc| slot_mut(doc, role).profile = Some(profile.clone()))
    }

    async fn session(&self, role: Role) -> Result<Option<Session>, StoreError> {
        Ok(slot(&self.document(), role).session())
    }

    async fn save_session(&self, role: Role, session: &Session) -> Result<(), StoreError> {
        self.mutate(|doc| slot_mut(doc, role).put(session))
    }

    async fn clear(&self, role: Role) -> Result<(), StoreError> {
        self.mutate(|doc| *slot_mut(doc, role) = Slot::default())
    }

    async fn clear_all(&self) -> Result<(), StoreError> {
        self.mutate(|doc| *doc = Document::default())
    }

    async fn legacy_session(&self) -> Result<Option<Session>, StoreError> {
        Ok(self.document().legacy.session())
    }

    async fn clear_legacy(&self) -> Result<(), StoreError> {
        self.mutate(|doc| doc.legacy = Slot::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::fake_session;
    use serde_json::json;

    fn store_at(dir: &tempfile::TempDir) -> FileSessionStore {
        FileSessionStore::new(dir.path().join("session.json")).unwrap()
    }

    #[tokio::test]
    async fn sessions_survive_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let session = fake_session("operator");

        let store = store_at(&dir);
        store.save_session(Role::Operator, &session).await.unwrap();
        drop(store);

        let reopened = store_at(&dir);
        assert_eq!(
            reopened.session(Role::Operator).await.unwrap(),
            Some(session)
        );
        assert_eq!(reopened.session(Role::SuperOperator).await.unwrap(), None);
    }

    #[tokio::test]
    async fn role_slots_do_not_leak_into_each_other() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(&dir);
        let operator = fake_session("operator");
        let super_operator = fake_session("super-operator");

        store.save_session(Role::Operator, &operator).await.unwrap();
        store
            .save_session(Role::SuperOperator, &super_operator)
            .await
            .unwrap();
        store.clear(Role::Operator).await.unwrap();

        assert_eq!(store.session(Role::Operator).await.unwrap(), None);
        assert_eq!(store.token(Role::Operator).await.unwrap(), None);
        assert_eq!(store.profile(Role::Operator).await.unwrap(), None);
        assert_eq!(
            store.session(Role::SuperOperator).await.unwrap(),
            Some(super_operator)
        );
    }

    #[tokio::test]
    async fn v1_blob_is_exposed_as_the_legacy_view() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let session = fake_session("superadmin");
        std::fs::write(
            &path,
            json!({
                "token": session.access_token,
                "profile": session.profile,
            })
            .to_string(),
        )
        .unwrap();

        let store = FileSessionStore::new(&path).unwrap();
        assert_eq!(store.legacy_session().await.unwrap(), Some(session));
        assert_eq!(store.session(Role::Operator).await.unwrap(), None);
        assert_eq!(store.session(Role::SuperOperator).await.unwrap(), None);
    }

    #[tokio::test]
    async fn undecodable_blob_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json at all").unwrap();

        let store = FileSessionStore::new(&path).unwrap();
        assert_eq!(store.session(Role::Operator).await.unwrap(), None);
        assert_eq!(store.legacy_session().await.unwrap(), None);
    }

    #[tokio::test]
    async fn partial_pair_is_not_a_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(&dir);

        store
            .set_token(Role::Operator, &AccessToken("t".to_owned()))
            .await
            .unwrap();

        assert!(store.token(Role::Operator).await.unwrap().is_some());
        assert_eq!(store.session(Role::Operator).await.unwrap(), None);
    }

    #[tokio::test]
    async fn wipe_clears_every_slot_and_writes_the_version_tag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileSessionStore::new(&path).unwrap();
        store
            .save_session(Role::Operator, &fake_session("operator"))
            .await
            .unwrap();
        store.seed_legacy_for_test(&fake_session("operator")).await;

        store.clear_all().await.unwrap();

        assert_eq!(store.session(Role::Operator).await.unwrap(), None);
        assert_eq!(store.legacy_session().await.unwrap(), None);
        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], json!(SCHEMA_VERSION));
    }

    impl FileSessionStore {
        async fn seed_legacy_for_test(&self, session: &Session) {
            self.mutate(|doc| doc.legacy.put(session)).unwrap();
        }
    }
}
