//! Logged-in identity
//!
//! The identity (bearer token plus a minimal user summary) lives for the whole
//! visit. It is created by a login or by the last step of a registration flow,
//! destroyed by logout, and persisted so it survives restarts. Only one identity
//! is active at a time: `login` replaces the previous one entirely.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, AppResult};
use crate::models::{LoginResponse, RegisterResponse, Role};
use crate::registration::{CreatorDraft, VenueDraft};

/// Minimal user summary kept with the token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub avatar_id: Option<i64>,
}

/// Bearer credential and user summary of the logged-in user
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedIdentity {
    pub token: String,
    pub user: UserSummary,
}

impl fmt::Debug for AuthenticatedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedIdentity")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl AuthenticatedIdentity {
    /// Identity from a login response.
    ///
    /// Avatar: creator photo, then creator `photo_id`, then venue logo.
    /// Name: creator name, then venue name.
    pub fn from_login(response: &LoginResponse) -> Self {
        let user = &response.user;
        let creator = user.creator.as_ref();
        let venue = user.venue.as_ref();

        let avatar_id = creator
            .and_then(|c| c.photo.as_ref().map(|p| p.id).or(c.photo_id))
            .or_else(|| venue.and_then(|v| v.logo.as_ref().map(|l| l.id).or(v.logo_id)))
            .or(user.avatar_id);

        let name = creator
            .and_then(|c| non_empty(&c.name))
            .or_else(|| venue.and_then(|v| non_empty(&v.name)));

        Self {
            token: response.token.clone(),
            user: UserSummary {
                id: user.id,
                email: user.email.clone(),
                role: user.role.clone(),
                name,
                avatar: user.avatar.clone(),
                avatar_id,
            },
        }
    }

    /// Identity from a registration response, when the flow logs in right away.
    pub fn from_registration(response: &RegisterResponse, name: &str) -> Self {
        let venue = response.user.venue.as_ref();
        Self {
            token: response.token.clone(),
            user: UserSummary {
                id: response.user.id,
                email: response.user.email.clone(),
                role: response.user.role.clone(),
                name: non_empty(name).or_else(|| venue.and_then(|v| non_empty(&v.name))),
                avatar: response.user.avatar.clone(),
                avatar_id: venue
                    .and_then(|v| v.logo.as_ref().map(|l| l.id).or(v.logo_id))
                    .or(response.user.avatar_id),
            },
        }
    }

    /// Identity built from a completed creator draft. All fields are copied.
    pub fn from_creator_draft(draft: &CreatorDraft) -> AppResult<Self> {
        let credentials = draft.credentials()?;
        Ok(Self {
            token: credentials.token,
            user: UserSummary {
                id: credentials.user_id,
                email: draft.email.clone(),
                role: Role::Creator,
                name: non_empty(&draft.name),
                avatar: None,
                avatar_id: draft.photo.remote_id,
            },
        })
    }

    /// Identity built from a completed venue draft. All fields are copied.
    pub fn from_venue_draft(draft: &VenueDraft) -> AppResult<Self> {
        let credentials = draft.credentials()?;
        Ok(Self {
            token: credentials.token,
            user: UserSummary {
                id: credentials.user_id,
                email: draft.email.clone(),
                role: Role::Venue,
                name: non_empty(&draft.name),
                avatar: None,
                avatar_id: draft.logo.remote_id,
            },
        })
    }
}

/// Durable storage of the identity across restarts
#[async_trait]
pub trait IdentityStorage: Send + Sync {
    /// Read the persisted identity. `Ok(None)` means logged out.
    async fn load(&self) -> AppResult<Option<AuthenticatedIdentity>>;

    /// Persist `identity`, replacing whatever was stored.
    async fn save(&self, identity: &AuthenticatedIdentity) -> AppResult<()>;

    /// Remove the persisted identity. Clearing an empty storage succeeds.
    async fn clear(&self) -> AppResult<()>;
}

/// JSON file storage
#[derive(Debug, Clone)]
pub struct FileIdentityStorage {
    path: PathBuf,
}

impl FileIdentityStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl IdentityStorage for FileIdentityStorage {
    async fn load(&self) -> AppResult<Option<AuthenticatedIdentity>> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        match serde_json::from_slice::<AuthenticatedIdentity>(&raw) {
            Ok(identity) => Ok(Some(identity)),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Ignoring unreadable identity file"
                );
                Ok(None)
            }
        }
    }

    async fn save(&self, identity: &AuthenticatedIdentity) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Storage(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let body = serde_json::to_vec_pretty(identity)?;
        let mut file = fs::File::create(&self.path).await.map_err(|e| {
            AppError::Storage(format!("Failed to create {}: {}", self.path.display(), e))
        })?;
        file.write_all(&body).await.map_err(|e| {
            AppError::Storage(format!("Failed to write {}: {}", self.path.display(), e))
        })?;
        file.sync_all().await?;
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

/// In-memory storage; clones share the same slot
#[derive(Debug, Clone, Default)]
pub struct MemoryIdentityStorage {
    slot: Arc<Mutex<Option<AuthenticatedIdentity>>>,
}

impl MemoryIdentityStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// What is currently persisted.
    pub fn stored(&self) -> Option<AuthenticatedIdentity> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl IdentityStorage for MemoryIdentityStorage {
    async fn load(&self) -> AppResult<Option<AuthenticatedIdentity>> {
        Ok(self.stored())
    }

    async fn save(&self, identity: &AuthenticatedIdentity) -> AppResult<()> {
        *self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(identity.clone());
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        *self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        Ok(())
    }
}

/// The active identity plus its durable copy
#[derive(Debug)]
pub struct IdentityStore<S: IdentityStorage> {
    storage: S,
    current: Option<AuthenticatedIdentity>,
}

impl<S: IdentityStorage> IdentityStore<S> {
    /// Read the persisted identity once and keep it in memory.
    pub async fn hydrate(storage: S) -> AppResult<Self> {
        let current = storage.load().await?;
        if let Some(identity) = &current {
            tracing::debug!(user_id = identity.user.id, role = %identity.user.role, "Identity restored");
        }
        Ok(Self { storage, current })
    }

    pub fn current(&self) -> Option<&AuthenticatedIdentity> {
        self.current.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|i| i.token.as_str())
    }

    pub fn user(&self) -> Option<&UserSummary> {
        self.current.as_ref().map(|i| &i.user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|i| !i.token.is_empty())
    }

    /// Replace the active identity and persist it.
    ///
    /// The in-memory identity is replaced even if persisting fails; the error
    /// reports that it will not survive a restart.
    pub async fn login(&mut self, identity: AuthenticatedIdentity) -> AppResult<()> {
        tracing::info!(user_id = identity.user.id, role = %identity.user.role, "Logged in");
        self.current = Some(identity);
        match &self.current {
            Some(identity) => self.storage.save(identity).await,
            None => Ok(()),
        }
    }

    /// Forget the active identity in memory and in storage.
    pub async fn logout(&mut self) -> AppResult<()> {
        if let Some(identity) = self.current.take() {
            tracing::info!(user_id = identity.user.id, "Logged out");
        }
        self.storage.clear().await
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::{CreatorPatch, Draft, Password, RegistrationStore, VenuePatch};
    use tempfile::tempdir;

    fn identity(id: i64, token: &str) -> AuthenticatedIdentity {
        AuthenticatedIdentity {
            token: token.to_string(),
            user: UserSummary {
                id,
                email: format!("user{}@x.com", id),
                role: Role::Creator,
                name: Some(format!("User {}", id)),
                avatar: None,
                avatar_id: None,
            },
        }
    }

    #[tokio::test]
    async fn file_storage_round_trip_and_clear() {
        let dir = tempdir().unwrap();
        let storage = FileIdentityStorage::new(dir.path().join("nested/identity.json"));

        assert!(storage.load().await.unwrap().is_none());

        let saved = identity(1, "tok-1");
        storage.save(&saved).await.unwrap();
        assert_eq!(storage.load().await.unwrap(), Some(saved));

        storage.clear().await.unwrap();
        assert!(storage.load().await.unwrap().is_none());
        storage.clear().await.unwrap();
    }

    #[tokio::test]
    async fn corrupt_identity_file_reads_as_logged_out() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("identity.json");
        std::fs::write(&path, b"{not json").unwrap();

        let store = IdentityStore::hydrate(FileIdentityStorage::new(&path))
            .await
            .unwrap();
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn hydrate_restores_persisted_identity() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("identity.json");

        let mut store = IdentityStore::hydrate(FileIdentityStorage::new(&path))
            .await
            .unwrap();
        store.login(identity(3, "tok-3")).await.unwrap();

        let restored = IdentityStore::hydrate(FileIdentityStorage::new(&path))
            .await
            .unwrap();
        assert!(restored.is_authenticated());
        assert_eq!(restored.token(), Some("tok-3"));
        assert_eq!(restored.user().unwrap().id, 3);
    }

    #[tokio::test]
    async fn login_replaces_previous_identity_entirely() {
        let storage = MemoryIdentityStorage::new();
        let mut store = IdentityStore::hydrate(storage.clone()).await.unwrap();

        let mut first = identity(1, "tok-1");
        first.user.avatar_id = Some(42);
        store.login(first).await.unwrap();

        let second = identity(2, "tok-2");
        store.login(second.clone()).await.unwrap();

        assert_eq!(store.current(), Some(&second));
        assert_eq!(store.user().unwrap().avatar_id, None);
        assert_eq!(storage.stored(), Some(second));
    }

    #[tokio::test]
    async fn logout_clears_memory_and_storage() {
        let storage = MemoryIdentityStorage::new();
        let mut store = IdentityStore::hydrate(storage.clone()).await.unwrap();
        store.login(identity(1, "tok-1")).await.unwrap();

        store.logout().await.unwrap();
        assert!(!store.is_authenticated());
        assert!(store.token().is_none());
        assert!(storage.stored().is_none());
    }

    #[test]
    fn from_login_prefers_creator_photo_then_venue_logo() {
        let creator: LoginResponse = serde_json::from_str(
            r#"{"token":"t","user":{"id":1,"email":"a@x.com","role":"creator",
                "creator":{"id":2,"name":"Alice","photo_id":5}}}"#,
        )
        .unwrap();
        let identity = AuthenticatedIdentity::from_login(&creator);
        assert_eq!(identity.user.avatar_id, Some(5));
        assert_eq!(identity.user.name.as_deref(), Some("Alice"));

        let venue: LoginResponse = serde_json::from_str(
            r#"{"token":"t","user":{"id":1,"email":"v@x.com","role":"venue",
                "venue":{"id":3,"name":"Cafe","logo":{"id":8,"file_path":"l.png"}}}}"#,
        )
        .unwrap();
        let identity = AuthenticatedIdentity::from_login(&venue);
        assert_eq!(identity.user.avatar_id, Some(8));
        assert_eq!(identity.user.name.as_deref(), Some("Cafe"));
        assert_eq!(identity.user.role, Role::Venue);
    }

    #[test]
    fn from_registration_uses_given_name_then_venue() {
        let creator: RegisterResponse = serde_json::from_str(
            r#"{"token":"r","user":{"id":4,"email":"a@x.com","role":"creator","avatar_id":6}}"#,
        )
        .unwrap();
        let identity = AuthenticatedIdentity::from_registration(&creator, " Alice ");
        assert_eq!(identity.token, "r");
        assert_eq!(identity.user.name.as_deref(), Some("Alice"));
        assert_eq!(identity.user.avatar_id, Some(6));

        let venue: RegisterResponse = serde_json::from_str(
            r#"{"token":"r","user":{"id":5,"email":"v@x.com","role":"venue",
                "venue":{"id":3,"name":"Cafe","logo_id":9}}}"#,
        )
        .unwrap();
        let identity = AuthenticatedIdentity::from_registration(&venue, "");
        assert_eq!(identity.user.name.as_deref(), Some("Cafe"));
        assert_eq!(identity.user.avatar_id, Some(9));
        assert_eq!(identity.user.role, Role::Venue);
    }

    #[test]
    fn identity_from_draft_survives_reset() {
        let mut store: RegistrationStore<CreatorDraft> = RegistrationStore::new();
        store.merge(CreatorPatch {
            token: Some(Some("tok".to_string())),
            user_id: Some(Some(11)),
            name: Some("Alice".to_string()),
            email: Some("a@x.com".to_string()),
            password: Some(Password::from("secret1")),
            photo_id: Some(Some(5)),
            ..Default::default()
        });

        let identity = AuthenticatedIdentity::from_creator_draft(store.read()).unwrap();
        store.reset();
        store.merge(CreatorPatch {
            name: Some("Mallory".to_string()),
            ..Default::default()
        });

        assert_eq!(store.read().token, None);
        assert_eq!(identity.token, "tok");
        assert_eq!(identity.user.id, 11);
        assert_eq!(identity.user.name.as_deref(), Some("Alice"));
        assert_eq!(identity.user.email, "a@x.com");
        assert_eq!(identity.user.avatar_id, Some(5));
        assert!(!serde_json::to_string(&identity).unwrap().contains("secret1"));
    }

    #[test]
    fn identity_from_incomplete_draft_is_missing_credentials() {
        let draft = VenueDraft::initial();
        assert!(matches!(
            AuthenticatedIdentity::from_venue_draft(&draft),
            Err(AppError::MissingCredentials(_))
        ));

        let mut store: RegistrationStore<VenueDraft> = RegistrationStore::new();
        store.merge(VenuePatch {
            token: Some(Some("tok".to_string())),
            user_id: Some(Some(4)),
            name: Some("Cafe".to_string()),
            logo_id: Some(Some(9)),
            ..Default::default()
        });
        let identity = AuthenticatedIdentity::from_venue_draft(store.read()).unwrap();
        assert_eq!(identity.user.role, Role::Venue);
        assert_eq!(identity.user.avatar_id, Some(9));
    }

    #[test]
    fn debug_output_redacts_token() {
        let out = format!("{:?}", identity(1, "very-secret-token"));
        assert!(!out.contains("very-secret-token"));
    }
}
