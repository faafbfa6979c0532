//! Registration session store
//!
//! A registration wizard is a sequence of independent steps (role choice, profile
//! details, contacts and social links, success) that do not share state except
//! through the draft held here. The store is a plain in-memory record:
//!
//! - `read` never fails; absent fields are empty or `None`.
//! - `merge` overwrites only the keys present in the patch. Last merge wins.
//! - `reset` restores the initial draft exactly.
//!
//! Creator and venue flows use distinct draft types, so one flow's store can
//! never observe the other's merges. The store performs no I/O and does not own
//! preview handles; callers release those before `reset`.

/// Overwrite each listed field of `$target` whose patch value is `Some`.
macro_rules! overwrite_fields {
    ($target:expr, $patch:expr, [$($field:ident),* $(,)?]) => {
        $(
            if let Some(value) = $patch.$field {
                $target.$field = value;
            }
        )*
    };
}

mod creator;
mod venue;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::preview::PreviewUrl;

pub use creator::{CreatorDraft, CreatorPatch};
pub use venue::{VenueDraft, VenuePatch, EVENT_FORMATS};

/// City preselected on the profile step.
pub const DEFAULT_CITY: &str = "Москва";

/// A draft record accumulated across wizard steps.
pub trait Draft: Clone + fmt::Debug + PartialEq {
    /// Partial update; every field is optional.
    type Patch: Default;

    /// Name of the flow, used in log fields.
    const FLOW: &'static str;

    /// The documented initial draft.
    fn initial() -> Self;

    /// Shallow overwrite of the keys present in `patch`.
    fn apply(&mut self, patch: Self::Patch);
}

/// In-memory store for one wizard traversal.
#[derive(Debug, Clone)]
pub struct RegistrationStore<D: Draft> {
    draft: D,
    merges: u64,
}

impl<D: Draft> Default for RegistrationStore<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Draft> RegistrationStore<D> {
    pub fn new() -> Self {
        Self {
            draft: D::initial(),
            merges: 0,
        }
    }

    /// Current draft.
    pub fn read(&self) -> &D {
        &self.draft
    }

    /// Owned copy of the current draft.
    pub fn snapshot(&self) -> D {
        self.draft.clone()
    }

    pub fn merge(&mut self, patch: D::Patch) {
        self.draft.apply(patch);
        self.merges += 1;
        tracing::trace!(flow = D::FLOW, merges = self.merges, "Draft merged");
    }

    pub fn reset(&mut self) {
        self.draft = D::initial();
        self.merges = 0;
        tracing::debug!(flow = D::FLOW, "Draft reset");
    }

    /// Number of merges since construction or the last reset.
    pub fn merge_count(&self) -> u64 {
        self.merges
    }

    /// Whether the draft still equals the initial draft.
    pub fn is_pristine(&self) -> bool {
        self.draft == D::initial()
    }
}

/// Password held in memory for the duration of a flow. Never printed.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(value: impl Into<String>) -> Self {
        Password(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("Password(\"\")")
        } else {
            f.write_str("Password(<redacted>)")
        }
    }
}

impl From<&str> for Password {
    fn from(value: &str) -> Self {
        Password(value.to_string())
    }
}

impl From<String> for Password {
    fn from(value: String) -> Self {
        Password(value)
    }
}

/// A local file picked for upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedFile {
    pub path: std::path::PathBuf,
    pub file_name: String,
    pub content_type: String,
    pub size: u64,
}

/// Image slot of a draft: picked file, its local preview, and the server id once uploaded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaSlot {
    pub file: Option<SelectedFile>,
    pub preview: Option<PreviewUrl>,
    pub remote_id: Option<i64>,
}

impl MediaSlot {
    /// A file was picked but has not been uploaded yet.
    pub fn needs_upload(&self) -> bool {
        self.file.is_some() && self.remote_id.is_none()
    }
}

/// Token and user id issued by account creation
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub user_id: i64,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("user_id", &self.user_id)
            .finish()
    }
}

pub(crate) fn credentials_of(
    flow: &str,
    token: &Option<String>,
    user_id: Option<i64>,
) -> AppResult<Credentials> {
    match (token, user_id) {
        (Some(token), Some(user_id)) if !token.is_empty() => Ok(Credentials {
            token: token.clone(),
            user_id,
        }),
        _ => Err(AppError::MissingCredentials(format!(
            "{} registration has no token or user id",
            flow
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_debug_is_redacted() {
        let password = Password::from("hunter22");
        assert_eq!(format!("{:?}", password), "Password(<redacted>)");
        assert_eq!(password.expose(), "hunter22");
    }

    #[test]
    fn credentials_require_token_and_user_id() {
        assert!(credentials_of("creator", &None, Some(1)).is_err());
        assert!(credentials_of("creator", &Some("t".into()), None).is_err());
        assert!(credentials_of("creator", &Some(String::new()), Some(1)).is_err());

        let creds = credentials_of("creator", &Some("secret-token".into()), Some(1)).unwrap();
        assert_eq!(creds.user_id, 1);
        assert!(!format!("{:?}", creds).contains("secret-token"));
    }

    #[test]
    fn media_slot_needs_upload_until_remote_id() {
        let mut slot = MediaSlot::default();
        assert!(!slot.needs_upload());
        slot.file = Some(SelectedFile {
            path: "a.png".into(),
            file_name: "a.png".into(),
            content_type: "image/png".into(),
            size: 1,
        });
        assert!(slot.needs_upload());
        slot.remote_id = Some(3);
        assert!(!slot.needs_upload());
    }
}
