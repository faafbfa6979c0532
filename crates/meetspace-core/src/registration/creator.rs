use super::{credentials_of, Credentials, Draft, MediaSlot, Password, SelectedFile, DEFAULT_CITY};
use crate::error::AppResult;
use crate::models::SocialLinks;
use crate::preview::PreviewUrl;

/// Draft of the creator onboarding flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatorDraft {
    pub token: Option<String>,
    pub user_id: Option<i64>,
    pub name: String,
    pub email: String,
    pub password: Password,
    pub description: String,
    pub city: String,
    pub phone: String,
    pub work_email: String,
    pub telegram_personal: String,
    pub photo: MediaSlot,
    pub telegram_channel: String,
    pub vk_link: String,
    pub tiktok_link: String,
    pub youtube_link: String,
    pub dzen_link: String,
}

/// Partial update of a [`CreatorDraft`].
///
/// `None` leaves a field untouched. Nullable fields take `Some(None)` to clear them.
#[derive(Debug, Clone, Default)]
pub struct CreatorPatch {
    pub token: Option<Option<String>>,
    pub user_id: Option<Option<i64>>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<Password>,
    pub description: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub work_email: Option<String>,
    pub telegram_personal: Option<String>,
    pub photo_file: Option<Option<SelectedFile>>,
    pub photo_preview: Option<Option<PreviewUrl>>,
    pub photo_id: Option<Option<i64>>,
    pub telegram_channel: Option<String>,
    pub vk_link: Option<String>,
    pub tiktok_link: Option<String>,
    pub youtube_link: Option<String>,
    pub dzen_link: Option<String>,
}

impl CreatorPatch {
    pub fn social(links: &SocialLinks) -> Self {
        Self {
            telegram_channel: Some(links.telegram_channel.clone()),
            vk_link: Some(links.vk.clone()),
            tiktok_link: Some(links.tiktok.clone()),
            youtube_link: Some(links.youtube.clone()),
            dzen_link: Some(links.dzen.clone()),
            ..Default::default()
        }
    }
}

impl Draft for CreatorDraft {
    type Patch = CreatorPatch;

    const FLOW: &'static str = "creator";

    fn initial() -> Self {
        Self {
            token: None,
            user_id: None,
            name: String::new(),
            email: String::new(),
            password: Password::default(),
            description: String::new(),
            city: DEFAULT_CITY.to_string(),
            phone: String::new(),
            work_email: String::new(),
            telegram_personal: String::new(),
            photo: MediaSlot::default(),
            telegram_channel: String::new(),
            vk_link: String::new(),
            tiktok_link: String::new(),
            youtube_link: String::new(),
            dzen_link: String::new(),
        }
    }

    fn apply(&mut self, patch: CreatorPatch) {
        overwrite_fields!(
            self,
            patch,
            [
                token,
                user_id,
                name,
                email,
                password,
                description,
                city,
                phone,
                work_email,
                telegram_personal,
                telegram_channel,
                vk_link,
                tiktok_link,
                youtube_link,
                dzen_link,
            ]
        );
        if let Some(file) = patch.photo_file {
            self.photo.file = file;
        }
        if let Some(preview) = patch.photo_preview {
            self.photo.preview = preview;
        }
        if let Some(id) = patch.photo_id {
            self.photo.remote_id = id;
        }
    }
}

impl CreatorDraft {
    /// Token and user id, or `MissingCredentials` if account creation has not happened.
    pub fn credentials(&self) -> AppResult<Credentials> {
        credentials_of(Self::FLOW, &self.token, self.user_id)
    }

    pub fn social_links(&self) -> SocialLinks {
        SocialLinks {
            telegram_channel: self.telegram_channel.clone(),
            vk: self.vk_link.clone(),
            tiktok: self.tiktok_link.clone(),
            youtube: self.youtube_link.clone(),
            dzen: self.dzen_link.clone(),
        }
    }

    /// Name shown in the wizard header.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "Пользователь"
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::RegistrationStore;

    fn store() -> RegistrationStore<CreatorDraft> {
        RegistrationStore::new()
    }

    #[test]
    fn initial_draft_is_empty_with_default_city() {
        let draft = CreatorDraft::initial();
        assert!(draft.token.is_none());
        assert!(draft.user_id.is_none());
        assert!(draft.name.is_empty());
        assert!(draft.password.is_empty());
        assert_eq!(draft.city, "Москва");
        assert_eq!(draft.photo, MediaSlot::default());
        assert!(draft.credentials().is_err());
    }

    #[test]
    fn merges_accumulate_and_keep_other_fields() {
        let mut store = store();
        store.merge(CreatorPatch {
            name: Some("Alice".to_string()),
            ..Default::default()
        });
        store.merge(CreatorPatch {
            email: Some("a@x.com".to_string()),
            ..Default::default()
        });

        let mut expected = CreatorDraft::initial();
        expected.name = "Alice".to_string();
        expected.email = "a@x.com".to_string();
        assert_eq!(store.read(), &expected);
        assert_eq!(store.merge_count(), 2);
    }

    #[test]
    fn later_merge_wins_on_overlapping_keys() {
        let mut store = store();
        store.merge(CreatorPatch {
            photo_id: Some(Some(5)),
            name: Some("Alice".to_string()),
            ..Default::default()
        });
        store.merge(CreatorPatch {
            photo_id: Some(Some(7)),
            ..Default::default()
        });
        assert_eq!(store.read().photo.remote_id, Some(7));
        assert_eq!(store.read().name, "Alice");
    }

    #[test]
    fn empty_merge_is_a_no_op() {
        let mut store = store();
        store.merge(CreatorPatch {
            description: Some("Lectures about jazz".to_string()),
            ..Default::default()
        });
        let before = store.snapshot();
        store.merge(CreatorPatch::default());
        assert_eq!(store.read(), &before);
    }

    #[test]
    fn repeated_identical_merge_is_idempotent() {
        let patch = || CreatorPatch {
            phone: Some("+7 900 000-00-00".to_string()),
            photo_id: Some(Some(3)),
            ..Default::default()
        };
        let mut store = store();
        store.merge(patch());
        let once = store.snapshot();
        store.merge(patch());
        assert_eq!(store.read(), &once);
    }

    #[test]
    fn nullable_fields_can_be_cleared_explicitly() {
        let mut store = store();
        store.merge(CreatorPatch {
            token: Some(Some("tok".to_string())),
            user_id: Some(Some(10)),
            ..Default::default()
        });
        assert!(store.read().credentials().is_ok());

        store.merge(CreatorPatch {
            token: Some(None),
            ..Default::default()
        });
        assert!(store.read().token.is_none());
        assert_eq!(store.read().user_id, Some(10));
        assert!(store.read().credentials().is_err());
    }

    #[test]
    fn reset_restores_initial_draft() {
        let mut store = store();
        store.merge(CreatorPatch {
            token: Some(Some("tok".to_string())),
            user_id: Some(Some(1)),
            name: Some("Alice".to_string()),
            password: Some(Password::from("secret1")),
            city: Some("Казань".to_string()),
            photo_id: Some(Some(9)),
            vk_link: Some("vk.com/alice".to_string()),
            ..Default::default()
        });
        store.reset();
        assert_eq!(store.read(), &CreatorDraft::initial());
        assert!(store.is_pristine());
        assert_eq!(store.merge_count(), 0);
    }

    #[test]
    fn social_patch_round_trips_through_draft() {
        let links = SocialLinks {
            telegram_channel: "t.me/alice".to_string(),
            youtube: "youtube.com/@alice".to_string(),
            ..Default::default()
        };
        let mut store = store();
        store.merge(CreatorPatch::social(&links));
        assert_eq!(store.read().social_links(), links);
    }

    #[test]
    fn display_name_falls_back() {
        let mut draft = CreatorDraft::initial();
        assert_eq!(draft.display_name(), "Пользователь");
        draft.name = "Alice".to_string();
        assert_eq!(draft.display_name(), "Alice");
    }
}
