use super::{credentials_of, Credentials, Draft, MediaSlot, Password, SelectedFile, DEFAULT_CITY};
use crate::error::AppResult;
use crate::models::SocialLinks;
use crate::preview::PreviewUrl;

/// Event formats a venue can declare on the last step.
pub const EVENT_FORMATS: [&str; 8] = [
    "Лекции",
    "Концерты",
    "Мастер-классы",
    "Игры",
    "Выставки",
    "Разговорные клубы",
    "Показы",
    "Обмен",
];

/// Draft of the venue onboarding flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueDraft {
    pub token: Option<String>,
    pub user_id: Option<i64>,
    pub venue_id: Option<i64>,
    pub name: String,
    pub email: String,
    pub password: Password,
    pub description: String,
    pub city: String,
    pub street: String,
    pub phone: String,
    pub work_email: String,
    pub telegram_personal: String,
    pub logo: MediaSlot,
    pub cover: MediaSlot,
    pub event_formats: Vec<String>,
    pub telegram_channel: String,
    pub vk_link: String,
    pub tiktok_link: String,
    pub youtube_link: String,
    pub dzen_link: String,
}

/// Partial update of a [`VenueDraft`].
///
/// `None` leaves a field untouched. Nullable fields take `Some(None)` to clear them.
#[derive(Debug, Clone, Default)]
pub struct VenuePatch {
    pub token: Option<Option<String>>,
    pub user_id: Option<Option<i64>>,
    pub venue_id: Option<Option<i64>>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<Password>,
    pub description: Option<String>,
    pub city: Option<String>,
    pub street: Option<String>,
    pub phone: Option<String>,
    pub work_email: Option<String>,
    pub telegram_personal: Option<String>,
    pub logo_file: Option<Option<SelectedFile>>,
    pub logo_preview: Option<Option<PreviewUrl>>,
    pub logo_id: Option<Option<i64>>,
    pub cover_file: Option<Option<SelectedFile>>,
    pub cover_preview: Option<Option<PreviewUrl>>,
    pub cover_id: Option<Option<i64>>,
    pub event_formats: Option<Vec<String>>,
    pub telegram_channel: Option<String>,
    pub vk_link: Option<String>,
    pub tiktok_link: Option<String>,
    pub youtube_link: Option<String>,
    pub dzen_link: Option<String>,
}

impl VenuePatch {
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

impl Draft for VenueDraft {
    type Patch = VenuePatch;

    const FLOW: &'static str = "venue";

    fn initial() -> Self {
        Self {
            token: None,
            user_id: None,
            venue_id: None,
            name: String::new(),
            email: String::new(),
            password: Password::default(),
            description: String::new(),
            city: DEFAULT_CITY.to_string(),
            street: String::new(),
            phone: String::new(),
            work_email: String::new(),
            telegram_personal: String::new(),
            logo: MediaSlot::default(),
            cover: MediaSlot::default(),
            event_formats: Vec::new(),
            telegram_channel: String::new(),
            vk_link: String::new(),
            tiktok_link: String::new(),
            youtube_link: String::new(),
            dzen_link: String::new(),
        }
    }

    fn apply(&mut self, patch: VenuePatch) {
        overwrite_fields!(
            self,
            patch,
            [
                token,
                user_id,
                venue_id,
                name,
                email,
                password,
                description,
                city,
                street,
                phone,
                work_email,
                telegram_personal,
                event_formats,
                telegram_channel,
                vk_link,
                tiktok_link,
                youtube_link,
                dzen_link,
            ]
        );
        if let Some(file) = patch.logo_file {
            self.logo.file = file;
        }
        if let Some(preview) = patch.logo_preview {
            self.logo.preview = preview;
        }
        if let Some(id) = patch.logo_id {
            self.logo.remote_id = id;
        }
        if let Some(file) = patch.cover_file {
            self.cover.file = file;
        }
        if let Some(preview) = patch.cover_preview {
            self.cover.preview = preview;
        }
        if let Some(id) = patch.cover_id {
            self.cover.remote_id = id;
        }
    }
}

impl VenueDraft {
    /// Token and user id, or `MissingCredentials` if the venue account does not exist yet.
    pub fn credentials(&self) -> AppResult<Credentials> {
        credentials_of(Self::FLOW, &self.token, self.user_id)
    }

    /// Whether the entry step recorded enough to create the account later.
    pub fn has_signup(&self) -> bool {
        !self.name.trim().is_empty() && !self.email.trim().is_empty() && !self.password.is_empty()
    }

    /// Street address sent to the backend: "city, street", or whichever is present.
    pub fn street_address(&self) -> Option<String> {
        let city = self.city.trim();
        let street = self.street.trim();
        match (city.is_empty(), street.is_empty()) {
            (true, true) => None,
            (false, true) => Some(city.to_string()),
            (true, false) => Some(street.to_string()),
            (false, false) => Some(format!("{}, {}", city, street)),
        }
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::{CreatorDraft, CreatorPatch, RegistrationStore};

    #[test]
    fn logo_and_cover_slots_merge_independently() {
        let mut store: RegistrationStore<VenueDraft> = RegistrationStore::new();
        store.merge(VenuePatch {
            logo_id: Some(Some(1)),
            ..Default::default()
        });
        store.merge(VenuePatch {
            cover_id: Some(Some(2)),
            ..Default::default()
        });
        assert_eq!(store.read().logo.remote_id, Some(1));
        assert_eq!(store.read().cover.remote_id, Some(2));
    }

    #[test]
    fn creator_and_venue_stores_are_isolated() {
        let mut creator: RegistrationStore<CreatorDraft> = RegistrationStore::new();
        let mut venue: RegistrationStore<VenueDraft> = RegistrationStore::new();

        creator.merge(CreatorPatch {
            name: Some("Alice".to_string()),
            token: Some(Some("creator-token".to_string())),
            ..Default::default()
        });
        assert_eq!(venue.read(), &VenueDraft::initial());

        venue.merge(VenuePatch {
            name: Some("Арт-кафе Ромашка".to_string()),
            ..Default::default()
        });
        assert_eq!(creator.read().name, "Alice");
        assert!(venue.read().token.is_none());

        venue.reset();
        assert_eq!(creator.read().token.as_deref(), Some("creator-token"));
    }

    #[test]
    fn reset_clears_formats_and_slots() {
        let mut store: RegistrationStore<VenueDraft> = RegistrationStore::new();
        store.merge(VenuePatch {
            venue_id: Some(Some(4)),
            event_formats: Some(vec![EVENT_FORMATS[0].to_string()]),
            logo_id: Some(Some(8)),
            street: Some("Тверская 1".to_string()),
            ..Default::default()
        });
        store.reset();
        assert_eq!(store.read(), &VenueDraft::initial());
    }

    #[test]
    fn street_address_combines_city_and_street() {
        let mut draft = VenueDraft::initial();
        assert_eq!(draft.street_address().as_deref(), Some("Москва"));
        draft.street = " Тверская 1 ".to_string();
        assert_eq!(draft.street_address().as_deref(), Some("Москва, Тверская 1"));
        draft.city.clear();
        assert_eq!(draft.street_address().as_deref(), Some("Тверская 1"));
        draft.street.clear();
        assert_eq!(draft.street_address(), None);
    }

    #[test]
    fn has_signup_requires_all_credentials() {
        let mut draft = VenueDraft::initial();
        assert!(!draft.has_signup());
        draft.name = "Cafe".to_string();
        draft.email = "cafe@x.com".to_string();
        assert!(!draft.has_signup());
        draft.password = Password::from("secret1");
        assert!(draft.has_signup());
    }
}
