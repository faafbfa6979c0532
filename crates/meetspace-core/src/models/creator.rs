use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::media::ImageRef;
use super::social::SocialLinks;

/// Creator profile as returned by GET /api/user/users/creators/{user_id}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatorProfile {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub work_email: Option<String>,
    #[serde(default)]
    pub photo_id: Option<i64>,
    #[serde(default)]
    pub photo: Option<ImageRef>,
    #[serde(default)]
    pub tg_personal_link: Option<String>,
    #[serde(default)]
    pub tg_channel_link: Option<String>,
    #[serde(default)]
    pub vk_link: Option<String>,
    #[serde(default)]
    pub tiktok_link: Option<String>,
    #[serde(default)]
    pub youtube_link: Option<String>,
    #[serde(default)]
    pub dzen_link: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CreatorProfile {
    /// Image id of the avatar, preferring the embedded photo record.
    pub fn photo_image_id(&self) -> Option<i64> {
        self.photo.as_ref().map(|p| p.id).or(self.photo_id)
    }
}

/// Request DTO for PUT /api/user/users/creators/{user_id}
///
/// Only present fields are sent; the backend leaves the others untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCreatorRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tg_personal_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tg_channel_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vk_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiktok_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dzen_link: Option<String>,
}

impl UpdateCreatorRequest {
    pub fn social(links: &SocialLinks) -> Self {
        Self {
            tg_channel_link: Some(links.telegram_channel.clone()),
            vk_link: Some(links.vk.clone()),
            tiktok_link: Some(links.tiktok.clone()),
            youtube_link: Some(links.youtube.clone()),
            dzen_link: Some(links.dzen.clone()),
            ..Default::default()
        }
    }
}

/// Lightweight creator info used to decorate event cards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatorInfo {
    pub name: String,
    pub avatar_id: Option<i64>,
}
