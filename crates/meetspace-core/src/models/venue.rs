use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::media::ImageRef;
use super::social::SocialLinks;

/// Photo attached to a venue gallery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenuePhoto {
    pub id: i64,
    pub venue_id: i64,
    pub image_id: i64,
    #[serde(default)]
    pub image: Option<ImageRef>,
}

/// Venue profile as returned by GET /api/user/users/venues/{user_id}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueProfile {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub street_address: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub work_email: Option<String>,
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
    pub logo_id: Option<i64>,
    #[serde(default)]
    pub cover_photo_id: Option<i64>,
    #[serde(default)]
    pub logo: Option<ImageRef>,
    #[serde(default)]
    pub cover_photo: Option<ImageRef>,
    #[serde(default)]
    pub photos: Vec<VenuePhoto>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Venue entry of the catalog listing. Listing rows may omit detail fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueListItem {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub street_address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub work_email: Option<String>,
    #[serde(default)]
    pub logo_id: Option<i64>,
    #[serde(default)]
    pub cover_photo_id: Option<i64>,
    #[serde(default)]
    pub logo: Option<ImageRef>,
    #[serde(default)]
    pub cover_photo: Option<ImageRef>,
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

fn pick<T: Clone>(current: &Option<T>, fresh: &Option<T>) -> Option<T> {
    fresh.clone().or_else(|| current.clone())
}

impl VenueListItem {
    /// Display address: street address first, then the legacy `address` field.
    pub fn display_address(&self) -> Option<&str> {
        self.street_address
            .as_deref()
            .or(self.address.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// Listing rows without a description or an address need the full profile.
    pub fn needs_details(&self) -> bool {
        self.description.as_deref().unwrap_or("").is_empty() || self.display_address().is_none()
    }

    pub fn logo_image_id(&self) -> Option<i64> {
        self.logo_id.or_else(|| self.logo.as_ref().map(|l| l.id))
    }

    pub fn cover_image_id(&self) -> Option<i64> {
        self.cover_photo_id
            .or_else(|| self.cover_photo.as_ref().map(|c| c.id))
    }

    /// Overlay the fields of a full profile onto this row; fields the profile lacks are kept.
    pub fn merge_profile(&mut self, profile: &VenueProfile) {
        self.name = profile.name.clone();
        self.description = pick(&self.description, &profile.description);
        self.address = pick(&self.address, &profile.address);
        self.street_address = pick(&self.street_address, &profile.street_address);
        self.phone = pick(&self.phone, &profile.phone);
        self.work_email = pick(&self.work_email, &profile.work_email);
        self.logo_id = pick(&self.logo_id, &profile.logo_id);
        self.cover_photo_id = pick(&self.cover_photo_id, &profile.cover_photo_id);
        self.logo = pick(&self.logo, &profile.logo);
        self.cover_photo = pick(&self.cover_photo, &profile.cover_photo);
        self.tg_personal_link = pick(&self.tg_personal_link, &profile.tg_personal_link);
        self.tg_channel_link = pick(&self.tg_channel_link, &profile.tg_channel_link);
        self.vk_link = pick(&self.vk_link, &profile.vk_link);
        self.tiktok_link = pick(&self.tiktok_link, &profile.tiktok_link);
        self.youtube_link = pick(&self.youtube_link, &profile.youtube_link);
        self.dzen_link = pick(&self.dzen_link, &profile.dzen_link);
    }
}

impl VenueProfile {
    pub fn logo_image_id(&self) -> Option<i64> {
        self.logo.as_ref().map(|l| l.id).or(self.logo_id)
    }

    pub fn cover_image_id(&self) -> Option<i64> {
        self.cover_photo.as_ref().map(|c| c.id).or(self.cover_photo_id)
    }

    pub fn gallery_image_ids(&self) -> Vec<i64> {
        self.photos.iter().map(|p| p.image_id).collect()
    }
}

/// Request DTO for PUT /api/user/users/venues/{user_id}
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateVenueRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_email: Option<String>,
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_photo_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_ids: Option<Vec<i64>>,
}

impl UpdateVenueRequest {
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
