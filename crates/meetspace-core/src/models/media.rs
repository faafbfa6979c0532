use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference to a stored image as embedded in profile responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub id: i64,
    pub file_path: String,
    #[serde(default)]
    pub bucket_name: Option<String>,
}

/// Purpose of an uploaded image, sent as the `type` form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageType {
    Avatar,
    VenueLogo,
    VenueCover,
    VenuePhoto,
    EventCover,
}

impl ImageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageType::Avatar => "avatar",
            ImageType::VenueLogo => "venue-logo",
            ImageType::VenueCover => "venue-cover",
            ImageType::VenuePhoto => "venue-photo",
            ImageType::EventCover => "event-cover",
        }
    }
}

/// Response of POST /api/user/users/upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadImageResponse {
    pub id: i64,
    #[serde(default)]
    pub bucket_name: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub image_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Raw image downloaded from GET /api/user/users/images/{id}
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub image_id: i64,
    pub content_type: String,
    pub bytes: Bytes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_type_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&ImageType::VenueCover).unwrap(),
            r#""venue-cover""#
        );
        assert_eq!(ImageType::EventCover.as_str(), "event-cover");
    }
}
