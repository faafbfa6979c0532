use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::media::ImageRef;

/// Account role as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Creator,
    Venue,
    /// Any role this client does not know about, kept verbatim
    Other(String),
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "creator" => Role::Creator,
            "venue" | "space" => Role::Venue,
            _ => Role::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Creator => "creator",
            Role::Venue => "venue",
            Role::Other(s) => s,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request DTO for POST /api/user/auth/login
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Creator profile summary embedded in a login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatorSummary {
    pub id: i64,
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
}

/// Venue summary embedded in login and registration responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueSummary {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub logo_id: Option<i64>,
    #[serde(default)]
    pub logo: Option<ImageRef>,
}

/// User record returned by the auth endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountUser {
    pub id: i64,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub avatar_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub creator: Option<CreatorSummary>,
    #[serde(default)]
    pub venue: Option<VenueSummary>,
}

/// Response of POST /api/user/auth/login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: AccountUser,
}

/// Request DTO for POST /api/user/auth/register/creator
#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterCreatorRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for RegisterCreatorRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterCreatorRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Response of the registration endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub token: String,
    pub user: AccountUser,
}

pub type RegisterCreatorResponse = RegisterResponse;
pub type RegisterVenueResponse = RegisterResponse;

/// Request DTO for POST /api/user/auth/register/venue
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct RegisterVenueRequest {
    pub name: String,
    pub email: String,
    pub password: String,
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

impl std::fmt::Debug for RegisterVenueRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterVenueRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("street_address", &self.street_address)
            .field("logo_id", &self.logo_id)
            .field("cover_photo_id", &self.cover_photo_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_known_and_unknown_values() {
        let roles: Vec<Role> = serde_json::from_str(r#"["creator","venue","space","admin"]"#).unwrap();
        assert_eq!(
            roles,
            vec![
                Role::Creator,
                Role::Venue,
                Role::Venue,
                Role::Other("admin".to_string())
            ]
        );
        assert_eq!(serde_json::to_string(&Role::Other("admin".into())).unwrap(), r#""admin""#);
    }

    #[test]
    fn debug_output_redacts_passwords() {
        let req = RegisterCreatorRequest {
            name: "Alice".to_string(),
            email: "a@x.com".to_string(),
            password: "hunter22".to_string(),
        };
        let out = format!("{:?}", req);
        assert!(!out.contains("hunter22"));
        assert!(out.contains("a@x.com"));
    }

    #[test]
    fn register_venue_request_skips_absent_fields() {
        let req = RegisterVenueRequest {
            name: "Cafe".to_string(),
            email: "cafe@x.com".to_string(),
            password: "secret1".to_string(),
            street_address: Some("Tverskaya 1".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["street_address"], "Tverskaya 1");
        assert!(json.get("logo_id").is_none());
        assert!(json.get("category_ids").is_none());
    }

    #[test]
    fn login_response_parses_nested_creator() {
        let json = r#"{
            "token": "t",
            "user": {
                "id": 7, "email": "a@x.com", "role": "creator",
                "created_at": "2025-01-01T00:00:00Z", "updated_at": "2025-01-01T00:00:00Z",
                "creator": {"id": 3, "name": "Alice", "photo": {"id": 11, "file_path": "a.png"}}
            }
        }"#;
        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.user.role, Role::Creator);
        let creator = resp.user.creator.unwrap();
        assert_eq!(creator.photo.unwrap().id, 11);
        assert!(resp.user.venue.is_none());
    }
}
