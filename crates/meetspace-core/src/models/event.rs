use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Publication status of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Published,
    Archived,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Published => "published",
            EventStatus::Archived => "archived",
        }
    }
}

impl std::str::FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "published" => Ok(EventStatus::Published),
            "archived" => Ok(EventStatus::Archived),
            other => Err(format!("Unknown event status: {}", other)),
        }
    }
}

/// Event as returned by the events API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub creator_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover_photo_id: Option<i64>,
    #[serde(default)]
    pub category_ids: Vec<i64>,
    pub status: EventStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Event {
    /// First known category of this event, used as the card tag.
    pub fn primary_category<'a>(&self, categories: &'a [Category]) -> Option<&'a Category> {
        categories
            .iter()
            .find(|c| self.category_ids.contains(&c.id))
    }
}

/// Request DTO for POST /api/event/events
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_photo_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_ids: Option<Vec<i64>>,
}

/// Request DTO for PUT /api/event/events/{id}
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_photo_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_ids: Option<Vec<i64>>,
}

/// Query filters for GET /api/event/events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub creator_id: Option<i64>,
    pub status: Option<EventStatus>,
    pub category_id: Option<i64>,
}

impl EventFilter {
    pub fn published() -> Self {
        Self {
            status: Some(EventStatus::Published),
            ..Default::default()
        }
    }

    pub fn by_creator(creator_id: i64) -> Self {
        Self {
            creator_id: Some(creator_id),
            ..Default::default()
        }
    }

    /// Query pairs for the request. Zero ids are treated as "no filter".
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(id) = self.creator_id.filter(|id| *id != 0) {
            query.push(("creator_id", id.to_string()));
        }
        if let Some(status) = self.status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(id) = self.category_id.filter(|id| *id != 0) {
            query.push(("category_id", id.to_string()));
        }
        query
    }
}
