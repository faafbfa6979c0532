//! Events API: categories and events.

use meetspace_core::models::{Category, CreateEventRequest, Event, EventFilter, UpdateEventRequest};
use meetspace_core::AppResult;
use serde::Deserialize;

use crate::{ApiClient, EVENTS_API};

/// A list returned bare or wrapped under one of the known keys.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListEnvelope<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(alias = "categories", alias = "events")]
        data: Option<Vec<T>>,
    },
}

impl<T> ListEnvelope<T> {
    fn into_items(self) -> Vec<T> {
        match self {
            ListEnvelope::Bare(items) => items,
            ListEnvelope::Wrapped { data } => data.unwrap_or_default(),
        }
    }
}

impl ApiClient {
    pub async fn fetch_categories(&self, token: Option<&str>) -> AppResult<Vec<Category>> {
        let raw: ListEnvelope<Category> = self
            .get(&format!("{}/categories", EVENTS_API), &[], token)
            .await?;
        Ok(raw.into_items())
    }

    /// Events matching `filter`. The backend does not page this list.
    pub async fn fetch_events(
        &self,
        filter: &EventFilter,
        token: Option<&str>,
    ) -> AppResult<Vec<Event>> {
        let raw: ListEnvelope<Event> = self
            .get(&format!("{}/events", EVENTS_API), &filter.to_query(), token)
            .await?;
        let events = raw.into_items();
        tracing::debug!(?filter, count = events.len(), "Fetched events");
        Ok(events)
    }

    pub async fn fetch_event(&self, id: i64, token: Option<&str>) -> AppResult<Event> {
        self.get(&format!("{}/events/{}", EVENTS_API, id), &[], token)
            .await
    }

    pub async fn create_event(&self, request: &CreateEventRequest, token: &str) -> AppResult<Event> {
        tracing::info!(title = %request.title, "Creating event");
        self.post_json(&format!("{}/events", EVENTS_API), request, Some(token))
            .await
    }

    pub async fn update_event(
        &self,
        id: i64,
        request: &UpdateEventRequest,
        token: &str,
    ) -> AppResult<Event> {
        self.put_json(&format!("{}/events/{}", EVENTS_API, id), request, Some(token))
            .await
    }

    pub async fn delete_event(&self, id: i64, token: &str) -> AppResult<()> {
        self.delete(&format!("{}/events/{}", EVENTS_API, id), Some(token))
            .await
    }

    pub async fn archive_event(&self, id: i64, token: &str) -> AppResult<()> {
        self.patch(&format!("{}/events/{}/archive", EVENTS_API, id), Some(token))
            .await
    }

    pub async fn publish_event(&self, id: i64, token: &str) -> AppResult<()> {
        self.patch(&format!("{}/events/{}/publish", EVENTS_API, id), Some(token))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meetspace_core::models::EventStatus;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::time::Duration;

    fn client(server: &Server) -> ApiClient {
        ApiClient::new(server.url(), Duration::from_secs(5)).unwrap()
    }

    fn event_json(id: i64, creator_id: i64) -> serde_json::Value {
        json!({
            "id": id, "creator_id": creator_id, "title": format!("Event {}", id),
            "description": "", "category_ids": [1], "status": "published",
            "created_at": "2025-01-01T00:00:00Z", "updated_at": "2025-01-01T00:00:00Z"
        })
    }

    #[test]
    fn list_envelope_shapes() {
        let bare: ListEnvelope<Category> =
            serde_json::from_value(json!([{"id": 1, "name": "Music"}])).unwrap();
        assert_eq!(bare.into_items().len(), 1);

        let wrapped: ListEnvelope<Category> =
            serde_json::from_value(json!({"categories": [{"id": 1, "name": "Music"}]})).unwrap();
        assert_eq!(wrapped.into_items()[0].name, "Music");

        let data: ListEnvelope<Category> =
            serde_json::from_value(json!({"data": [{"id": 2, "name": "Talks"}]})).unwrap();
        assert_eq!(data.into_items()[0].id, 2);

        let empty: ListEnvelope<Category> = serde_json::from_value(json!({})).unwrap();
        assert!(empty.into_items().is_empty());
    }

    #[tokio::test]
    async fn fetch_events_sends_filters() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/event/events")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("creator_id".into(), "7".into()),
                Matcher::UrlEncoded("status".into(), "published".into()),
            ]))
            .with_status(200)
            .with_body(json!({"events": [event_json(1, 7), event_json(2, 7)]}).to_string())
            .create_async()
            .await;

        let filter = EventFilter {
            creator_id: Some(7),
            status: Some(EventStatus::Published),
            category_id: None,
        };
        let events = client(&server).fetch_events(&filter, None).await.unwrap();
        mock.assert_async().await;
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.creator_id == 7));
    }

    #[tokio::test]
    async fn lifecycle_calls_use_patch_and_delete() {
        let mut server = Server::new_async().await;
        let archive = server
            .mock("PATCH", "/api/event/events/5/archive")
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;
        let publish = server
            .mock("PATCH", "/api/event/events/5/publish")
            .with_status(204)
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/api/event/events/5")
            .with_status(200)
            .create_async()
            .await;

        let api = client(&server);
        api.archive_event(5, "tok").await.unwrap();
        api.publish_event(5, "tok").await.unwrap();
        api.delete_event(5, "tok").await.unwrap();
        archive.assert_async().await;
        publish.assert_async().await;
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn create_event_posts_json() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/event/events")
            .match_body(Matcher::Json(json!({"title": "Jazz night", "category_ids": [1]})))
            .with_status(201)
            .with_body(event_json(9, 7).to_string())
            .create_async()
            .await;

        let request = CreateEventRequest {
            title: "Jazz night".to_string(),
            category_ids: Some(vec![1]),
            ..Default::default()
        };
        let event = client(&server).create_event(&request, "tok").await.unwrap();
        mock.assert_async().await;
        assert_eq!(event.id, 9);
        assert_eq!(event.status, EventStatus::Published);
    }
}
