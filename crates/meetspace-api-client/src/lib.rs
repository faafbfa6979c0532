//! HTTP client for the Meetspace backend.
//!
//! Provides a minimal client with generic JSON/multipart helpers and domain
//! methods for the users API (`/api/user`) and the events API (`/api/event`).
//! The bearer token is passed per call: the same client serves anonymous
//! catalog reads, a registration flow that has just received its token, and
//! the logged-in user.

pub mod api;
pub mod events;

use std::time::Duration;

use meetspace_core::{AppError, AppResult, ClientConfig};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Prefix of the users API (auth, profiles, uploads, images).
pub const USERS_API: &str = "/api/user";

/// Prefix of the events API (categories, events).
pub const EVENTS_API: &str = "/api/event";

/// HTTP client for the Meetspace backend.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

fn transport_error(err: reqwest::Error) -> AppError {
    if err.is_decode() {
        AppError::Decode(err.to_string())
    } else {
        AppError::Transport(err.to_string())
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> AppResult<Self> {
        Self::new(
            config.api_url.clone(),
            Duration::from_secs(config.http_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let request = self
            .client
            .request(method, self.build_url(path))
            .header(reqwest::header::ACCEPT, "application/json");
        match token {
            Some(token) if !token.is_empty() => request.bearer_auth(token),
            _ => request,
        }
    }

    /// Send a request and turn non-2xx statuses into `AppError::Api`.
    async fn send(&self, request: RequestBuilder, path: &str) -> AppResult<Response> {
        let response = request.send().await.map_err(transport_error)?;

        let status = response.status();
        tracing::debug!(path, status = status.as_u16(), "API response");
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Api {
                status: status.as_u16(),
                body: error_text,
            });
        }

        Ok(response)
    }

    async fn read_json<T: DeserializeOwned>(response: Response, path: &str) -> AppResult<T> {
        let bytes = response.bytes().await.map_err(transport_error)?;
        serde_json::from_slice(&bytes).map_err(|e| {
            AppError::Decode(format!("Failed to parse response of {} as JSON: {}", path, e))
        })
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        token: Option<&str>,
    ) -> AppResult<T> {
        let mut request = self.request(Method::GET, path, token);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = self.send(request, path).await?;
        Self::read_json(response, path).await
    }

    /// GET request returning the raw response.
    pub async fn get_raw(&self, path: &str, token: Option<&str>) -> AppResult<Response> {
        let request = self.request(Method::GET, path, token);
        self.send(request, path).await
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> AppResult<T> {
        let request = self.request(Method::POST, path, token).json(body);
        let response = self.send(request, path).await?;
        Self::read_json(response, path).await
    }

    /// PUT JSON body and deserialize response.
    pub async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> AppResult<T> {
        let request = self.request(Method::PUT, path, token).json(body);
        let response = self.send(request, path).await?;
        Self::read_json(response, path).await
    }

    /// POST multipart form and deserialize response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
        token: Option<&str>,
    ) -> AppResult<T> {
        let request = self.request(Method::POST, path, token).multipart(form);
        let response = self.send(request, path).await?;
        Self::read_json(response, path).await
    }

    /// PATCH without a body. The response body is ignored.
    pub async fn patch(&self, path: &str, token: Option<&str>) -> AppResult<()> {
        let request = self.request(Method::PATCH, path, token);
        self.send(request, path).await?;
        Ok(())
    }

    /// DELETE request. Returns Ok(()) on success.
    pub async fn delete(&self, path: &str, token: Option<&str>) -> AppResult<()> {
        let request = self.request(Method::DELETE, path, token);
        self.send(request, path).await?;
        Ok(())
    }

    /// Raw client for custom requests.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

pub use api::venue_page_from_value;
pub use meetspace_core::models::{
    Category, CreatorProfile, Event, EventFilter, FetchedImage, ImageType, LoginResponse, Page,
    RegisterResponse, UploadImageResponse, VenueListItem, VenueProfile,
};

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn client(server: &Server) -> ApiClient {
        ApiClient::new(format!("{}/", server.url()), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn base_url_is_trimmed() {
        let api = ApiClient::new("http://localhost:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(api.base_url(), "http://localhost:8080");
        assert_eq!(
            api.build_url("/api/user/auth/login"),
            "http://localhost:8080/api/user/auth/login"
        );
    }

    #[tokio::test]
    async fn non_success_status_keeps_body_verbatim() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/event/categories")
            .with_status(422)
            .with_body(r#"{"error":"bad"}"#)
            .create_async()
            .await;

        let err = client(&server)
            .get::<serde_json::Value>("/api/event/categories", &[], None)
            .await
            .unwrap_err();
        mock.assert_async().await;
        match err {
            AppError::Api { status, body } => {
                assert_eq!(status, 422);
                assert_eq!(body, r#"{"error":"bad"}"#);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn bearer_token_is_sent_when_present() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/event/events/4")
            .match_header("authorization", "Bearer tok")
            .with_status(204)
            .create_async()
            .await;

        client(&server)
            .delete("/api/event/events/4", Some("tok"))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn malformed_json_is_a_decode_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/event/categories")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = client(&server)
            .get::<Vec<Category>>("/api/event/categories", &[], None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let api = ApiClient::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let err = api
            .get::<serde_json::Value>("/api/event/categories", &[], None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));
    }
}
