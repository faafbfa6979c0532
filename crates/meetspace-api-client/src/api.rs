//! Users API: auth, uploads, profiles, venue listing and images.

use bytes::Bytes;
use meetspace_core::models::{
    CreatorProfile, FetchedImage, ImageType, LoginRequest, LoginResponse, Page,
    RegisterCreatorRequest, RegisterResponse, RegisterVenueRequest, UpdateCreatorRequest,
    UpdateVenueRequest, UploadImageResponse, VenueListItem, VenueProfile,
};
use meetspace_core::{AppError, AppResult, SelectedFile};
use serde_json::Value;

use crate::{ApiClient, USERS_API};

/// Venue listing in whatever envelope the backend used.
///
/// Items come from `data`, `venues`, `items` or a bare array; the total from
/// `total`, `count`, `total_count`, falling back to the number of items.
pub fn venue_page_from_value(raw: Value, limit: u32, offset: u32) -> AppResult<Page<VenueListItem>> {
    let (items, total) = match raw {
        Value::Array(items) => (Value::Array(items), None),
        Value::Object(mut map) => {
            let items = ["data", "venues", "items"]
                .iter()
                .find_map(|key| map.remove(*key).filter(|v| !v.is_null()))
                .unwrap_or_else(|| Value::Array(Vec::new()));
            let total = ["total", "count", "total_count"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_u64));
            (items, total)
        }
        _ => (Value::Array(Vec::new()), None),
    };

    let items: Vec<VenueListItem> = serde_json::from_value(items)?;
    let total = total.unwrap_or(items.len() as u64);
    Ok(Page::new(items, total, limit, offset))
}

impl ApiClient {
    /// Exchange email and password for a bearer token.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        tracing::debug!(email, "Logging in");
        self.post_json(&format!("{}/auth/login", USERS_API), &body, None)
            .await
    }

    /// Create a creator account. The backend creates the creator profile with it.
    pub async fn register_creator(
        &self,
        request: &RegisterCreatorRequest,
    ) -> AppResult<RegisterResponse> {
        tracing::debug!(email = %request.email, "Registering creator");
        self.post_json(&format!("{}/auth/register/creator", USERS_API), request, None)
            .await
    }

    /// Create a venue account together with its venue record.
    pub async fn register_venue(&self, request: &RegisterVenueRequest) -> AppResult<RegisterResponse> {
        tracing::debug!(email = %request.email, "Registering venue");
        self.post_json(&format!("{}/auth/register/venue", USERS_API), request, None)
            .await
    }

    /// Upload an image from a picked local file.
    pub async fn upload_image(
        &self,
        file: &SelectedFile,
        image_type: ImageType,
        token: &str,
    ) -> AppResult<UploadImageResponse> {
        let buffer = tokio::fs::read(&file.path).await.map_err(|e| {
            AppError::InvalidInput(format!("Failed to read file {}: {}", file.path.display(), e))
        })?;
        self.upload_image_bytes(
            Bytes::from(buffer),
            &file.file_name,
            &file.content_type,
            image_type,
            token,
        )
        .await
    }

    /// Upload image bytes as multipart `file` + `type`.
    pub async fn upload_image_bytes(
        &self,
        bytes: Bytes,
        file_name: &str,
        content_type: &str,
        image_type: ImageType,
        token: &str,
    ) -> AppResult<UploadImageResponse> {
        let part = reqwest::multipart::Part::bytes(bytes.to_vec())
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| {
                AppError::InvalidInput(format!("Invalid content type {}: {}", content_type, e))
            })?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("type", image_type.as_str());

        tracing::debug!(
            file_name,
            size = bytes.len(),
            image_type = image_type.as_str(),
            "Uploading image"
        );
        self.post_multipart(&format!("{}/users/upload", USERS_API), form, Some(token))
            .await
    }

    pub async fn update_creator_profile(
        &self,
        user_id: i64,
        request: &UpdateCreatorRequest,
        token: &str,
    ) -> AppResult<CreatorProfile> {
        self.put_json(
            &format!("{}/users/creators/{}", USERS_API, user_id),
            request,
            Some(token),
        )
        .await
    }

    pub async fn update_venue_profile(
        &self,
        user_id: i64,
        request: &UpdateVenueRequest,
        token: &str,
    ) -> AppResult<VenueProfile> {
        self.put_json(
            &format!("{}/users/venues/{}", USERS_API, user_id),
            request,
            Some(token),
        )
        .await
    }

    pub async fn fetch_creator_profile(&self, user_id: i64, token: &str) -> AppResult<CreatorProfile> {
        self.get(
            &format!("{}/users/creators/{}", USERS_API, user_id),
            &[],
            Some(token),
        )
        .await
    }

    pub async fn fetch_venue_profile(
        &self,
        user_id: i64,
        token: Option<&str>,
    ) -> AppResult<VenueProfile> {
        self.get(&format!("{}/users/venues/{}", USERS_API, user_id), &[], token)
            .await
    }

    /// One page of the public venue catalog.
    pub async fn fetch_venues(
        &self,
        token: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> AppResult<Page<VenueListItem>> {
        let query = vec![("limit", limit.to_string()), ("offset", offset.to_string())];
        let raw: Value = self
            .get(&format!("{}/users/venues", USERS_API), &query, token)
            .await?;
        let page = venue_page_from_value(raw, limit, offset)?;
        tracing::debug!(count = page.items.len(), total = page.total, "Fetched venues");
        Ok(page)
    }

    /// Download a stored image. Non-image payloads are rejected.
    pub async fn fetch_image(&self, image_id: i64, token: &str) -> AppResult<FetchedImage> {
        let response = self
            .get_raw(&format!("{}/users/images/{}", USERS_API, image_id), Some(token))
            .await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.starts_with("image/") {
            return Err(AppError::NotAnImage(format!(
                "image {} has content type {:?}",
                image_id, content_type
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?;
        Ok(FetchedImage {
            image_id,
            content_type,
            bytes,
        })
    }
}
