//! Profile pages of the logged-in account.

use meetspace_api_client::ApiClient;
use meetspace_core::models::{CreatorProfile, FetchedImage, Role, VenueProfile};
use meetspace_core::{AppError, AppResult, AuthenticatedIdentity};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CreatorProfileView {
    pub profile: CreatorProfile,
    pub avatar_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VenueProfileView {
    pub profile: VenueProfile,
    pub logo_id: Option<i64>,
    pub cover_id: Option<i64>,
    pub gallery_ids: Vec<i64>,
}

/// Profile of either role.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ProfileView {
    Creator(CreatorProfileView),
    Venue(VenueProfileView),
}

pub struct Profiles<'a> {
    api: &'a ApiClient,
}

fn require_role(identity: &AuthenticatedIdentity, role: Role) -> AppResult<()> {
    if identity.user.role == role {
        return Ok(());
    }
    Err(AppError::InvalidInput(format!(
        "Account {} is a {}, not a {}",
        identity.user.id,
        identity.user.role.as_str(),
        role.as_str()
    )))
}

impl<'a> Profiles<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn creator_profile(
        &self,
        identity: &AuthenticatedIdentity,
    ) -> AppResult<CreatorProfileView> {
        require_role(identity, Role::Creator)?;
        let profile = self
            .api
            .fetch_creator_profile(identity.user.id, &identity.token)
            .await?;
        let avatar_id = profile.photo_image_id().or(identity.user.avatar_id);
        Ok(CreatorProfileView { profile, avatar_id })
    }

    pub async fn venue_profile(
        &self,
        identity: &AuthenticatedIdentity,
    ) -> AppResult<VenueProfileView> {
        require_role(identity, Role::Venue)?;
        let profile = self
            .api
            .fetch_venue_profile(identity.user.id, Some(&identity.token))
            .await?;
        Ok(VenueProfileView {
            logo_id: profile.logo_image_id().or(identity.user.avatar_id),
            cover_id: profile.cover_image_id(),
            gallery_ids: profile.gallery_image_ids(),
            profile,
        })
    }

    /// Profile matching the account role.
    pub async fn own_profile(&self, identity: &AuthenticatedIdentity) -> AppResult<ProfileView> {
        match identity.user.role {
            Role::Creator => Ok(ProfileView::Creator(self.creator_profile(identity).await?)),
            Role::Venue => Ok(ProfileView::Venue(self.venue_profile(identity).await?)),
            _ => Err(AppError::InvalidInput(format!(
                "No profile page for role {}",
                identity.user.role.as_str()
            ))),
        }
    }

    pub async fn image(
        &self,
        identity: &AuthenticatedIdentity,
        image_id: i64,
    ) -> AppResult<FetchedImage> {
        self.api.fetch_image(image_id, &identity.token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meetspace_core::UserSummary;
    use mockito::{Server, ServerGuard};
    use serde_json::json;
    use std::time::Duration;

    fn api(server: &ServerGuard) -> ApiClient {
        ApiClient::new(server.url(), Duration::from_secs(5)).unwrap()
    }

    fn identity(id: i64, role: Role) -> AuthenticatedIdentity {
        AuthenticatedIdentity {
            token: "tok".to_string(),
            user: UserSummary {
                id,
                email: "a@b.com".to_string(),
                role,
                name: None,
                avatar: None,
                avatar_id: Some(99),
            },
        }
    }

    #[tokio::test]
    async fn creator_profile_resolves_avatar() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/user/users/creators/5")
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_body(
                json!({"id": 1, "user_id": 5, "name": "Alice",
                       "photo": {"id": 12, "file_path": "a.png"}, "photo_id": 11})
                .to_string(),
            )
            .create_async()
            .await;

        let api = api(&server);
        let view = Profiles::new(&api)
            .creator_profile(&identity(5, Role::Creator))
            .await
            .unwrap();
        assert_eq!(view.avatar_id, Some(12));
        assert_eq!(view.profile.name, "Alice");
    }

    #[tokio::test]
    async fn venue_profile_resolves_media() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/user/users/venues/6")
            .with_status(200)
            .with_body(
                json!({"id": 2, "user_id": 6, "name": "Loft", "cover_photo_id": 40,
                       "photos": [{"id": 1, "venue_id": 2, "image_id": 50},
                                  {"id": 2, "venue_id": 2, "image_id": 51}]})
                .to_string(),
            )
            .create_async()
            .await;

        let api = api(&server);
        let view = Profiles::new(&api)
            .venue_profile(&identity(6, Role::Venue))
            .await
            .unwrap();
        assert_eq!(view.logo_id, Some(99));
        assert_eq!(view.cover_id, Some(40));
        assert_eq!(view.gallery_ids, vec![50, 51]);
    }

    #[tokio::test]
    async fn wrong_role_is_rejected_without_request() {
        let mut server = Server::new_async().await;
        let never = server
            .mock("GET", "/api/user/users/creators/6")
            .expect(0)
            .create_async()
            .await;

        let api = api(&server);
        let result = Profiles::new(&api)
            .creator_profile(&identity(6, Role::Venue))
            .await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
        never.assert_async().await;
    }
}
