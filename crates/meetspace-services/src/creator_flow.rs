//! Creator onboarding wizard
//!
//! Steps: account creation, profile details with an optional avatar, social
//! links, success. The account is created on the first step so every later
//! step writes to the backend with the issued token. Account creation and
//! profile details block on failure; social links follow the configured
//! [`LateWritePolicy`].

use std::path::Path;

use meetspace_api_client::ApiClient;
use meetspace_core::models::{ImageType, RegisterCreatorRequest, SocialLinks, UpdateCreatorRequest};
use meetspace_core::{
    AppResult, AuthenticatedIdentity, CreatorDraft, CreatorPatch, IdentityStorage, IdentityStore,
    LateWritePolicy, MediaSlotKind, PreviewRegistry, PreviewUrl, ProfileDetails,
    RegistrationStore, SignupForm,
};

use crate::liveness::{Liveness, StepLease};
use crate::media::read_image_file;
use crate::outcome::{late_write_outcome, StepOutcome};

pub struct CreatorFlow<'a> {
    api: &'a ApiClient,
    store: RegistrationStore<CreatorDraft>,
    previews: PreviewRegistry,
    liveness: Liveness,
    policy: LateWritePolicy,
}

fn stale(lease: &StepLease, step: &'static str) -> bool {
    if lease.is_current() {
        return false;
    }
    tracing::debug!(flow = "creator", step, "Dropping result of superseded step");
    true
}

impl<'a> CreatorFlow<'a> {
    pub fn new(api: &'a ApiClient, policy: LateWritePolicy) -> Self {
        Self {
            api,
            store: RegistrationStore::new(),
            previews: PreviewRegistry::new(),
            liveness: Liveness::new(),
            policy,
        }
    }

    pub fn draft(&self) -> &CreatorDraft {
        self.store.read()
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    /// Handle that supersedes the step in flight when invalidated.
    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    /// Create the account and record its credentials.
    pub async fn create_account(&mut self, form: SignupForm) -> AppResult<StepOutcome> {
        let form = form.checked()?;
        let lease = self.liveness.begin();

        let request = RegisterCreatorRequest {
            name: form.name.clone(),
            email: form.email.clone(),
            password: form.password.clone(),
        };
        let response = match self.api.register_creator(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "Creator account creation failed");
                return Err(e);
            }
        };
        if stale(&lease, "create_account") {
            return Ok(StepOutcome::Abandoned);
        }

        tracing::info!(user_id = response.user.id, "Creator account created");
        let password = form.password();
        self.store.merge(CreatorPatch {
            token: Some(Some(response.token)),
            user_id: Some(Some(response.user.id)),
            name: Some(form.name),
            email: Some(form.email),
            password: Some(password),
            ..Default::default()
        });
        Ok(StepOutcome::Advanced)
    }

    /// Pick an avatar file. Replaces any earlier pick and its preview.
    pub async fn select_avatar(&mut self, path: &Path) -> AppResult<PreviewUrl> {
        let (file, bytes) = read_image_file(path).await?;
        let preview = self
            .previews
            .select(MediaSlotKind::Avatar, file.content_type.clone(), bytes);
        self.store.merge(CreatorPatch {
            photo_file: Some(Some(file)),
            photo_preview: Some(Some(preview.clone())),
            photo_id: Some(None),
            ..Default::default()
        });
        Ok(preview)
    }

    /// Upload the avatar if one is pending, then save the profile details.
    pub async fn submit_profile(&mut self, details: ProfileDetails) -> AppResult<StepOutcome> {
        let credentials = self.store.read().credentials()?;
        details.validate()?;
        let lease = self.liveness.begin();

        let mut photo_id = self.store.read().photo.remote_id;
        if let Some(file) = self.store.read().photo.file.clone() {
            if photo_id.is_none() {
                let uploaded = self
                    .api
                    .upload_image(&file, ImageType::Avatar, &credentials.token)
                    .await
                    .inspect_err(|e| tracing::error!(error = %e, "Avatar upload failed"))?;
                if stale(&lease, "submit_profile") {
                    return Ok(StepOutcome::Abandoned);
                }
                self.store.merge(CreatorPatch {
                    photo_id: Some(Some(uploaded.id)),
                    ..Default::default()
                });
                photo_id = Some(uploaded.id);
            }
        }

        let description = details.description.trim().to_string();
        let request = UpdateCreatorRequest {
            name: Some(self.store.read().name.clone()),
            description: Some(description.clone()),
            phone: details.phone(),
            work_email: details.work_email(),
            tg_personal_link: details.telegram_personal(),
            photo_id,
            ..Default::default()
        };
        self.api
            .update_creator_profile(credentials.user_id, &request, &credentials.token)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Creator profile update failed"))?;
        if stale(&lease, "submit_profile") {
            return Ok(StepOutcome::Abandoned);
        }

        self.store.merge(CreatorPatch {
            description: Some(description),
            city: Some(details.city.trim().to_string()),
            phone: Some(details.phone.trim().to_string()),
            work_email: Some(details.work_email.trim().to_string()),
            telegram_personal: Some(details.telegram_personal.trim().to_string()),
            ..Default::default()
        });
        tracing::info!(user_id = credentials.user_id, "Creator profile saved");
        Ok(StepOutcome::Advanced)
    }

    /// Save social links. The links are kept in the draft even if the write fails.
    pub async fn submit_social_links(&mut self, links: SocialLinks) -> AppResult<StepOutcome> {
        let credentials = self.store.read().credentials()?;
        let links = links.trimmed();
        let lease = self.liveness.begin();

        let result = self
            .api
            .update_creator_profile(
                credentials.user_id,
                &UpdateCreatorRequest::social(&links),
                &credentials.token,
            )
            .await;
        if stale(&lease, "submit_social_links") {
            return Ok(StepOutcome::Abandoned);
        }

        self.store.merge(CreatorPatch::social(&links));
        late_write_outcome(self.policy, "submit_social_links", result)
    }

    pub fn skip_social_links(&mut self) -> StepOutcome {
        self.liveness.invalidate();
        StepOutcome::Advanced
    }

    /// Log the new creator in, then discard the draft.
    pub async fn complete<S: IdentityStorage>(
        &mut self,
        identity: &mut IdentityStore<S>,
    ) -> AppResult<AuthenticatedIdentity> {
        let authenticated = AuthenticatedIdentity::from_creator_draft(self.store.read())?;
        identity.login(authenticated.clone()).await?;
        self.teardown();
        tracing::info!(user_id = authenticated.user.id, "Creator registration completed");
        Ok(authenticated)
    }

    /// Abandon the wizard and start over.
    pub fn restart(&mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        self.liveness.invalidate();
        self.previews.release_all();
        self.store.reset();
    }
}
