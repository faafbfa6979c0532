//! Venue onboarding wizard
//!
//! Steps: credentials, venue details with logo and cover, event formats and
//! social links, success. The entry step only records credentials; the venue
//! account is created with all its details on the profile step, after which
//! logo and cover are uploaded with the new token and attached to the venue.

use std::path::Path;

use meetspace_api_client::ApiClient;
use meetspace_core::models::{ImageType, RegisterVenueRequest, SocialLinks, UpdateVenueRequest};
use meetspace_core::{
    AppError, AppResult, AuthenticatedIdentity, Credentials, IdentityStorage, IdentityStore,
    LateWritePolicy, MediaSlotKind, PreviewRegistry, PreviewUrl, RegistrationStore, SignupForm,
    VenueDetails, VenueDraft, VenuePatch,
};
use meetspace_core::validation::validate_event_formats;

use crate::liveness::{Liveness, StepLease};
use crate::media::read_image_file;
use crate::outcome::{late_write_outcome, StepOutcome};

pub struct VenueFlow<'a> {
    api: &'a ApiClient,
    store: RegistrationStore<VenueDraft>,
    previews: PreviewRegistry,
    liveness: Liveness,
    policy: LateWritePolicy,
}

fn stale(lease: &StepLease, step: &'static str) -> bool {
    if lease.is_current() {
        return false;
    }
    tracing::debug!(flow = "venue", step, "Dropping result of superseded step");
    true
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl<'a> VenueFlow<'a> {
    pub fn new(api: &'a ApiClient, policy: LateWritePolicy) -> Self {
        Self {
            api,
            store: RegistrationStore::new(),
            previews: PreviewRegistry::new(),
            liveness: Liveness::new(),
            policy,
        }
    }

    pub fn draft(&self) -> &VenueDraft {
        self.store.read()
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    /// Record the venue credentials. The account is created on the profile step.
    pub fn start(&mut self, form: SignupForm) -> AppResult<StepOutcome> {
        let form = form.checked()?;
        self.liveness.invalidate();
        let password = form.password();
        self.store.merge(VenuePatch {
            name: Some(form.name),
            email: Some(form.email),
            password: Some(password),
            ..Default::default()
        });
        Ok(StepOutcome::Advanced)
    }

    pub async fn select_logo(&mut self, path: &Path) -> AppResult<PreviewUrl> {
        let (file, bytes) = read_image_file(path).await?;
        let preview = self
            .previews
            .select(MediaSlotKind::Logo, file.content_type.clone(), bytes);
        self.store.merge(VenuePatch {
            logo_file: Some(Some(file)),
            logo_preview: Some(Some(preview.clone())),
            logo_id: Some(None),
            ..Default::default()
        });
        Ok(preview)
    }

    pub async fn select_cover(&mut self, path: &Path) -> AppResult<PreviewUrl> {
        let (file, bytes) = read_image_file(path).await?;
        let preview = self
            .previews
            .select(MediaSlotKind::Cover, file.content_type.clone(), bytes);
        self.store.merge(VenuePatch {
            cover_file: Some(Some(file)),
            cover_preview: Some(Some(preview.clone())),
            cover_id: Some(None),
            ..Default::default()
        });
        Ok(preview)
    }

    async fn register(
        &mut self,
        details: &VenueDetails,
        street_address: Option<String>,
        lease: &StepLease,
    ) -> AppResult<Option<Credentials>> {
        let draft = self.store.read();
        let request = RegisterVenueRequest {
            name: draft.name.clone(),
            email: draft.email.clone(),
            password: draft.password.expose().to_string(),
            description: non_empty(&details.description),
            street_address,
            phone: details.phone(),
            work_email: details.work_email(),
            tg_personal_link: details.telegram_personal(),
            ..Default::default()
        };
        let response = self
            .api
            .register_venue(&request)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Venue account creation failed"))?;
        if stale(lease, "submit_profile") {
            return Ok(None);
        }

        let venue_id = response.user.venue.as_ref().map(|v| v.id);
        tracing::info!(user_id = response.user.id, ?venue_id, "Venue account created");
        self.store.merge(VenuePatch {
            token: Some(Some(response.token)),
            user_id: Some(Some(response.user.id)),
            venue_id: Some(venue_id),
            ..Default::default()
        });
        self.store.read().credentials().map(Some)
    }

    async fn upload_slot(
        &mut self,
        slot: MediaSlotKind,
        token: &str,
        lease: &StepLease,
    ) -> AppResult<Option<i64>> {
        let (media, image_type) = match slot {
            MediaSlotKind::Cover => (&self.store.read().cover, ImageType::VenueCover),
            _ => (&self.store.read().logo, ImageType::VenueLogo),
        };
        let file = match (&media.file, media.remote_id) {
            (Some(file), None) => file.clone(),
            (_, remote_id) => return Ok(remote_id),
        };

        let uploaded = self
            .api
            .upload_image(&file, image_type, token)
            .await
            .inspect_err(|e| tracing::error!(%slot, error = %e, "Venue image upload failed"))?;
        if stale(lease, "submit_profile") {
            return Ok(None);
        }
        let patch = match slot {
            MediaSlotKind::Cover => VenuePatch {
                cover_id: Some(Some(uploaded.id)),
                ..Default::default()
            },
            _ => VenuePatch {
                logo_id: Some(Some(uploaded.id)),
                ..Default::default()
            },
        };
        self.store.merge(patch);
        Ok(Some(uploaded.id))
    }

    /// Create the venue with its details, then upload and attach logo and cover.
    ///
    /// Re-submitting after a partial failure reuses the account created earlier.
    pub async fn submit_profile(&mut self, details: VenueDetails) -> AppResult<StepOutcome> {
        details.validate()?;
        if !self.store.read().has_signup() {
            return Err(AppError::MissingCredentials(
                "venue registration has no name, email or password".to_string(),
            ));
        }
        let lease = self.liveness.begin();

        let mut candidate = self.store.snapshot();
        candidate.city = details.city.trim().to_string();
        candidate.street = details.street.trim().to_string();
        let street_address = candidate.street_address();

        let existing = self.store.read().credentials().ok();
        let credentials = match existing.clone() {
            Some(credentials) => credentials,
            None => match self.register(&details, street_address.clone(), &lease).await? {
                Some(credentials) => credentials,
                None => return Ok(StepOutcome::Abandoned),
            },
        };

        let logo_id = self
            .upload_slot(MediaSlotKind::Logo, &credentials.token, &lease)
            .await?;
        let cover_id = self
            .upload_slot(MediaSlotKind::Cover, &credentials.token, &lease)
            .await?;
        if stale(&lease, "submit_profile") {
            return Ok(StepOutcome::Abandoned);
        }

        let mut request = UpdateVenueRequest {
            logo_id,
            cover_photo_id: cover_id,
            ..Default::default()
        };
        if existing.is_some() {
            request.description = non_empty(&details.description);
            request.street_address = street_address;
            request.phone = details.phone();
            request.work_email = details.work_email();
            request.tg_personal_link = details.telegram_personal();
        }
        if existing.is_some() || logo_id.is_some() || cover_id.is_some() {
            self.api
                .update_venue_profile(credentials.user_id, &request, &credentials.token)
                .await
                .inspect_err(|e| tracing::error!(error = %e, "Venue profile update failed"))?;
            if stale(&lease, "submit_profile") {
                return Ok(StepOutcome::Abandoned);
            }
        }

        self.store.merge(VenuePatch {
            description: Some(details.description.trim().to_string()),
            city: Some(candidate.city),
            street: Some(candidate.street),
            phone: Some(details.phone.trim().to_string()),
            work_email: Some(details.work_email.trim().to_string()),
            telegram_personal: Some(details.telegram_personal.trim().to_string()),
            event_formats: (!details.event_formats.is_empty()).then_some(details.event_formats),
            ..Default::default()
        });
        tracing::info!(user_id = credentials.user_id, "Venue profile saved");
        Ok(StepOutcome::Advanced)
    }

    /// Record event formats and save social links per the late-write policy.
    pub async fn submit_social_links(
        &mut self,
        event_formats: Vec<String>,
        links: SocialLinks,
    ) -> AppResult<StepOutcome> {
        let credentials = self.store.read().credentials()?;
        validate_event_formats(&event_formats)?;
        let links = links.trimmed();
        let lease = self.liveness.begin();

        let result = self
            .api
            .update_venue_profile(
                credentials.user_id,
                &UpdateVenueRequest::social(&links),
                &credentials.token,
            )
            .await;
        if stale(&lease, "submit_social_links") {
            return Ok(StepOutcome::Abandoned);
        }

        let mut patch = VenuePatch::social(&links);
        patch.event_formats = Some(event_formats);
        self.store.merge(patch);
        late_write_outcome(self.policy, "submit_social_links", result)
    }

    pub fn skip_social_links(&mut self) -> StepOutcome {
        self.liveness.invalidate();
        StepOutcome::Advanced
    }

    /// Log the new venue in, then discard the draft.
    pub async fn complete<S: IdentityStorage>(
        &mut self,
        identity: &mut IdentityStore<S>,
    ) -> AppResult<AuthenticatedIdentity> {
        let authenticated = AuthenticatedIdentity::from_venue_draft(self.store.read())?;
        identity.login(authenticated.clone()).await?;
        self.teardown();
        tracing::info!(user_id = authenticated.user.id, "Venue registration completed");
        Ok(authenticated)
    }

    pub fn restart(&mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        self.liveness.invalidate();
        self.previews.release_all();
        self.store.reset();
    }
}
