//! Meetspace Services Layer
//!
//! This crate hosts the client workflows: the creator and venue onboarding
//! wizards, the identity handoff at the end of a wizard, and the catalog and
//! profile readers. Front ends (the CLI) drive these and keep HTTP details in
//! meetspace-api-client.

pub mod catalog;
pub mod creator_flow;
pub mod liveness;
pub mod media;
pub mod outcome;
pub mod profiles;
pub mod venue_flow;

pub use catalog::{
    Catalog, EventQuery, EVENTS_PAGE_SIZE, FALLBACK_CREATOR_NAME, VENUES_PAGE_SIZE,
};
pub use creator_flow::CreatorFlow;
pub use liveness::{Liveness, StepLease};
pub use media::{image_content_type, read_image_file};
pub use meetspace_core::LateWritePolicy;
pub use outcome::StepOutcome;
pub use profiles::{CreatorProfileView, ProfileView, Profiles, VenueProfileView};
pub use venue_flow::VenueFlow;
