//! Meetspace Core Library
//!
//! This crate provides the domain models, error types, configuration, validation
//! and client-side state (registration drafts, preview handles, the logged-in
//! identity) shared across all Meetspace components.

pub mod config;
pub mod error;
pub mod identity;
pub mod models;
pub mod preview;
pub mod registration;
pub mod validation;

// Re-export commonly used types
pub use config::{ClientConfig, LateWritePolicy};
pub use error::{AppError, AppResult, ErrorMetadata, LogLevel};
pub use identity::{
    AuthenticatedIdentity, FileIdentityStorage, IdentityStorage, IdentityStore,
    MemoryIdentityStorage, UserSummary,
};
pub use preview::{MediaSlotKind, PreviewRegistry, PreviewUrl};
pub use registration::{
    CreatorDraft, CreatorPatch, Credentials, Draft, MediaSlot, Password, RegistrationStore,
    SelectedFile, VenueDraft, VenuePatch, DEFAULT_CITY, EVENT_FORMATS,
};
pub use validation::{
    validate_event_formats, LoginForm, ProfileDetails, SignupForm, VenueDetails,
};
