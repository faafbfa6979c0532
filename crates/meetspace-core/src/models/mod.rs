//! Data models for the client
//!
//! Request and response shapes of the backend REST API, organized by domain.
//! Field names follow the backend's snake_case JSON.

mod auth;
mod creator;
mod event;
mod media;
mod page;
mod social;
mod venue;

// Re-export all models for convenient imports
pub use auth::*;
pub use creator::*;
pub use event::*;
pub use media::*;
pub use page::*;
pub use social::*;
pub use venue::*;
