//! Local preview handles for images picked but not yet uploaded.
//!
//! A preview URL is a process-local handle to bytes held in memory. It has no
//! meaning outside this process. The registry tracks at most one outstanding
//! handle per media slot: picking a new file for a slot releases the previous
//! handle, and dropping the registry (view teardown) releases everything.

use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const PREVIEW_SCHEME: &str = "preview://";

/// Image slot of a registration draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaSlotKind {
    Avatar,
    Logo,
    Cover,
}

impl fmt::Display for MediaSlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaSlotKind::Avatar => f.write_str("avatar"),
            MediaSlotKind::Logo => f.write_str("logo"),
            MediaSlotKind::Cover => f.write_str("cover"),
        }
    }
}

/// Opaque `preview://<uuid>` handle
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PreviewUrl(String);

impl PreviewUrl {
    fn generate() -> Self {
        PreviewUrl(format!("{}{}", PREVIEW_SCHEME, Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PreviewUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug)]
struct PreviewEntry {
    slot: MediaSlotKind,
    content_type: String,
    bytes: Bytes,
}

/// Owner of all outstanding preview handles of one view
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    entries: HashMap<PreviewUrl, PreviewEntry>,
    by_slot: HashMap<MediaSlotKind, PreviewUrl>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a preview for `slot`, releasing the handle it supersedes.
    pub fn select(
        &mut self,
        slot: MediaSlotKind,
        content_type: impl Into<String>,
        bytes: Bytes,
    ) -> PreviewUrl {
        self.release(slot);

        let url = PreviewUrl::generate();
        tracing::debug!(%slot, preview = %url, size = bytes.len(), "Preview created");
        self.entries.insert(
            url.clone(),
            PreviewEntry {
                slot,
                content_type: content_type.into(),
                bytes,
            },
        );
        self.by_slot.insert(slot, url.clone());
        url
    }

    /// Release the outstanding handle of `slot`. Returns whether one was released.
    pub fn release(&mut self, slot: MediaSlotKind) -> bool {
        match self.by_slot.remove(&slot) {
            Some(url) => {
                self.entries.remove(&url);
                tracing::debug!(%slot, preview = %url, "Preview released");
                true
            }
            None => false,
        }
    }

    /// Release every outstanding handle.
    pub fn release_all(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        self.by_slot.clear();
        if count > 0 {
            tracing::debug!(count, "Released all previews");
        }
    }

    /// Bytes and content type behind a handle, if it is still outstanding.
    pub fn resolve(&self, url: &PreviewUrl) -> Option<(&str, &Bytes)> {
        self.entries
            .get(url)
            .map(|e| (e.content_type.as_str(), &e.bytes))
    }

    /// Current handle of a slot.
    pub fn current(&self, slot: MediaSlotKind) -> Option<&PreviewUrl> {
        self.by_slot.get(&slot)
    }

    /// Slot a handle belongs to, if it is still outstanding.
    pub fn slot_of(&self, url: &PreviewUrl) -> Option<MediaSlotKind> {
        self.entries.get(url).map(|e| e.slot)
    }

    /// Number of outstanding handles.
    pub fn outstanding(&self) -> usize {
        self.entries.len()
    }
}

impl Drop for PreviewRegistry {
    fn drop(&mut self) {
        self.release_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selecting_again_releases_superseded_handle() {
        let mut registry = PreviewRegistry::new();
        let first = registry.select(MediaSlotKind::Avatar, "image/png", Bytes::from_static(b"a"));
        let second = registry.select(MediaSlotKind::Avatar, "image/png", Bytes::from_static(b"b"));

        assert_ne!(first, second);
        assert!(registry.resolve(&first).is_none());
        assert_eq!(registry.resolve(&second).unwrap().1.as_ref(), b"b");
        assert_eq!(registry.outstanding(), 1);
        assert!(second.as_str().starts_with("preview://"));
    }

    #[test]
    fn slots_are_tracked_independently() {
        let mut registry = PreviewRegistry::new();
        let logo = registry.select(MediaSlotKind::Logo, "image/png", Bytes::from_static(b"l"));
        let cover = registry.select(MediaSlotKind::Cover, "image/jpeg", Bytes::from_static(b"c"));
        assert_eq!(registry.outstanding(), 2);

        assert!(registry.release(MediaSlotKind::Logo));
        assert!(!registry.release(MediaSlotKind::Logo));
        assert!(registry.resolve(&logo).is_none());
        assert_eq!(registry.slot_of(&cover), Some(MediaSlotKind::Cover));
        assert_eq!(registry.current(MediaSlotKind::Cover), Some(&cover));
    }

    #[test]
    fn release_all_clears_everything() {
        let mut registry = PreviewRegistry::new();
        registry.select(MediaSlotKind::Logo, "image/png", Bytes::from_static(b"l"));
        registry.select(MediaSlotKind::Cover, "image/png", Bytes::from_static(b"c"));
        registry.release_all();
        assert_eq!(registry.outstanding(), 0);
        assert!(registry.current(MediaSlotKind::Logo).is_none());
    }
}
