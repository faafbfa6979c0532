use serde::{Deserialize, Serialize};

/// Social network links collected on the last wizard step and shown on profiles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    pub telegram_channel: String,
    pub vk: String,
    pub tiktok: String,
    pub youtube: String,
    pub dzen: String,
}

impl SocialLinks {
    /// Trim every link.
    pub fn trimmed(&self) -> Self {
        Self {
            telegram_channel: self.telegram_channel.trim().to_string(),
            vk: self.vk.trim().to_string(),
            tiktok: self.tiktok.trim().to_string(),
            youtube: self.youtube.trim().to_string(),
            dzen: self.dzen.trim().to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        [
            &self.telegram_channel,
            &self.vk,
            &self.tiktok,
            &self.youtube,
            &self.dzen,
        ]
        .iter()
        .all(|s| s.trim().is_empty())
    }
}

/// Make a user-entered link absolute for display (`vk.com/x` -> `https://vk.com/x`).
pub fn normalize_link(link: &str) -> Option<String> {
    let link = link.trim();
    if link.is_empty() {
        None
    } else if link.starts_with("http") {
        Some(link.to_string())
    } else {
        Some(format!("https://{}", link))
    }
}
