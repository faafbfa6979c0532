//! Configuration module
//!
//! Client configuration read from the environment: backend origin, HTTP timeout,
//! where the logged-in identity is persisted, catalog paging and the policy for
//! late optional writes in the registration wizards.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_API_URL: &str = "http://localhost:8080";
const HTTP_TIMEOUT_SECS: u64 = 60;
const PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;
const IDENTITY_FILE: &str = ".meetspace/identity.json";

/// What a wizard does when a late, optional write (social links) fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LateWritePolicy {
    /// Keep the user moving: the step advances and reports a degraded outcome.
    #[default]
    BestEffort,
    /// Treat the failure like any critical write: the step does not advance.
    Blocking,
}

impl FromStr for LateWritePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "best-effort" | "best_effort" | "besteffort" => Ok(LateWritePolicy::BestEffort),
            "blocking" | "block" => Ok(LateWritePolicy::Blocking),
            other => Err(format!(
                "Unknown late write policy '{}'. Use best-effort or blocking",
                other
            )),
        }
    }
}

/// Client configuration
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: String,
    pub http_timeout_secs: u64,
    pub identity_path: PathBuf,
    pub page_size: u32,
    pub late_write_policy: LateWritePolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            http_timeout_secs: HTTP_TIMEOUT_SECS,
            identity_path: default_identity_path(),
            page_size: PAGE_SIZE,
            late_write_policy: LateWritePolicy::default(),
        }
    }
}

fn default_identity_path() -> PathBuf {
    match env::var("HOME") {
        Ok(home) if !home.is_empty() => PathBuf::from(home).join(IDENTITY_FILE),
        _ => PathBuf::from(IDENTITY_FILE),
    }
}

impl ClientConfig {
    /// Read configuration from the environment.
    ///
    /// MEETSPACE_API_URL (or API_URL), MEETSPACE_HTTP_TIMEOUT_SECS, MEETSPACE_IDENTITY_PATH,
    /// MEETSPACE_PAGE_SIZE and MEETSPACE_LATE_WRITE_POLICY. Unset values fall back to defaults.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let late_write_policy = match env::var("MEETSPACE_LATE_WRITE_POLICY") {
            Ok(raw) => raw.parse().map_err(|e: String| anyhow::anyhow!(e))?,
            Err(_) => LateWritePolicy::default(),
        };

        let config = ClientConfig {
            api_url: env::var("MEETSPACE_API_URL")
                .or_else(|_| env::var("API_URL"))
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            http_timeout_secs: env::var("MEETSPACE_HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| HTTP_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(HTTP_TIMEOUT_SECS),
            identity_path: env::var("MEETSPACE_IDENTITY_PATH")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(default_identity_path),
            page_size: env::var("MEETSPACE_PAGE_SIZE")
                .unwrap_or_else(|_| PAGE_SIZE.to_string())
                .parse()
                .unwrap_or(PAGE_SIZE),
            late_write_policy,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "MEETSPACE_API_URL must start with http:// or https://"
            ));
        }

        if self.http_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "MEETSPACE_HTTP_TIMEOUT_SECS must be greater than zero"
            ));
        }

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(anyhow::anyhow!(
                "MEETSPACE_PAGE_SIZE must be between 1 and {}",
                MAX_PAGE_SIZE
            ));
        }

        Ok(())
    }
}
