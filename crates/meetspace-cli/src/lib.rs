use std::path::PathBuf;

use meetspace_core::models::normalize_link;
use meetspace_core::{AppError, ClientConfig, ErrorMetadata, FileIdentityStorage};

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Render an optional cell, `-` when absent.
pub fn cell(value: Option<&str>, max_len: usize) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => truncate_string(v, max_len),
        None => "-".to_string(),
    }
}

/// `Label:` rows for the filled-in social links, made absolute for display.
pub fn link_rows(links: &[(&str, Option<&str>)]) -> Vec<String> {
    links
        .iter()
        .filter_map(|(label, link)| {
            let url = (*link).and_then(normalize_link)?;
            Some(format!("{:<13}{}", format!("{}:", label), url))
        })
        .collect()
}

/// Identity file of the CLI, overridable per invocation.
pub fn identity_storage(config: &ClientConfig, path: Option<PathBuf>) -> FileIdentityStorage {
    FileIdentityStorage::new(path.unwrap_or_else(|| config.identity_path.clone()))
}

/// What a failed command prints: the user-facing message of the first
/// `AppError` in the chain and its suggested action, or the plain chain.
pub fn error_report(err: &anyhow::Error) -> String {
    let Some(app) = err.chain().find_map(|cause| cause.downcast_ref::<AppError>()) else {
        return format!("error: {:#}", err);
    };
    let mut report = format!("error: {}", app.client_message());
    if let Some(action) = app.suggested_action() {
        report.push_str("\nhint: ");
        report.push_str(action);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_string_short() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("", 5), "");
    }

    #[test]
    fn truncate_string_exact() {
        assert_eq!(truncate_string("hello", 5), "hello");
    }

    #[test]
    fn truncate_string_long() {
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("abc", 2), "...");
    }

    #[test]
    fn truncate_string_counts_chars() {
        assert_eq!(truncate_string("Креатор", 7), "Креатор");
        assert_eq!(truncate_string("Креативное пространство", 8), "Креат...");
    }

    #[test]
    fn cell_placeholder() {
        assert_eq!(cell(None, 10), "-");
        assert_eq!(cell(Some("  "), 10), "-");
        assert_eq!(cell(Some("Loft"), 10), "Loft");
    }

    #[test]
    fn error_report_uses_client_message_and_hint() {
        let err = anyhow::Error::new(AppError::Api {
            status: 401,
            body: "expired".to_string(),
        })
        .context("Failed to load profile");
        let report = error_report(&err);
        assert!(report.starts_with("error: Your session is not authorized"));
        assert!(report.ends_with("hint: Log in again"));

        let plain = anyhow::anyhow!("Not logged in");
        assert_eq!(error_report(&plain), "error: Not logged in");
    }

    #[test]
    fn link_rows_skip_empty_and_add_scheme() {
        let rows = link_rows(&[
            ("Telegram", Some("t.me/cafe")),
            ("VK", Some("  ")),
            ("YouTube", None),
            ("Dzen", Some("https://dzen.ru/cafe")),
        ]);
        assert_eq!(
            rows,
            vec![
                "Telegram:    https://t.me/cafe".to_string(),
                "Dzen:        https://dzen.ru/cafe".to_string(),
            ]
        );
    }

    #[test]
    fn identity_path_override() {
        let config = ClientConfig::default();
        let storage = identity_storage(&config, Some(PathBuf::from("/tmp/id.json")));
        assert_eq!(storage.path(), std::path::Path::new("/tmp/id.json"));
        assert_eq!(
            identity_storage(&config, None).path(),
            config.identity_path.as_path()
        );
    }
}

/// Initialize tracing for the CLI.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
