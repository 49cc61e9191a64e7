pub mod api;
pub mod build;
pub mod commits;
pub mod embed;
pub mod error;
pub mod logging;
pub mod notifier;
pub mod payload;
pub mod placeholder;
pub mod utils;
pub mod webhook;

use chrono::{DateTime, Utc};
use error::NotifyError;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

pub const DEFAULT_TITLE_TEXT: &str = "{project-name} #{build-number} {build-result}";
pub const DEFAULT_COMMIT_HEADER: &str = "[`{commit-hash}`]({commit-url}) {author-fullname}";
pub const DEFAULT_COMMIT_HEADER_FALLBACK: &str = "`{commit-hash}` {author-fullname}";
pub const DEFAULT_COMMIT_BODY: &str = "{commit-message}";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct NotifierConfig {
    #[serde(default)]
    pub project: Vec<ProjectConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(flatten)]
    pub notification: NotificationConfig,
    pub with_event_secret: Option<bool>,
    pub event_secret: Option<String>,
}

impl ProjectConfig {
    /// Returns true if inbound build events must carry a valid signature.
    pub fn needs_event_secret(&self) -> bool {
        self.with_event_secret.unwrap_or(false)
    }

    /// Returns true if a valid (non-empty) event_secret is set.
    pub fn has_valid_secret(&self) -> bool {
        self.event_secret
            .as_ref()
            .map(|s| !s.is_empty())
            .unwrap_or(false)
    }
}

/// How a project's builds are announced. Empty strings behave like unset values.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct NotificationConfig {
    /// Blank disables notifications for the project
    pub webhook_url: String,
    pub username: Option<String>,
    pub avatar: Option<String>,
    pub title_text: Option<String>,
    pub title_icon: Option<String>,
    pub description: Option<String>,
    pub show_commits: bool,
    pub commit_header: String,
    pub commit_header_fallback: String,
    pub commit_body: String,
    /// URL template for commits the CI system didn't link itself
    pub commit_browser: Option<String>,
    pub footer_text: Option<String>,
    pub footer_icon: Option<String>,
    pub footer_timestamp: bool,
    pub thumbnail: Option<String>,
    pub image: Option<String>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            username: None,
            avatar: None,
            title_text: Some(DEFAULT_TITLE_TEXT.to_string()),
            title_icon: None,
            description: None,
            show_commits: true,
            commit_header: DEFAULT_COMMIT_HEADER.to_string(),
            commit_header_fallback: DEFAULT_COMMIT_HEADER_FALLBACK.to_string(),
            commit_body: DEFAULT_COMMIT_BODY.to_string(),
            commit_browser: None,
            footer_text: None,
            footer_icon: None,
            footer_timestamp: false,
            thumbnail: None,
            image: None,
        }
    }
}

/// Parse the configuration from TOML text
pub fn parse_config(config_str: &str) -> Result<NotifierConfig, NotifyError> {
    let config: NotifierConfig = toml::from_str(config_str)?;
    for (idx, project) in config.project.iter().enumerate() {
        if config.project[..idx].iter().any(|p| p.name == project.name) {
            return Err(NotifyError::ConfigError(format!(
                "Duplicate project name '{}'",
                project.name
            )));
        }
    }
    Ok(config)
}

/// Load and parse the configuration file
pub fn load_config(path: impl AsRef<Path>) -> Result<NotifierConfig, NotifyError> {
    let path = path.as_ref();
    let config_str = std::fs::read_to_string(path).map_err(|e| {
        NotifyError::ConfigError(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&config_str).map_err(|e| {
        NotifyError::ConfigError(format!(
            "Failed to parse config file '{}': {}",
            path.display(),
            e
        ))
    })
}

pub struct AppState {
    pub config: NotifierConfig,
    pub start_time: Instant,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: NotifierConfig) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            started_at: Utc::now(),
        }
    }
}

pub type SharedState = Arc<AppState>;

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
[[project]]
name = "demo"
webhook_url = "https://discord.com/api/webhooks/1/abc"
username = "CI"
description = "{project-desc}"
show_commits = false
commit_browser = "https://github.com/org/demo/commit/{commit-longhash}"
footer_timestamp = true

[[project]]
name = "quiet"
with_event_secret = true
event_secret = "s3cret"
"#;

    #[test]
    fn parses_projects_with_defaults() {
        let config = parse_config(CONFIG).unwrap();
        assert_eq!(config.project.len(), 2);

        let demo = &config.project[0].notification;
        assert_eq!(demo.username.as_deref(), Some("CI"));
        assert!(!demo.show_commits);
        assert!(demo.footer_timestamp);
        assert_eq!(demo.commit_header, DEFAULT_COMMIT_HEADER);
        assert_eq!(demo.title_text.as_deref(), Some(DEFAULT_TITLE_TEXT));

        let quiet = &config.project[1];
        assert!(quiet.notification.webhook_url.is_empty());
        assert!(quiet.notification.show_commits);
        assert!(quiet.needs_event_secret());
        assert!(quiet.has_valid_secret());
        assert!(!config.project[0].needs_event_secret());
    }

    #[test]
    fn rejects_duplicate_projects() {
        let err = parse_config("[[project]]\nname = \"a\"\n[[project]]\nname = \"a\"\n").unwrap_err();
        assert!(matches!(err, NotifyError::ConfigError(_)));
    }

    #[test]
    fn empty_config_has_no_projects() {
        assert!(parse_config("").unwrap().project.is_empty());
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = load_config("/nonexistent/notifier_config.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
