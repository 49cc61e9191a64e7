//! Turns a finished build into a Discord payload and delivers it

use tracing::{error, info, warn};

use crate::NotificationConfig;
use crate::build::{BuildContext, BuildResult};
use crate::commits::{ChangeSetBrowser, CommitFieldBuilder, UrlTemplateBrowser};
use crate::embed::{Embed, Image};
use crate::error::NotifyError;
use crate::payload::Payload;
use crate::placeholder::substitute;
use crate::webhook::WebhookClient;

pub const COLOR_SUCCESS: u32 = 0x19A719;
pub const COLOR_UNSTABLE: u32 = 0xFFFF0A;
pub const COLOR_FAILURE: u32 = 0xAC1A17;

type ColorRule = (fn(BuildResult) -> bool, u32);

/// Checked in order, first match wins. Anything worse than success already matches
/// the second rule, so the failure color is never reached; kept that way so the
/// colors existing channels see don't change.
const COLOR_RULES: [ColorRule; 3] = [
    (|r: BuildResult| r.is_better_or_equal_to(BuildResult::Success), COLOR_SUCCESS),
    (|r: BuildResult| r.is_worse_than(BuildResult::Success), COLOR_UNSTABLE),
    (|r: BuildResult| r.is_worse_than(BuildResult::Unstable), COLOR_FAILURE),
];

pub fn result_color(result: BuildResult) -> Option<u32> {
    COLOR_RULES
        .iter()
        .find(|(matches, _)| matches(result))
        .map(|(_, color)| *color)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Assembles the payload for one build from a project's templates
pub struct NotificationBuilder<'a> {
    config: &'a NotificationConfig,
}

impl<'a> NotificationBuilder<'a> {
    pub fn new(config: &'a NotificationConfig) -> Self {
        Self { config }
    }

    pub fn build_payload(&self, ctx: &BuildContext) -> Payload {
        let config = self.config;
        let values = ctx.placeholders();
        let mut embed = Embed {
            color: result_color(ctx.result),
            ..Embed::default()
        };

        if let Some(icon) = non_empty(&config.title_icon) {
            embed.author.icon_url = Some(icon.to_string());
        }
        if let Some(title) = non_empty(&config.title_text) {
            embed.author.name = Some(substitute(title, &values));
        }
        if let Some(thumbnail) = non_empty(&config.thumbnail) {
            embed.thumbnail = Image::new(thumbnail);
        }
        if let Some(description) = non_empty(&config.description) {
            embed.description = Some(substitute(description, &values));
        }
        if let Some(image) = non_empty(&config.image) {
            embed.image = Image::new(image);
        }
        if let Some(icon) = non_empty(&config.footer_icon) {
            embed.footer.icon_url = Some(icon.to_string());
        }
        if let Some(text) = non_empty(&config.footer_text) {
            embed.footer.text = Some(substitute(text, &values));
        }
        if config.footer_timestamp {
            embed.timestamp = Some(ctx.timestamp());
        }

        if config.show_commits {
            let browser = config
                .commit_browser
                .as_deref()
                .and_then(UrlTemplateBrowser::new);
            let commits = CommitFieldBuilder {
                header: &config.commit_header,
                fallback_header: &config.commit_header_fallback,
                body: &config.commit_body,
                browser: browser.as_ref().map(|b| b as &dyn ChangeSetBrowser),
            };
            embed.fields = commits.build_fields(&ctx.commits);
        }

        Payload {
            username: non_empty(&config.username).map(str::to_string),
            avatar_url: non_empty(&config.avatar).map(str::to_string),
            embed,
            ..Payload::default()
        }
    }
}

/// What happened to a build's notification. Never affects the build itself.
#[derive(Debug)]
pub enum NotificationOutcome {
    /// No webhook URL configured
    Disabled,
    /// The build didn't complete (not built, aborted)
    Skipped(BuildResult),
    Sent,
    Failed(NotifyError),
}

impl NotificationOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationOutcome::Disabled => "disabled",
            NotificationOutcome::Skipped(_) => "skipped",
            NotificationOutcome::Sent => "sent",
            NotificationOutcome::Failed(_) => "failed",
        }
    }

    pub fn error(&self) -> Option<&NotifyError> {
        match self {
            NotificationOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Runs a project's notification for one finished build.
///
/// Blocks the calling thread for the duration of the HTTP request. Failures are
/// logged and returned as [`NotificationOutcome::Failed`], never propagated.
pub fn perform(config: &NotificationConfig, ctx: &BuildContext) -> NotificationOutcome {
    if !ctx.result.is_complete_build() {
        info!(
            project = %ctx.project_name,
            build = %ctx.build_id,
            result = %ctx.result,
            "Build did not complete, not notifying"
        );
        return NotificationOutcome::Skipped(ctx.result);
    }

    if config.webhook_url.trim().is_empty() {
        warn!(project = %ctx.project_name, "No webhook URL configured, notifications disabled");
        return NotificationOutcome::Disabled;
    }

    let payload = NotificationBuilder::new(config).build_payload(ctx);

    info!(
        project = %ctx.project_name,
        build = %ctx.build_id,
        "Sending notification to Discord"
    );
    let result = WebhookClient::new(&config.webhook_url).and_then(|client| client.send(&payload));

    match result {
        Ok(()) => NotificationOutcome::Sent,
        Err(e) => {
            error!(
                project = %ctx.project_name,
                build = %ctx.build_id,
                error = %e,
                "Discord notification failed"
            );
            NotificationOutcome::Failed(e)
        }
    }
}
