//! Build facts handed over by the CI system once a build has finished

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::placeholder::Placeholders;

/// Outcome of a build, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildResult {
    #[serde(alias = "SUCCESS")]
    Success,
    #[serde(alias = "UNSTABLE")]
    Unstable,
    #[serde(alias = "FAILURE")]
    Failure,
    #[serde(alias = "NOT_BUILT")]
    NotBuilt,
    #[serde(alias = "ABORTED")]
    Aborted,
}

impl BuildResult {
    /// Lower-case name used on the wire and in the `{build-result}` placeholder
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildResult::Success => "success",
            BuildResult::Unstable => "unstable",
            BuildResult::Failure => "failure",
            BuildResult::NotBuilt => "not_built",
            BuildResult::Aborted => "aborted",
        }
    }

    pub fn is_better_or_equal_to(self, other: BuildResult) -> bool {
        self <= other
    }

    pub fn is_worse_than(self, other: BuildResult) -> bool {
        self > other
    }

    /// Whether the build ran to completion. Not-built and aborted builds don't notify.
    pub fn is_complete_build(self) -> bool {
        self <= BuildResult::Failure
    }
}

impl std::fmt::Display for BuildResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single change-set entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommitRecord {
    /// Full commit id
    pub id: String,
    /// Link to the commit in a repository browser, when the CI system knows one
    #[serde(default)]
    pub url: Option<String>,
    pub author_id: String,
    pub author_name: String,
    pub message: String,
}

impl CommitRecord {
    /// First seven characters of the commit id
    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(7) {
            Some((idx, _)) => &self.id[..idx],
            None => &self.id,
        }
    }
}

/// Read-only snapshot of a finished build
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildContext {
    pub build_id: String,
    pub result: BuildResult,
    pub project_name: String,
    #[serde(default)]
    pub project_description: Option<String>,
    pub completed_at: DateTime<Utc>,
    #[serde(default)]
    pub commits: Vec<CommitRecord>,
}

impl BuildContext {
    /// ISO-8601 instant, `Z` suffixed, fractional seconds only when present
    pub fn timestamp(&self) -> String {
        self.completed_at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    pub fn epoch_seconds(&self) -> i64 {
        self.completed_at.timestamp()
    }

    pub fn epoch_millis(&self) -> i64 {
        self.completed_at.timestamp_millis()
    }

    /// Build-level placeholder values, in substitution order
    pub fn placeholders(&self) -> Placeholders {
        Placeholders::new()
            .with("build-number", self.build_id.as_str())
            .with("build-result", self.result.as_str())
            .with("project-name", self.project_name.as_str())
            .with(
                "project-desc",
                self.project_description.as_deref().unwrap_or_default(),
            )
            .with("timestamp", self.timestamp())
            .with("epoch-seconds", self.epoch_seconds().to_string())
            .with("epoch-millis", self.epoch_millis().to_string())
    }
}
