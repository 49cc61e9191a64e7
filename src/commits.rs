//! One embed field per commit in the build's change set

use tracing::debug;

use crate::build::CommitRecord;
use crate::embed::Field;
use crate::placeholder::{Placeholders, substitute};

/// Field emitted in place of the commit list when a build has no changes
pub const NO_CHANGES: &str = "*No Changes*\n";

/// Resolves a browsable link for a commit
pub trait ChangeSetBrowser {
    fn changeset_link(&self, commit: &CommitRecord) -> Option<String>;
}

/// Browser driven by a URL template such as
/// `https://github.com/org/repo/commit/{commit-longhash}`
#[derive(Debug, Clone)]
pub struct UrlTemplateBrowser {
    template: String,
}

impl UrlTemplateBrowser {
    /// Returns `None` for a blank template
    pub fn new(template: impl Into<String>) -> Option<Self> {
        let template = template.into();
        if template.trim().is_empty() {
            None
        } else {
            Some(Self { template })
        }
    }
}

impl ChangeSetBrowser for UrlTemplateBrowser {
    fn changeset_link(&self, commit: &CommitRecord) -> Option<String> {
        let values = Placeholders::new()
            .with("commit-hash", commit.short_id())
            .with("commit-longhash", commit.id.as_str());
        let url = substitute(&self.template, &values);
        (!url.trim().is_empty()).then_some(url)
    }
}

/// The commit's own link if it has one, otherwise whatever the browser resolves
pub fn resolve_commit_url(
    commit: &CommitRecord,
    browser: Option<&dyn ChangeSetBrowser>,
) -> Option<String> {
    commit
        .url
        .as_deref()
        .filter(|url| !url.trim().is_empty())
        .map(str::to_string)
        .or_else(|| browser.and_then(|b| b.changeset_link(commit)))
}

/// Renders commit fields from header/body templates
pub struct CommitFieldBuilder<'a> {
    pub header: &'a str,
    pub fallback_header: &'a str,
    pub body: &'a str,
    pub browser: Option<&'a dyn ChangeSetBrowser>,
}

impl<'a> CommitFieldBuilder<'a> {
    /// Per-commit placeholder values, in substitution order
    pub fn placeholders(commit: &CommitRecord, url: &str) -> Placeholders {
        Placeholders::new()
            .with("commit-hash", commit.short_id())
            .with("commit-longhash", commit.id.as_str())
            .with("commit-url", url)
            .with("author-username", commit.author_id.as_str())
            .with("author-fullname", commit.author_name.as_str())
            .with("commit-message", commit.message.trim())
    }

    pub fn build_field(&self, commit: &CommitRecord) -> Field {
        let (header, url) = match resolve_commit_url(commit, self.browser) {
            Some(url) => (self.header, url),
            None => {
                debug!(commit = %commit.id, "No change set link, using fallback header");
                (self.fallback_header, String::new())
            }
        };
        let values = Self::placeholders(commit, &url);
        Field::new(substitute(header, &values), substitute(self.body, &values))
    }

    /// One field per commit, or a single "no changes" field for an empty list
    pub fn build_fields(&self, commits: &[CommitRecord]) -> Vec<Field> {
        if commits.is_empty() {
            return vec![Field::unnamed(NO_CHANGES)];
        }
        commits.iter().map(|c| self.build_field(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn commit(url: Option<&str>) -> CommitRecord {
        CommitRecord {
            id: "0123456789abcdef".to_string(),
            url: url.map(str::to_string),
            author_id: "jdoe".to_string(),
            author_name: "Jane Doe".to_string(),
            message: "  Fix flaky test\n".to_string(),
        }
    }

    fn builder(browser: Option<&dyn ChangeSetBrowser>) -> CommitFieldBuilder<'_> {
        CommitFieldBuilder {
            header: "[`{commit-hash}`]({commit-url})",
            fallback_header: "`{commit-hash}`",
            body: "{commit-message} - {author-fullname} ({author-username})",
            browser,
        }
    }

    #[test]
    fn linked_commit_uses_primary_header() {
        let field = builder(None).build_field(&commit(Some("https://git.example.com/c/0123456")));
        assert_eq!(
            field.name.as_deref(),
            Some("[`0123456`](https://git.example.com/c/0123456)")
        );
        assert_eq!(
            field.value.as_deref(),
            Some("Fix flaky test - Jane Doe (jdoe)")
        );
    }

    #[test]
    fn unresolvable_commit_falls_back() {
        let field = builder(None).build_field(&commit(None));
        assert_eq!(field.name.as_deref(), Some("`0123456`"));
    }

    #[test]
    fn blank_url_counts_as_missing() {
        let field = builder(None).build_field(&commit(Some("  ")));
        assert_eq!(field.name.as_deref(), Some("`0123456`"));
    }

    #[test]
    fn fallback_sees_empty_commit_url() {
        let b = CommitFieldBuilder {
            header: "{commit-url}",
            fallback_header: "<{commit-url}>",
            body: "{commit-longhash}",
            browser: None,
        };
        let field = b.build_field(&commit(None));
        assert_eq!(field.name.as_deref(), Some("<>"));
        assert_eq!(field.value.as_deref(), Some("0123456789abcdef"));
    }

    #[test]
    fn browser_template_resolves_link() {
        let browser =
            UrlTemplateBrowser::new("https://github.com/org/repo/commit/{commit-longhash}").unwrap();
        let field = builder(Some(&browser)).build_field(&commit(None));
        assert_eq!(
            field.name.as_deref(),
            Some("[`0123456`](https://github.com/org/repo/commit/0123456789abcdef)")
        );
    }

    #[test]
    fn record_url_wins_over_browser() {
        let browser = UrlTemplateBrowser::new("https://other/{commit-hash}").unwrap();
        let url = resolve_commit_url(&commit(Some("https://mine")), Some(&browser));
        assert_eq!(url.as_deref(), Some("https://mine"));
    }

    #[test]
    fn blank_browser_template_is_rejected() {
        assert!(UrlTemplateBrowser::new(" ").is_none());
    }

    #[test]
    fn no_commits_yields_single_sentinel() {
        let fields = builder(None).build_fields(&[]);
        assert_eq!(fields.len(), 1);
        assert_eq!(
            serde_json::to_value(fields[0].to_wire()).unwrap(),
            json!({"name": "", "value": "*No Changes*\n"})
        );
    }

    #[test]
    fn one_field_per_commit_in_order() {
        let mut second = commit(None);
        second.id = "fedcba9876543210".to_string();
        let fields = builder(None).build_fields(&[commit(None), second]);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].name.as_deref(), Some("`fedcba9`"));
    }
}
