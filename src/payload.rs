//! The complete webhook message

use serde::Serialize;

use crate::embed::{Embed, WireEmbed};
use crate::error::{NotifyError, Result};

/// Kinds of mentions Discord is allowed to resolve from message content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MentionParse {
    Everyone,
    Users,
    Roles,
}

impl MentionParse {
    pub fn as_str(&self) -> &'static str {
        match self {
            MentionParse::Everyone => "everyone",
            MentionParse::Users => "users",
            MentionParse::Roles => "roles",
        }
    }
}

impl Serialize for MentionParse {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedMentions {
    pub parse: Vec<MentionParse>,
    pub users: Vec<String>,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WireAllowedMentions {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parse: Vec<MentionParse>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

impl AllowedMentions {
    pub fn to_wire(&self) -> Option<WireAllowedMentions> {
        if self.parse.is_empty() && self.users.is_empty() && self.roles.is_empty() {
            return None;
        }
        Some(WireAllowedMentions {
            parse: self.parse.clone(),
            users: self.users.clone(),
            roles: self.roles.clone(),
        })
    }
}

/// A webhook message carrying at most one embed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub content: Option<String>,
    pub tts: bool,
    pub allowed_mentions: AllowedMentions,
    pub embed: Embed,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WirePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub tts: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_mentions: Option<WireAllowedMentions>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<WireEmbed>,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.trim().is_empty()).map(str::to_string)
}

impl Payload {
    /// Builds the wire form. Fails with [`NotifyError::EmptyPayload`] unless there is
    /// content or a non-empty embed: a bare username or avatar renders nothing.
    pub fn to_wire(&self) -> Result<WirePayload> {
        let content = non_blank(&self.content);
        let embeds: Vec<WireEmbed> = self.embed.to_wire().into_iter().collect();
        if content.is_none() && embeds.is_empty() {
            return Err(NotifyError::EmptyPayload);
        }
        Ok(WirePayload {
            username: non_blank(&self.username),
            avatar_url: non_blank(&self.avatar_url),
            content,
            tts: self.tts,
            allowed_mentions: self.allowed_mentions.to_wire(),
            embeds,
        })
    }

    /// JSON sent as `payload_json`.
    ///
    /// serde_json escapes backslashes in text; Discord then shows them doubled, so
    /// `\\` is collapsed back to `\` before sending.
    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string(&self.to_wire()?)?;
        Ok(json.replace("\\\\", "\\"))
    }
}
