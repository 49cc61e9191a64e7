//! Discord embed model and its wire form
//!
//! The builder-side types below hold whatever the notifier sets on them. Each has a
//! `to_wire` that returns `None` when nothing would be emitted, so empty sub-objects
//! never reach Discord. See
//! https://discord.com/developers/docs/resources/message#embed-object

use serde::Serialize;

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Embed author block. The notifier uses it as the embed's headline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Author {
    pub name: Option<String>,
    pub url: Option<String>,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WireAuthor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

impl Author {
    /// A url or icon without a name still gets an (empty) name so the object is valid.
    pub fn to_wire(&self) -> Option<WireAuthor> {
        let url = non_blank(&self.url).map(str::to_string);
        let icon_url = self.icon_url.clone();
        if self.name.is_none() && url.is_none() && icon_url.is_none() {
            return None;
        }
        Some(WireAuthor {
            name: self.name.clone().unwrap_or_default(),
            url,
            icon_url,
        })
    }
}

/// Bare-URL media used for both `image` and `thumbnail`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Image {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WireImage {
    pub url: String,
}

impl Image {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
        }
    }

    pub fn to_wire(&self) -> Option<WireImage> {
        non_blank(&self.url).map(|url| WireImage {
            url: url.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Footer {
    pub text: Option<String>,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WireFooter {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

impl Footer {
    pub fn to_wire(&self) -> Option<WireFooter> {
        let icon_url = non_blank(&self.icon_url).map(str::to_string);
        if self.text.is_none() && icon_url.is_none() {
            return None;
        }
        Some(WireFooter {
            text: self.text.clone().unwrap_or_default(),
            icon_url,
        })
    }
}

/// Embed field.
///
/// Discord doesn't render markdown links in field names, so a name is folded into
/// the first line of the value and the emitted name is always empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field {
    pub name: Option<String>,
    pub value: Option<String>,
    pub inline: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WireField {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub inline: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value.into()),
            inline: false,
        }
    }

    /// A field with no header line
    pub fn unnamed(value: impl Into<String>) -> Self {
        Self {
            name: None,
            value: Some(value.into()),
            inline: false,
        }
    }

    pub fn inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }

    pub fn to_wire(&self) -> WireField {
        let value = match (&self.name, &self.value) {
            (Some(name), Some(value)) => format!("{}\n{}", name, value),
            (Some(name), None) => name.clone(),
            (None, value) => value.clone().unwrap_or_default(),
        };
        WireField {
            name: String::new(),
            value,
            inline: self.inline,
        }
    }
}

/// Builder-stage embed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Embed {
    pub color: Option<u32>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub author: Author,
    pub description: Option<String>,
    pub image: Image,
    pub thumbnail: Image,
    pub fields: Vec<Field>,
    pub footer: Footer,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct WireEmbed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<WireAuthor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<WireImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<WireImage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<WireField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<WireFooter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Embed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Wire form of the embed, or `None` when every component is empty and the
    /// embed must be left out of the payload.
    pub fn to_wire(&self) -> Option<WireEmbed> {
        let url = non_blank(&self.url).map(str::to_string);
        // A link needs a title to be clickable, even an empty one.
        let title = match (&self.title, &url) {
            (Some(title), _) => Some(title.clone()),
            (None, Some(_)) => Some(String::new()),
            (None, None) => None,
        };

        let wire = WireEmbed {
            color: self.color,
            title,
            url,
            author: self.author.to_wire(),
            description: non_blank(&self.description).map(str::to_string),
            image: self.image.to_wire(),
            thumbnail: self.thumbnail.to_wire(),
            fields: self.fields.iter().map(Field::to_wire).collect(),
            footer: self.footer.to_wire(),
            timestamp: non_blank(&self.timestamp).map(str::to_string),
        };

        if wire == WireEmbed::default() {
            None
        } else {
            Some(wire)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn to_json<T: Serialize>(value: &T) -> serde_json::Value {
        serde_json::to_value(value).unwrap()
    }

    #[test]
    fn empty_embed_is_absent() {
        assert!(Embed::new().to_wire().is_none());
    }

    #[test]
    fn blank_components_still_absent() {
        let embed = Embed {
            url: Some("  ".to_string()),
            description: Some("   ".to_string()),
            image: Image::new(""),
            thumbnail: Image::new(" "),
            footer: Footer {
                text: None,
                icon_url: Some("".to_string()),
            },
            timestamp: Some(String::new()),
            ..Embed::default()
        };
        assert!(embed.to_wire().is_none());
    }

    #[test]
    fn color_alone_is_enough() {
        let embed = Embed {
            color: Some(0x19A719),
            ..Embed::default()
        };
        assert_eq!(to_json(&embed.to_wire().unwrap()), json!({"color": 0x19A719}));
    }

    #[test]
    fn author_icon_without_name_gets_empty_name() {
        let author = Author {
            icon_url: Some("https://example.com/icon.png".to_string()),
            ..Author::default()
        };
        assert_eq!(
            to_json(&author.to_wire().unwrap()),
            json!({"name": "", "icon_url": "https://example.com/icon.png"})
        );
    }

    #[test]
    fn author_url_without_name_gets_empty_name() {
        let author = Author {
            url: Some("https://ci.example.com/job/1".to_string()),
            ..Author::default()
        };
        assert_eq!(
            to_json(&author.to_wire().unwrap()),
            json!({"name": "", "url": "https://ci.example.com/job/1"})
        );
    }

    #[test]
    fn empty_author_is_absent() {
        assert!(Author::default().to_wire().is_none());
        let blank_url = Author {
            url: Some(" ".to_string()),
            ..Author::default()
        };
        assert!(blank_url.to_wire().is_none());
    }

    #[test]
    fn field_name_is_merged_into_value() {
        assert_eq!(
            to_json(&Field::new("Header", "Body").to_wire()),
            json!({"name": "", "value": "Header\nBody"})
        );
    }

    #[test]
    fn field_without_value_uses_name() {
        let field = Field {
            name: Some("Header".to_string()),
            value: None,
            inline: false,
        };
        assert_eq!(
            to_json(&field.to_wire()),
            json!({"name": "", "value": "Header"})
        );
    }

    #[test]
    fn inline_only_emitted_when_set() {
        assert_eq!(
            to_json(&Field::unnamed("v").inline(true).to_wire()),
            json!({"name": "", "value": "v", "inline": true})
        );
    }

    #[test]
    fn footer_icon_without_text_gets_empty_text() {
        let footer = Footer {
            text: None,
            icon_url: Some("https://example.com/f.png".to_string()),
        };
        assert_eq!(
            to_json(&footer.to_wire().unwrap()),
            json!({"text": "", "icon_url": "https://example.com/f.png"})
        );
        assert!(Footer::default().to_wire().is_none());
    }

    #[test]
    fn url_without_title_gets_empty_title() {
        let embed = Embed {
            url: Some("https://ci.example.com/job/1".to_string()),
            ..Embed::default()
        };
        assert_eq!(
            to_json(&embed.to_wire().unwrap()),
            json!({"title": "", "url": "https://ci.example.com/job/1"})
        );
    }

    #[test]
    fn full_embed() {
        let mut embed = Embed {
            color: Some(0xFFFF0A),
            author: Author {
                name: Some("Build unstable".to_string()),
                ..Author::default()
            },
            description: Some("demo".to_string()),
            image: Image::new("https://example.com/i.png"),
            thumbnail: Image::new("https://example.com/t.png"),
            footer: Footer {
                text: Some("#42".to_string()),
                icon_url: None,
            },
            timestamp: Some("2024-05-01T12:00:00Z".to_string()),
            ..Embed::default()
        };
        embed.add_field(Field::new("a", "b"));

        assert_eq!(
            to_json(&embed.to_wire().unwrap()),
            json!({
                "color": 0xFFFF0A,
                "author": {"name": "Build unstable"},
                "description": "demo",
                "image": {"url": "https://example.com/i.png"},
                "thumbnail": {"url": "https://example.com/t.png"},
                "fields": [{"name": "", "value": "a\nb"}],
                "footer": {"text": "#42"},
                "timestamp": "2024-05-01T12:00:00Z"
            })
        );
    }
}
