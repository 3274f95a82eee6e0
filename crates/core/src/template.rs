//! Slide and presentation templates.
//!
//! A template is the structured description of a deck before it is rendered:
//! an ordered list of typed slides plus a presentation name. Templates
//! convert losslessly to and from a plain key-value form of
//! `{ "name": ..., "slides": [ { "type": ..., "params": { ... } } ] }`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Image location used when an image slide does not name one.
pub const PLACEHOLDER_IMAGE: &str = "placeholder.jpg";

/// Title used by the content fallback when a slide carries none.
pub const UNTITLED: &str = "Untitled";

/// The kind of a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideType {
    Title,
    Content,
    Image,
    Comparison,
    Section,
}

impl SlideType {
    /// Every slide type, in declaration order.
    pub const ALL: [SlideType; 5] = [
        Self::Title,
        Self::Content,
        Self::Image,
        Self::Comparison,
        Self::Section,
    ];

    /// The lowercase tag used in directives and in the key-value form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Content => "content",
            Self::Image => "image",
            Self::Comparison => "comparison",
            Self::Section => "section",
        }
    }
}

impl fmt::Display for SlideType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlideType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::InvalidTemplate(format!("unknown slide type '{}'", s)))
    }
}

fn placeholder_image() -> PathBuf {
    PathBuf::from(PLACEHOLDER_IMAGE)
}

fn untitled() -> String {
    UNTITLED.to_string()
}

/// A single slide's kind and parameters.
///
/// Each variant carries exactly the parameters meaningful for its kind.
/// Parameters missing from key-value input take empty defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "lowercase")]
pub enum SlideTemplate {
    Title {
        #[serde(default)]
        title: String,
        #[serde(default)]
        subtitle: String,
    },
    Content {
        #[serde(default)]
        title: String,
        #[serde(default)]
        content: Vec<String>,
    },
    Image {
        #[serde(default)]
        title: String,
        #[serde(default = "placeholder_image")]
        image_path: PathBuf,
        #[serde(default)]
        caption: String,
    },
    /// Declared for completeness; rendered through the content path.
    Comparison {
        #[serde(default = "untitled")]
        title: String,
        #[serde(default)]
        content: Vec<String>,
    },
    Section {
        #[serde(default)]
        title: String,
        #[serde(default)]
        description: String,
    },
}

impl SlideTemplate {
    /// Create a title slide template.
    pub fn title_slide(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self::Title {
            title: title.into(),
            subtitle: subtitle.into(),
        }
    }

    /// Create a content slide template with bullet items.
    pub fn content_slide(title: impl Into<String>, content: Vec<String>) -> Self {
        Self::Content {
            title: title.into(),
            content,
        }
    }

    /// Create an image slide template.
    pub fn image_slide(
        title: impl Into<String>,
        image_path: impl Into<PathBuf>,
        caption: impl Into<String>,
    ) -> Self {
        Self::Image {
            title: title.into(),
            image_path: image_path.into(),
            caption: caption.into(),
        }
    }

    /// Create a section divider slide template.
    pub fn section_slide(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Section {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Create a comparison slide template.
    pub fn comparison_slide(title: impl Into<String>, content: Vec<String>) -> Self {
        Self::Comparison {
            title: title.into(),
            content,
        }
    }

    /// The kind of this slide.
    pub fn slide_type(&self) -> SlideType {
        match self {
            Self::Title { .. } => SlideType::Title,
            Self::Content { .. } => SlideType::Content,
            Self::Image { .. } => SlideType::Image,
            Self::Comparison { .. } => SlideType::Comparison,
            Self::Section { .. } => SlideType::Section,
        }
    }

    /// The slide title.
    pub fn title(&self) -> &str {
        match self {
            Self::Title { title, .. }
            | Self::Content { title, .. }
            | Self::Image { title, .. }
            | Self::Comparison { title, .. }
            | Self::Section { title, .. } => title,
        }
    }

    /// Convert to the `{ "type": ..., "params": { ... } }` form.
    pub fn to_dict(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Rebuild a slide from the `{ "type": ..., "params": { ... } }` form.
    pub fn from_dict(data: Value) -> Result<Self> {
        serde_json::from_value(data).map_err(|e| Error::InvalidTemplate(e.to_string()))
    }
}

/// A named, ordered collection of slide templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationTemplate {
    /// Presentation name.
    pub name: String,

    /// Slides in presentation order.
    #[serde(default)]
    pub slides: Vec<SlideTemplate>,
}

impl PresentationTemplate {
    /// Create an empty template with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slides: Vec::new(),
        }
    }

    /// Append a slide.
    pub fn add_slide(&mut self, slide: SlideTemplate) {
        self.slides.push(slide);
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Convert to the nested key-value form.
    pub fn to_dict(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Rebuild a template from the nested key-value form.
    pub fn from_dict(data: Value) -> Result<Self> {
        serde_json::from_value(data).map_err(|e| Error::InvalidTemplate(e.to_string()))
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a template from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_dict(value)
    }
}
