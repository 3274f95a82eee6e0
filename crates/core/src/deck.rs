//! The document-generation interface the presentation builder drives.
//!
//! Geometry is in EMUs (English Metric Units, 914400 EMU = 1 inch).

use crate::Result;
use std::path::Path;

/// EMUs per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// Convert inches to EMUs.
pub fn inches(value: f64) -> i64 {
    (value * EMU_PER_INCH as f64).round() as i64
}

/// Slide layouts a deck must offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlideLayout {
    /// Centered title with a subtitle.
    Title,
    /// Title with a bulleted body.
    TitleAndContent,
    /// Section divider with a short description.
    SectionHeader,
    /// No placeholders.
    Blank,
}

impl SlideLayout {
    /// Every layout, in index order.
    pub const ALL: [SlideLayout; 4] = [
        Self::Title,
        Self::TitleAndContent,
        Self::SectionHeader,
        Self::Blank,
    ];

    /// Conventional layout index in the default PowerPoint master.
    pub fn index(&self) -> usize {
        match self {
            Self::Title => 0,
            Self::TitleAndContent => 1,
            Self::SectionHeader => 2,
            Self::Blank => 6,
        }
    }

    /// Human readable layout name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Title => "Title Slide",
            Self::TitleAndContent => "Title and Content",
            Self::SectionHeader => "Section Header",
            Self::Blank => "Blank",
        }
    }
}

/// A paragraph in a body text region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub text: String,

    /// Indentation level, 0 for top-level bullets.
    pub level: u8,
}

impl Paragraph {
    pub fn new(text: impl Into<String>, level: u8) -> Self {
        Self {
            text: text.into(),
            level,
        }
    }
}

/// A rectangle on a slide, in EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Frame {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a frame from inch measurements.
    pub fn from_inches(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(inches(x), inches(y), inches(width), inches(height))
    }
}

/// A document that slides can be appended to and that can be saved.
///
/// Slides are addressed by the index returned from [`SlideDeck::add_slide`].
pub trait SlideDeck {
    /// Append an empty slide with the given layout, returning its index.
    fn add_slide(&mut self, layout: SlideLayout) -> Result<usize>;

    /// Set the text of the slide's title region.
    fn set_title(&mut self, slide: usize, text: &str) -> Result<()>;

    /// Replace the slide's body region with the given paragraphs.
    fn set_body(&mut self, slide: usize, paragraphs: &[Paragraph]) -> Result<()>;

    /// Add a free-standing text box.
    fn add_text_box(&mut self, slide: usize, text: &str, frame: Frame) -> Result<()>;

    /// Insert a picture at `(x, y)` scaled to `width`, keeping its aspect ratio.
    fn add_picture(&mut self, slide: usize, path: &Path, x: i64, y: i64, width: i64) -> Result<()>;

    /// Number of slides in the deck.
    fn slide_count(&self) -> usize;

    /// Serialize the deck to a file.
    fn save(&self, path: &Path) -> Result<()>;
}
