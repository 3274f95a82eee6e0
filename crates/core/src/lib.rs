//! Core slide templates, markdown deck parsing, and presentation building.

pub mod builder;
pub mod deck;
pub mod error;
pub mod markdown;
pub mod template;

pub use builder::{BuiltSlide, PresentationBuilder, NO_TITLE};
pub use deck::{inches, Frame, Paragraph, SlideDeck, SlideLayout, EMU_PER_INCH};
pub use error::{Error, Result};
pub use markdown::{create_presentation_from_markdown, MarkdownParser};
pub use template::{PresentationTemplate, SlideTemplate, SlideType, PLACEHOLDER_IMAGE, UNTITLED};
