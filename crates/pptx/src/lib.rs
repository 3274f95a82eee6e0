//! PPTX (Office Open XML) backend for Prez.
//!
//! [`PptxDeck`] is the document-generation side the presentation builder
//! drives; [`PptxReader`] reads slide text back out of `.pptx` files.

mod package;
pub mod reader;
pub mod writer;

pub use reader::{DeckSlide, PptxReader};
pub use writer::PptxDeck;
