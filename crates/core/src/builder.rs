//! Presentation builder.
//!
//! Realizes slides onto a [`SlideDeck`], either one call at a time or by
//! replaying a [`PresentationTemplate`].

use crate::deck::{inches, Frame, Paragraph, SlideDeck, SlideLayout};
use crate::markdown::MarkdownParser;
use crate::template::{PresentationTemplate, SlideTemplate, SlideType};
use crate::Result;
use std::path::Path;

/// Title reported for slides without a title placeholder.
pub const NO_TITLE: &str = "(No Title)";

/// Record of a slide added through the builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltSlide {
    /// Kind of slide requested.
    pub slide_type: SlideType,

    /// Text of the title placeholder, or `None` when the layout has none.
    pub title: Option<String>,

    /// Index of the slide in the deck.
    pub index: usize,
}

/// Builds presentations on top of a document-generation deck.
#[derive(Debug)]
pub struct PresentationBuilder<D: SlideDeck> {
    deck: D,
    slides: Vec<BuiltSlide>,
}

impl<D: SlideDeck> PresentationBuilder<D> {
    /// Create a builder over an empty deck.
    pub fn new(deck: D) -> Self {
        Self {
            deck,
            slides: Vec::new(),
        }
    }

    /// Build every slide of a template, in order.
    pub fn build_from_template(deck: D, template: &PresentationTemplate) -> Result<Self> {
        let mut builder = Self::new(deck);
        for slide in &template.slides {
            builder.add_slide(slide)?;
        }
        log::debug!(
            "Built '{}' with {} slides",
            template.name,
            builder.get_slide_count()
        );
        Ok(builder)
    }

    /// Parse a markdown deck and build it.
    pub fn from_markdown(deck: D, path: &Path) -> Result<Self> {
        let template = MarkdownParser::new().parse_file(path)?;
        Self::build_from_template(deck, &template)
    }

    /// Add the slide a template describes.
    pub fn add_slide(&mut self, slide: &SlideTemplate) -> Result<usize> {
        match slide {
            SlideTemplate::Title { title, subtitle } => self.add_title_slide(title, subtitle),
            SlideTemplate::Content { title, content } => self.add_content_slide(title, content),
            SlideTemplate::Image {
                title,
                image_path,
                caption,
            } => self.add_image_slide(title, image_path, caption),
            SlideTemplate::Section { title, description } => {
                self.add_section_slide(title, description)
            }
            // Anything without a dedicated layout renders as content.
            SlideTemplate::Comparison { title, content } => {
                self.add_content_slide(title, content)
            }
        }
    }

    /// Add a title slide. An empty subtitle leaves the subtitle region unset.
    pub fn add_title_slide(&mut self, title: &str, subtitle: &str) -> Result<usize> {
        let index = self.deck.add_slide(SlideLayout::Title)?;
        self.deck.set_title(index, title)?;

        if !subtitle.is_empty() {
            self.deck.set_body(index, &[Paragraph::new(subtitle, 0)])?;
        }

        Ok(self.record(SlideType::Title, Some(title), index))
    }

    /// Add a content slide with one top-level bullet per item.
    pub fn add_content_slide(&mut self, title: &str, content: &[String]) -> Result<usize> {
        let index = self.deck.add_slide(SlideLayout::TitleAndContent)?;
        self.deck.set_title(index, title)?;

        let paragraphs: Vec<Paragraph> = content
            .iter()
            .map(|item| Paragraph::new(item.as_str(), 0))
            .collect();
        self.deck.set_body(index, &paragraphs)?;

        Ok(self.record(SlideType::Content, Some(title), index))
    }

    /// Add an image slide on a blank layout.
    ///
    /// The title is drawn in a text box, so the slide has no title
    /// placeholder and is listed as [`NO_TITLE`].
    /// The picture is skipped with a warning when the file does not exist.
    pub fn add_image_slide(&mut self, title: &str, image_path: &Path, caption: &str) -> Result<usize> {
        let index = self.deck.add_slide(SlideLayout::Blank)?;
        self.deck
            .add_text_box(index, title, Frame::from_inches(0.5, 0.5, 9.0, 1.0))?;

        if image_path.exists() {
            self.deck
                .add_picture(index, image_path, inches(1.0), inches(1.5), inches(8.0))?;
        } else {
            log::warn!("Image not found, leaving slide without picture: {}", image_path.display());
        }

        if !caption.is_empty() {
            self.deck
                .add_text_box(index, caption, Frame::from_inches(1.0, 6.5, 8.0, 1.0))?;
        }

        // The title lives in a text box, not a placeholder.
        Ok(self.record(SlideType::Image, None, index))
    }

    /// Add a section divider slide.
    pub fn add_section_slide(&mut self, title: &str, description: &str) -> Result<usize> {
        let index = self.deck.add_slide(SlideLayout::SectionHeader)?;
        self.deck.set_title(index, title)?;

        if !description.is_empty() {
            self.deck.set_body(index, &[Paragraph::new(description, 0)])?;
        }

        Ok(self.record(SlideType::Section, Some(title), index))
    }

    /// Save the deck, creating missing parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        self.deck.save(path)?;
        log::info!("Saved {} slides to {}", self.get_slide_count(), path.display());
        Ok(())
    }

    /// Number of slides in the deck.
    pub fn get_slide_count(&self) -> usize {
        self.deck.slide_count()
    }

    /// Titles of all slides, with [`NO_TITLE`] for slides without a title placeholder.
    pub fn get_slide_titles(&self) -> Vec<String> {
        self.slides
            .iter()
            .map(|s| s.title.clone().unwrap_or_else(|| NO_TITLE.to_string()))
            .collect()
    }

    /// Slides added so far, in order.
    pub fn slides(&self) -> &[BuiltSlide] {
        &self.slides
    }

    pub fn deck(&self) -> &D {
        &self.deck
    }

    pub fn into_deck(self) -> D {
        self.deck
    }

    fn record(&mut self, slide_type: SlideType, title: Option<&str>, index: usize) -> usize {
        log::debug!("Added {} slide {} '{}'", slide_type, index + 1, title.unwrap_or(NO_TITLE));
        self.slides.push(BuiltSlide {
            slide_type,
            title: title.map(str::to_string),
            index,
        });
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        AddSlide(SlideLayout),
        Title(usize, String),
        Body(usize, Vec<Paragraph>),
        TextBox(usize, String, Frame),
        Picture(usize, PathBuf, i64, i64, i64),
    }

    #[derive(Debug, Default)]
    struct RecordingDeck {
        calls: Vec<Call>,
        slides: usize,
    }

    impl SlideDeck for RecordingDeck {
        fn add_slide(&mut self, layout: SlideLayout) -> Result<usize> {
            self.calls.push(Call::AddSlide(layout));
            self.slides += 1;
            Ok(self.slides - 1)
        }

        fn set_title(&mut self, slide: usize, text: &str) -> Result<()> {
            self.calls.push(Call::Title(slide, text.to_string()));
            Ok(())
        }

        fn set_body(&mut self, slide: usize, paragraphs: &[Paragraph]) -> Result<()> {
            self.calls.push(Call::Body(slide, paragraphs.to_vec()));
            Ok(())
        }

        fn add_text_box(&mut self, slide: usize, text: &str, frame: Frame) -> Result<()> {
            self.calls.push(Call::TextBox(slide, text.to_string(), frame));
            Ok(())
        }

        fn add_picture(&mut self, slide: usize, path: &Path, x: i64, y: i64, width: i64) -> Result<()> {
            self.calls
                .push(Call::Picture(slide, path.to_path_buf(), x, y, width));
            Ok(())
        }

        fn slide_count(&self) -> usize {
            self.slides
        }

        fn save(&self, path: &Path) -> Result<()> {
            std::fs::write(path, format!("{} slides", self.slides))?;
            Ok(())
        }
    }

    fn builder() -> PresentationBuilder<RecordingDeck> {
        PresentationBuilder::new(RecordingDeck::default())
    }

    #[test]
    fn test_initialization() {
        let builder = builder();
        assert_eq!(builder.get_slide_count(), 0);
        assert!(builder.slides().is_empty());
    }

    #[test]
    fn test_add_title_slide() {
        let mut builder = builder();
        let index = builder.add_title_slide("Test Title", "Test Subtitle").unwrap();

        assert_eq!(index, 0);
        assert_eq!(builder.get_slide_count(), 1);
        assert_eq!(
            builder.deck().calls,
            vec![
                Call::AddSlide(SlideLayout::Title),
                Call::Title(0, "Test Title".into()),
                Call::Body(0, vec![Paragraph::new("Test Subtitle", 0)]),
            ]
        );
    }

    #[test]
    fn test_title_slide_without_subtitle() {
        let mut builder = builder();
        builder.add_title_slide("Only", "").unwrap();

        assert_eq!(
            builder.deck().calls,
            vec![Call::AddSlide(SlideLayout::Title), Call::Title(0, "Only".into())]
        );
    }

    #[test]
    fn test_add_content_slide() {
        let mut builder = builder();
        let content = vec!["Point 1".to_string(), "Point 2".to_string(), "Point 3".to_string()];
        builder.add_content_slide("Test Content", &content).unwrap();

        assert_eq!(builder.get_slide_count(), 1);
        assert_eq!(
            builder.deck().calls[2],
            Call::Body(
                0,
                vec![
                    Paragraph::new("Point 1", 0),
                    Paragraph::new("Point 2", 0),
                    Paragraph::new("Point 3", 0),
                ]
            )
        );
    }

    #[test]
    fn test_add_image_slide_with_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("chart.png");
        std::fs::write(&image, b"not really a png").unwrap();

        let mut builder = builder();
        builder.add_image_slide("Chart", &image, "Growth").unwrap();

        assert_eq!(
            builder.deck().calls,
            vec![
                Call::AddSlide(SlideLayout::Blank),
                Call::TextBox(0, "Chart".into(), Frame::from_inches(0.5, 0.5, 9.0, 1.0)),
                Call::Picture(0, image.clone(), inches(1.0), inches(1.5), inches(8.0)),
                Call::TextBox(0, "Growth".into(), Frame::from_inches(1.0, 6.5, 8.0, 1.0)),
            ]
        );
    }

    #[test]
    fn test_add_image_slide_missing_file_skips_picture() {
        let mut builder = builder();
        builder
            .add_image_slide("Missing", Path::new("does/not/exist.png"), "")
            .unwrap();

        assert_eq!(
            builder.deck().calls,
            vec![
                Call::AddSlide(SlideLayout::Blank),
                Call::TextBox(0, "Missing".into(), Frame::from_inches(0.5, 0.5, 9.0, 1.0)),
            ]
        );
        assert_eq!(builder.get_slide_titles(), vec![NO_TITLE]);
        assert_eq!(builder.slides()[0].title, None);
    }

    #[test]
    fn test_add_section_slide() {
        let mut builder = builder();
        builder.add_section_slide("Part Two", "Advanced").unwrap();

        assert_eq!(
            builder.deck().calls,
            vec![
                Call::AddSlide(SlideLayout::SectionHeader),
                Call::Title(0, "Part Two".into()),
                Call::Body(0, vec![Paragraph::new("Advanced", 0)]),
            ]
        );
    }

    #[test]
    fn test_get_slide_titles() {
        let mut builder = builder();
        builder.add_title_slide("Title 1", "Subtitle 1").unwrap();
        builder.add_content_slide("Title 2", &["Content".to_string()]).unwrap();
        builder.add_image_slide("Chart", Path::new("missing.png"), "").unwrap();

        assert_eq!(
            builder.get_slide_titles(),
            vec!["Title 1", "Title 2", NO_TITLE]
        );
    }

    #[test]
    fn test_empty_title_placeholder_is_reported_as_is() {
        let mut builder = builder();
        builder.add_content_slide("", &[]).unwrap();
        builder.add_section_slide("", "").unwrap();

        assert_eq!(builder.get_slide_titles(), vec!["", ""]);
    }

    #[test]
    fn test_markdown_image_slide_has_no_title() {
        let template = crate::markdown::parse(
            "<!-- type: image -->\n# Architecture\nimg.png\n\n---\n\n# Real\n- point",
            "deck",
        )
        .unwrap();

        let builder = PresentationBuilder::build_from_template(RecordingDeck::default(), &template).unwrap();
        assert_eq!(builder.get_slide_titles(), vec![NO_TITLE, "Real"]);
    }

    #[test]
    fn test_build_from_template_replays_in_order() {
        let mut template = PresentationTemplate::new("Deck");
        template.add_slide(SlideTemplate::title_slide("Welcome", ""));
        template.add_slide(SlideTemplate::section_slide("Part", ""));
        template.add_slide(SlideTemplate::image_slide("Pic", "nowhere.png", ""));
        template.add_slide(SlideTemplate::content_slide("Points", vec!["A".into()]));

        let builder = PresentationBuilder::build_from_template(RecordingDeck::default(), &template).unwrap();

        assert_eq!(builder.get_slide_count(), 4);
        let kinds: Vec<SlideType> = builder.slides().iter().map(|s| s.slide_type).collect();
        assert_eq!(
            kinds,
            vec![SlideType::Title, SlideType::Section, SlideType::Image, SlideType::Content]
        );
        assert_eq!(builder.get_slide_titles(), vec!["Welcome", "Part", NO_TITLE, "Points"]);
    }

    #[test]
    fn test_comparison_falls_back_to_content() {
        let mut template = PresentationTemplate::new("Deck");
        template.add_slide(SlideTemplate::comparison_slide("Us vs Them", vec!["Fast".into()]));

        let builder = PresentationBuilder::build_from_template(RecordingDeck::default(), &template).unwrap();

        assert_eq!(builder.slides()[0].slide_type, SlideType::Content);
        assert_eq!(
            builder.deck().calls,
            vec![
                Call::AddSlide(SlideLayout::TitleAndContent),
                Call::Title(0, "Us vs Them".into()),
                Call::Body(0, vec![Paragraph::new("Fast", 0)]),
            ]
        );
    }

    #[test]
    fn test_build_from_empty_template() {
        let template = PresentationTemplate::new("Empty");
        let builder = PresentationBuilder::build_from_template(RecordingDeck::default(), &template).unwrap();
        assert_eq!(builder.get_slide_count(), 0);
    }

    #[test]
    fn test_from_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("talk.md");
        std::fs::write(&path, "# One\n- a\n\n---\n\n<!-- type: section -->\n# Two").unwrap();

        let builder = PresentationBuilder::from_markdown(RecordingDeck::default(), &path).unwrap();
        assert_eq!(builder.get_slide_titles(), vec!["One", "Two"]);
    }

    #[test]
    fn test_from_markdown_missing_file() {
        let err = PresentationBuilder::from_markdown(RecordingDeck::default(), Path::new("nope/missing.md"))
            .unwrap_err();
        assert!(matches!(err, crate::Error::TemplateNotFound(_)));
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("outputs").join("nested").join("deck.pptx");

        let mut builder = builder();
        builder.add_title_slide("Test", "Test").unwrap();
        builder.save(&output).unwrap();

        assert_eq!(std::fs::read_to_string(&output).unwrap(), "1 slides");
    }
}
