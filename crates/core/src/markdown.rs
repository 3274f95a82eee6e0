//! Markdown deck parser.
//!
//! A deck is a markdown document with optional YAML front matter, split
//! into slides by lines containing only `---`. Each slide needs a `#`
//! heading and may carry a `<!-- type: ... -->` directive choosing its kind.
//!
//! ```text
//! ---
//! title: "Quarterly Review"
//! ---
//!
//! <!-- type: title -->
//! # Quarterly Review
//! Q3 results
//!
//! ---
//!
//! # Highlights
//! - Revenue up
//! * Costs down
//! ```

use crate::template::{
    PresentationTemplate, SlideTemplate, SlideType, PLACEHOLDER_IMAGE, UNTITLED,
};
use crate::{Error, Result};
use regex::Regex;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Regex to find a slide type directive such as `<!-- type: image -->`.
static DIRECTIVE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!--\s*type:\s*(\w+)\s*-->").unwrap());

/// Regex to remove type directives along with the whitespace that follows them.
static DIRECTIVE_STRIP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!--\s*type:\s*\w+\s*-->\s*").unwrap());

/// Regex to match inline image markup `![alt](path)`.
static IMAGE_MARKUP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap());

/// Suffixes that mark a bare body line as an image location.
const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".bmp"];

/// Bullet markers stripped from content lines.
const BULLET_MARKERS: &[&str] = &["- ", "* ", "+ "];

/// Delimiter line for front matter and slide breaks.
const RULE: &str = "---";

/// Parser for markdown presentation templates.
#[derive(Debug, Clone, Default)]
pub struct MarkdownParser;

impl MarkdownParser {
    /// Create a new markdown parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a markdown file into a presentation template.
    ///
    /// The file stem is the presentation name unless the front matter sets
    /// a `title`.
    pub fn parse_file(&self, path: &Path) -> Result<PresentationTemplate> {
        if !path.exists() {
            return Err(Error::TemplateNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNTITLED.to_string());

        log::debug!("Parsing markdown deck {}", path.display());
        self.parse_content(&content, &name)
    }

    /// Parse markdown text into a presentation template.
    ///
    /// Fails only on malformed front matter. Chunks without a heading are
    /// skipped.
    pub fn parse_content(&self, content: &str, fallback_name: &str) -> Result<PresentationTemplate> {
        let content = content.trim_start();

        let (title, body) = match split_front_matter(content) {
            Some((block, rest)) => (front_matter_title(block)?, rest),
            None => (None, content),
        };

        let name = title.unwrap_or_else(|| fallback_name.to_string());
        let mut template = PresentationTemplate::new(name);

        for chunk in split_slides(body.trim()) {
            let chunk = chunk.trim();
            if chunk.is_empty() {
                continue;
            }

            match self.parse_slide(chunk) {
                Some(slide) => template.add_slide(slide),
                None => log::debug!("Skipping chunk without a heading"),
            }
        }

        log::info!(
            "Parsed '{}' with {} slides",
            template.name,
            template.slides.len()
        );

        Ok(template)
    }

    /// Parse one slide chunk.
    ///
    /// Returns `None` when the chunk has no usable `#` heading.
    pub fn parse_slide(&self, content: &str) -> Option<SlideTemplate> {
        let (slide_type, text) = resolve_directive(content);

        let mut title: Option<&str> = None;
        let mut body: Vec<&str> = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if title.is_none() && line.starts_with('#') {
                title = Some(line.trim_start_matches('#').trim());
            } else if title.is_some() {
                body.push(line);
            }
        }

        let title = title.filter(|t| !t.is_empty())?;

        let slide = match slide_type {
            SlideType::Title => {
                SlideTemplate::title_slide(title, body.first().copied().unwrap_or_default())
            }
            SlideType::Image => parse_image_slide(title, &body),
            SlideType::Section => SlideTemplate::section_slide(title, body.join("\n")),
            // Comparison has no layout of its own and renders as content.
            SlideType::Content | SlideType::Comparison => {
                SlideTemplate::content_slide(title, bullet_items(&body))
            }
        };

        log::debug!("Parsed {} slide '{}'", slide.slide_type(), slide.title());
        Some(slide)
    }
}

/// Parse markdown text into a presentation template.
pub fn parse(content: &str, fallback_name: &str) -> Result<PresentationTemplate> {
    MarkdownParser::new().parse_content(content, fallback_name)
}

/// Create a presentation template from a markdown file.
pub fn create_presentation_from_markdown(path: &Path) -> Result<PresentationTemplate> {
    MarkdownParser::new().parse_file(path)
}

fn is_rule(line: &str) -> bool {
    line.trim() == RULE
}

/// Split off a leading front matter block.
///
/// Returns the block between the delimiters and the text after the closing
/// delimiter, or `None` when the document does not open with one.
fn split_front_matter(content: &str) -> Option<(&str, &str)> {
    let mut lines = content.split_inclusive('\n');
    let opening = lines.next()?;
    if !is_rule(opening) {
        return None;
    }

    let block_start = opening.len();
    let mut offset = block_start;
    for line in lines {
        if is_rule(line) {
            return Some((&content[block_start..offset], &content[offset + line.len()..]));
        }
        offset += line.len();
    }

    None
}

/// Extract the presentation title from a front matter block.
fn front_matter_title(block: &str) -> Result<Option<String>> {
    if block.trim().is_empty() {
        return Ok(None);
    }

    let value: serde_yaml::Value =
        serde_yaml::from_str(block).map_err(|e| Error::MalformedFrontMatter(e.to_string()))?;

    let mapping = match value {
        serde_yaml::Value::Mapping(mapping) => mapping,
        serde_yaml::Value::Null => return Ok(None),
        other => {
            return Err(Error::MalformedFrontMatter(format!(
                "expected a mapping, found {:?}",
                other
            )))
        }
    };

    let title = match mapping.get("title") {
        Some(serde_yaml::Value::String(s)) => Some(s.clone()),
        Some(serde_yaml::Value::Number(n)) => Some(n.to_string()),
        Some(serde_yaml::Value::Bool(b)) => Some(b.to_string()),
        Some(other) => {
            log::warn!("Ignoring non-scalar front matter title: {:?}", other);
            None
        }
        None => None,
    };

    Ok(title)
}

/// Split a document body into slide chunks on `---` lines.
fn split_slides(body: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in body.lines() {
        if is_rule(line) {
            chunks.push(current.join("\n"));
            current.clear();
        } else {
            current.push(line);
        }
    }
    chunks.push(current.join("\n"));

    chunks
}

/// Resolve the slide type from the first directive in a chunk.
///
/// A recognised directive is stripped from the text. An unrecognised one
/// leaves the text untouched and the slide defaults to content.
fn resolve_directive(content: &str) -> (SlideType, Cow<'_, str>) {
    let Some(caps) = DIRECTIVE_REGEX.captures(content) else {
        return (SlideType::Content, Cow::Borrowed(content));
    };

    match caps[1].to_lowercase().parse::<SlideType>() {
        Ok(slide_type) => (slide_type, DIRECTIVE_STRIP_REGEX.replace_all(content, "")),
        Err(_) => {
            log::debug!("Unknown slide type '{}', using content", &caps[1]);
            (SlideType::Content, Cow::Borrowed(content))
        }
    }
}

/// Normalize bullet syntax into content items.
fn bullet_items(lines: &[&str]) -> Vec<String> {
    lines
        .iter()
        .filter_map(|line| {
            if let Some(item) = BULLET_MARKERS.iter().find_map(|m| line.strip_prefix(m)) {
                Some(item.trim().to_string())
            } else if line.starts_with('#') {
                None
            } else {
                Some(line.to_string())
            }
        })
        .collect()
}

/// Build an image slide from body lines.
///
/// Image markup wins over a bare path on the same line; the last image seen
/// is used. Alt text and other lines form the caption.
fn parse_image_slide(title: &str, lines: &[&str]) -> SlideTemplate {
    let mut image_path = PathBuf::from(PLACEHOLDER_IMAGE);
    let mut caption_parts: Vec<&str> = Vec::new();

    for &line in lines {
        if let Some(caps) = IMAGE_MARKUP_REGEX.captures(line) {
            image_path = PathBuf::from(&caps[2]);
            if let Some(alt) = caps.get(1).filter(|m| !m.as_str().is_empty()) {
                caption_parts.push(alt.as_str());
            }
        } else if IMAGE_EXTENSIONS.iter().any(|ext| line.ends_with(ext)) {
            image_path = PathBuf::from(line);
        } else if !line.starts_with('!') {
            caption_parts.push(line);
        }
    }

    SlideTemplate::image_slide(title, image_path, caption_parts.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content_of(slide: &SlideTemplate) -> (&str, &[String]) {
        match slide {
            SlideTemplate::Content { title, content } => (title.as_str(), content.as_slice()),
            other => panic!("expected content slide, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_simple_content_slides() {
        let content = "# Introduction\n- First bullet point\n- Second bullet point\n\n---\n\n# Getting Started\n- Install dependencies\n- Run the application";

        let template = parse(content, "Test Presentation").unwrap();

        assert_eq!(template.name, "Test Presentation");
        assert_eq!(
            template.slides,
            vec![
                SlideTemplate::content_slide(
                    "Introduction",
                    vec!["First bullet point".into(), "Second bullet point".into()]
                ),
                SlideTemplate::content_slide(
                    "Getting Started",
                    vec!["Install dependencies".into(), "Run the application".into()]
                ),
            ]
        );
    }

    #[test]
    fn test_two_slide_scenario() {
        let template = parse("# Intro\n- A\n- B\n\n---\n\n# Next\n- C", "Fallback").unwrap();

        assert_eq!(template.name, "Fallback");
        assert_eq!(template.slides.len(), 2);
        assert_eq!(content_of(&template.slides[0]), ("Intro", &["A".to_string(), "B".to_string()][..]));
        assert_eq!(content_of(&template.slides[1]), ("Next", &["C".to_string()][..]));
    }

    #[test]
    fn test_parse_with_front_matter() {
        let content = "---\ntitle: \"My Presentation\"\nauthor: \"Test Author\"\n---\n\n# Welcome\n- This is the introduction";

        let template = parse(content, "Untitled").unwrap();

        assert_eq!(template.name, "My Presentation");
        assert_eq!(template.slides.len(), 1);
        assert_eq!(template.slides[0].title(), "Welcome");
    }

    #[test]
    fn test_front_matter_without_title_uses_fallback() {
        let template = parse("---\nauthor: Someone\n---\n# Welcome", "deck").unwrap();
        assert_eq!(template.name, "deck");
        assert_eq!(template.slides.len(), 1);
    }

    #[test]
    fn test_front_matter_numeric_title() {
        let template = parse("---\ntitle: 2024\n---\n# Welcome", "deck").unwrap();
        assert_eq!(template.name, "2024");
    }

    #[test]
    fn test_front_matter_closing_at_end_of_document() {
        let template = parse("---\ntitle: Empty Deck\n---", "deck").unwrap();
        assert_eq!(template.name, "Empty Deck");
        assert!(template.is_empty());
    }

    #[test]
    fn test_invalid_yaml_front_matter() {
        let content = "---\ninvalid: yaml: content: here\n---\n\n# Test Slide\nContent here";

        let err = parse(content, "Untitled").unwrap_err();
        assert!(matches!(err, Error::MalformedFrontMatter(_)));
        assert!(err.to_string().starts_with("Invalid YAML front matter"));
    }

    #[test]
    fn test_non_mapping_front_matter_is_malformed() {
        let err = parse("---\n- a\n- b\n---\n# Slide", "Untitled").unwrap_err();
        assert!(matches!(err, Error::MalformedFrontMatter(_)));
    }

    #[test]
    fn test_parse_title_slide() {
        let template = parse("<!-- type: title -->\n# Hello\nSubtitle text", "Untitled").unwrap();
        assert_eq!(
            template.slides,
            vec![SlideTemplate::title_slide("Hello", "Subtitle text")]
        );
    }

    #[test]
    fn test_title_slide_without_subtitle() {
        let slide = MarkdownParser::new()
            .parse_slide("<!-- type: title -->\n# Alone")
            .unwrap();
        assert_eq!(slide, SlideTemplate::title_slide("Alone", ""));
    }

    #[test]
    fn test_directive_is_case_insensitive() {
        let slide = MarkdownParser::new()
            .parse_slide("<!-- type: SECTION -->\n# Part")
            .unwrap();
        assert_eq!(slide.slide_type(), SlideType::Section);
    }

    #[test]
    fn test_parse_image_slide() {
        let content = "<!-- type: image -->\n# Chart Results\n![Chart showing growth](path/to/chart.png)\nThis chart shows significant growth over time.";

        let template = parse(content, "Untitled").unwrap();

        assert_eq!(
            template.slides,
            vec![SlideTemplate::image_slide(
                "Chart Results",
                "path/to/chart.png",
                "Chart showing growth\nThis chart shows significant growth over time."
            )]
        );
    }

    #[test]
    fn test_parse_image_slide_simple_path() {
        let content = "<!-- type: image -->\n# Simple Image\nimage.jpg\nSimple caption text";

        let template = parse(content, "Untitled").unwrap();

        assert_eq!(
            template.slides,
            vec![SlideTemplate::image_slide("Simple Image", "image.jpg", "Simple caption text")]
        );
    }

    #[test]
    fn test_image_slide_defaults_to_placeholder() {
        let slide = MarkdownParser::new()
            .parse_slide("<!-- type: image -->\n# No Picture\nJust words\n!bang line")
            .unwrap();
        assert_eq!(
            slide,
            SlideTemplate::image_slide("No Picture", PLACEHOLDER_IMAGE, "Just words")
        );
    }

    #[test]
    fn test_image_extension_match_is_case_sensitive() {
        let slide = MarkdownParser::new()
            .parse_slide("<!-- type: image -->\n# Shout\nPHOTO.JPG")
            .unwrap();
        assert_eq!(
            slide,
            SlideTemplate::image_slide("Shout", PLACEHOLDER_IMAGE, "PHOTO.JPG")
        );
    }

    #[test]
    fn test_image_markup_without_alt() {
        let slide = MarkdownParser::new()
            .parse_slide("<!-- type: image -->\n# Plain\n![](img/a.gif)")
            .unwrap();
        assert_eq!(slide, SlideTemplate::image_slide("Plain", "img/a.gif", ""));
    }

    #[test]
    fn test_parse_section_slide() {
        let content = "<!-- type: section -->\n# Part Two\nOverview of advanced features\n\nAnd more";

        let template = parse(content, "Untitled").unwrap();

        assert_eq!(
            template.slides,
            vec![SlideTemplate::section_slide(
                "Part Two",
                "Overview of advanced features\nAnd more"
            )]
        );
    }

    #[test]
    fn test_parse_mixed_bullet_formats() {
        let content = "# Mixed Bullets\n- Dash bullet\n* Asterisk bullet\n+ Plus bullet\nRegular text line";

        let template = parse(content, "Untitled").unwrap();

        assert_eq!(
            template.slides,
            vec![SlideTemplate::content_slide(
                "Mixed Bullets",
                vec![
                    "Dash bullet".into(),
                    "Asterisk bullet".into(),
                    "Plus bullet".into(),
                    "Regular text line".into(),
                ]
            )]
        );
    }

    #[test]
    fn test_content_drops_later_headings_keeps_duplicates() {
        let slide = MarkdownParser::new()
            .parse_slide("# Main\n- A\n## Sub\n- A")
            .unwrap();
        assert_eq!(
            slide,
            SlideTemplate::content_slide("Main", vec!["A".into(), "A".into()])
        );
    }

    #[test]
    fn test_comparison_directive_yields_content() {
        let slide = MarkdownParser::new()
            .parse_slide("<!-- type: comparison -->\n# Us vs Them\n- Fast\n- Slow")
            .unwrap();
        assert_eq!(
            slide,
            SlideTemplate::content_slide("Us vs Them", vec!["Fast".into(), "Slow".into()])
        );
    }

    #[test]
    fn test_unknown_directive_falls_back_without_stripping() {
        let parser = MarkdownParser::new();

        // Before the heading the directive line is ignored like any pre-title text.
        let slide = parser.parse_slide("<!-- type: chart -->\n# Sales\n- Up").unwrap();
        assert_eq!(slide, SlideTemplate::content_slide("Sales", vec!["Up".into()]));

        // After the heading it stays in the body verbatim.
        let slide = parser.parse_slide("# Sales\n<!-- type: chart -->\n- Up").unwrap();
        assert_eq!(
            slide,
            SlideTemplate::content_slide(
                "Sales",
                vec!["<!-- type: chart -->".into(), "Up".into()]
            )
        );
    }

    #[test]
    fn test_known_directive_is_stripped_from_body() {
        let slide = MarkdownParser::new()
            .parse_slide("# Sales\n<!-- type: content -->\n- Up")
            .unwrap();
        assert_eq!(slide, SlideTemplate::content_slide("Sales", vec!["Up".into()]));
    }

    #[test]
    fn test_slide_without_title_is_skipped() {
        let parser = MarkdownParser::new();
        assert_eq!(parser.parse_slide("Just some content without a title"), None);
        assert_eq!(parser.parse_slide("#\n- empty heading"), None);
    }

    #[test]
    fn test_untitled_chunk_excluded_from_count() {
        let content = "# One\n- a\n\n---\n\n<!-- type: section -->\nNo heading here\n\n---\n\n# Two";

        let template = parse(content, "Untitled").unwrap();

        let titles: Vec<&str> = template.slides.iter().map(|s| s.title()).collect();
        assert_eq!(titles, vec!["One", "Two"]);
    }

    #[test]
    fn test_parse_empty_slide_content() {
        let template = parse("---\n\n---\n\n# Valid Slide\n- Content here", "Untitled").unwrap();

        assert_eq!(template.slides.len(), 1);
        assert_eq!(template.slides[0].title(), "Valid Slide");
    }

    #[test]
    fn test_doubled_separators_produce_no_phantom_slides() {
        let template = parse("# A\n\n---\n\n---\n\n# B\n\n---\n", "Untitled").unwrap();
        assert_eq!(template.slides.len(), 2);
    }

    #[test]
    fn test_empty_document() {
        let template = parse("   \n\n  ", "Nothing").unwrap();
        assert_eq!(template.name, "Nothing");
        assert!(template.is_empty());
    }

    #[test]
    fn test_split_front_matter() {
        assert_eq!(
            split_front_matter("---\ntitle: X\n---\n# Body"),
            Some(("title: X\n", "# Body"))
        );
        assert_eq!(split_front_matter("# No front matter\n---\n"), None);
        assert_eq!(split_front_matter("---\nnever closed"), None);
    }

    #[test]
    fn test_parse_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.md");

        let err = MarkdownParser::new().parse_file(&missing).unwrap_err();
        assert!(matches!(err, Error::TemplateNotFound(p) if p == missing));
    }

    #[test]
    fn test_create_presentation_from_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.md");
        std::fs::write(&path, "---\ntitle: \"File Test\"\n---\n\n# Test Slide\n- Test content").unwrap();

        let template = create_presentation_from_markdown(&path).unwrap();

        assert_eq!(template.name, "File Test");
        assert_eq!(template.slides.len(), 1);
        assert_eq!(template.slides[0].title(), "Test Slide");
    }

    #[test]
    fn test_parse_file_uses_stem_as_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weekly-sync.md");
        std::fs::write(&path, "# Agenda\n- Status").unwrap();

        let template = MarkdownParser::new().parse_file(&path).unwrap();
        assert_eq!(template.name, "weekly-sync");
    }

    #[test]
    fn test_sample_deck() {
        let template = parse(include_str!("../../../demos/sample_presentation.md"), "sample").unwrap();

        assert_eq!(template.name, "Building Decks with Prez");
        let kinds: Vec<SlideType> = template.slides.iter().map(|s| s.slide_type()).collect();
        assert_eq!(
            kinds,
            vec![
                SlideType::Title,
                SlideType::Content,
                SlideType::Section,
                SlideType::Image,
                SlideType::Content,
            ]
        );
    }
}
