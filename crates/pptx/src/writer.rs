//! PPTX presentation writer.
//!
//! [`PptxDeck`] collects slides in memory and serializes them as an Office
//! Open XML package when saved.

use crate::package::{self, rel_types, Relationship, GROUP_SHAPE_PROPS, NS_A, NS_P, NS_R, XML_DECL};
use prez_core::{Error, Frame, Paragraph, Result, SlideDeck, SlideLayout};
use quick_xml::escape::escape;
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Default slide width: 10 inches.
pub const DEFAULT_SLIDE_WIDTH: i64 = 9_144_000;

/// Default slide height: 7.5 inches.
pub const DEFAULT_SLIDE_HEIGHT: i64 = 6_858_000;

/// Height-to-width ratio used when an image's dimensions cannot be read.
const FALLBACK_ASPECT: f64 = 0.75;

/// Placeholder geometry on a 10" x 7.5" slide, scaled to the deck size.
mod geometry {
    use prez_core::Frame;

    pub const CENTER_TITLE: Frame = Frame { x: 685800, y: 2130425, width: 7772400, height: 1470025 };
    pub const SUBTITLE: Frame = Frame { x: 1371600, y: 3886200, width: 6400800, height: 1752600 };
    pub const TITLE: Frame = Frame { x: 457200, y: 274638, width: 8229600, height: 1143000 };
    pub const BODY: Frame = Frame { x: 457200, y: 1600200, width: 8229600, height: 4525963 };
    pub const SECTION_TITLE: Frame = Frame { x: 722313, y: 4406900, width: 7772400, height: 1362075 };
    pub const SECTION_BODY: Frame = Frame { x: 722313, y: 2906713, width: 7772400, height: 1500187 };
}

/// An image embedded in the package.
#[derive(Debug, Clone)]
struct Media {
    data: Vec<u8>,
    extension: &'static str,
}

impl Media {
    fn part_name(&self, number: usize) -> String {
        format!("image{}.{}", number, self.extension)
    }
}

/// A free-standing shape on a slide.
#[derive(Debug, Clone)]
enum Shape {
    TextBox { text: String, frame: Frame },
    Picture { media: usize, name: String, frame: Frame },
}

/// A slide waiting to be serialized.
#[derive(Debug, Clone)]
struct SlidePart {
    layout: SlideLayout,
    title: Option<String>,
    body: Option<Vec<Paragraph>>,
    shapes: Vec<Shape>,
}

/// An in-memory PPTX presentation.
#[derive(Debug, Clone)]
pub struct PptxDeck {
    slides: Vec<SlidePart>,
    media: Vec<Media>,
    slide_width: i64,
    slide_height: i64,
}

impl PptxDeck {
    /// Create an empty deck with the default 4:3 slide size.
    pub fn new() -> Self {
        Self {
            slides: Vec::new(),
            media: Vec::new(),
            slide_width: DEFAULT_SLIDE_WIDTH,
            slide_height: DEFAULT_SLIDE_HEIGHT,
        }
    }

    /// Set the slide size in EMUs.
    pub fn with_slide_size(mut self, width: i64, height: i64) -> Self {
        self.slide_width = width.max(1);
        self.slide_height = height.max(1);
        self
    }

    pub fn slide_width(&self) -> i64 {
        self.slide_width
    }

    pub fn slide_height(&self) -> i64 {
        self.slide_height
    }

    /// Serialize the package into a writer, returning the writer.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<W> {
        let mut zip = ZipWriter::new(writer);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        let extensions: Vec<&str> = self.media.iter().map(|m| m.extension).collect();
        write_part(&mut zip, options, "[Content_Types].xml", package::content_types_xml(self.slides.len(), &extensions).as_bytes())?;
        write_part(&mut zip, options, "_rels/.rels", package::package_rels_xml().as_bytes())?;
        write_part(
            &mut zip,
            options,
            "ppt/presentation.xml",
            package::presentation_xml(self.slides.len(), self.slide_width, self.slide_height).as_bytes(),
        )?;
        write_part(&mut zip, options, "ppt/_rels/presentation.xml.rels", package::presentation_rels_xml(self.slides.len()).as_bytes())?;
        write_part(&mut zip, options, "ppt/presProps.xml", package::pres_props_xml().as_bytes())?;
        write_part(&mut zip, options, "ppt/tableStyles.xml", package::table_styles_xml().as_bytes())?;
        write_part(&mut zip, options, "ppt/theme/theme1.xml", package::theme_xml().as_bytes())?;
        write_part(&mut zip, options, "ppt/slideMasters/slideMaster1.xml", package::slide_master_xml().as_bytes())?;
        write_part(&mut zip, options, "ppt/slideMasters/_rels/slideMaster1.xml.rels", package::slide_master_rels_xml().as_bytes())?;

        for layout in SlideLayout::ALL {
            let number = package::layout_number(layout);
            write_part(
                &mut zip,
                options,
                &format!("ppt/slideLayouts/slideLayout{}.xml", number),
                package::slide_layout_xml(layout).as_bytes(),
            )?;
            write_part(
                &mut zip,
                options,
                &format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", number),
                package::slide_layout_rels_xml().as_bytes(),
            )?;
        }

        for (idx, slide) in self.slides.iter().enumerate() {
            let number = idx + 1;
            let (xml, rels) = self.slide_xml(slide);
            write_part(&mut zip, options, &format!("ppt/slides/slide{}.xml", number), xml.as_bytes())?;
            write_part(&mut zip, options, &format!("ppt/slides/_rels/slide{}.xml.rels", number), rels.as_bytes())?;
        }

        // Media is stored as-is; it is already compressed.
        let stored = FileOptions::default().compression_method(CompressionMethod::Stored);
        for (idx, media) in self.media.iter().enumerate() {
            write_part(&mut zip, stored, &format!("ppt/media/{}", media.part_name(idx + 1)), &media.data)?;
        }

        zip.finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish package: {}", e)))
    }

    fn slide_mut(&mut self, slide: usize) -> Result<&mut SlidePart> {
        let count = self.slides.len();
        self.slides
            .get_mut(slide)
            .ok_or_else(|| Error::InvalidTemplate(format!("Slide index {} out of range ({} slides)", slide, count)))
    }

    /// Scale a frame defined on the default slide size to this deck.
    fn scaled(&self, frame: Frame) -> Frame {
        let sx = self.slide_width as f64 / DEFAULT_SLIDE_WIDTH as f64;
        let sy = self.slide_height as f64 / DEFAULT_SLIDE_HEIGHT as f64;
        Frame::new(
            (frame.x as f64 * sx).round() as i64,
            (frame.y as f64 * sy).round() as i64,
            (frame.width as f64 * sx).round() as i64,
            (frame.height as f64 * sy).round() as i64,
        )
    }

    /// Render a slide part and its relationships.
    fn slide_xml(&self, slide: &SlidePart) -> (String, String) {
        let mut xml = String::with_capacity(2048);
        let mut rels = vec![Relationship {
            id: 1,
            rel_type: rel_types::SLIDE_LAYOUT,
            target: format!("../slideLayouts/slideLayout{}.xml", package::layout_number(slide.layout)),
        }];

        xml.push_str(XML_DECL);
        let _ = write!(
            xml,
            r#"<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"><p:cSld><p:spTree>"#,
            NS_A, NS_R, NS_P
        );
        xml.push_str(GROUP_SHAPE_PROPS);

        let mut shape_id = 2;
        let (title_ph, title_frame, body_ph, body_frame) = match slide.layout {
            SlideLayout::Title => (
                r#"<p:ph type="ctrTitle"/>"#,
                geometry::CENTER_TITLE,
                r#"<p:ph type="subTitle" idx="1"/>"#,
                geometry::SUBTITLE,
            ),
            SlideLayout::TitleAndContent => (
                r#"<p:ph type="title"/>"#,
                geometry::TITLE,
                r#"<p:ph idx="1"/>"#,
                geometry::BODY,
            ),
            SlideLayout::SectionHeader => (
                r#"<p:ph type="title"/>"#,
                geometry::SECTION_TITLE,
                r#"<p:ph type="body" idx="1"/>"#,
                geometry::SECTION_BODY,
            ),
            SlideLayout::Blank => ("", geometry::TITLE, "", geometry::BODY),
        };

        if let Some(title) = &slide.title {
            let paragraphs = [Paragraph::new(title.as_str(), 0)];
            let body = text_body(&paragraphs, false);
            placeholder(&mut xml, shape_id, "Title", title_ph, self.scaled(title_frame), &body);
            shape_id += 1;
        }

        if let Some(paragraphs) = &slide.body {
            // Only content bodies are bulleted.
            let bullets = slide.layout == SlideLayout::TitleAndContent;
            let body = text_body(paragraphs, !bullets);
            placeholder(&mut xml, shape_id, "Content", body_ph, self.scaled(body_frame), &body);
            shape_id += 1;
        }

        for shape in &slide.shapes {
            match shape {
                Shape::TextBox { text, frame } => {
                    text_box(&mut xml, shape_id, text, *frame);
                }
                Shape::Picture { media, name, frame } => {
                    let rel_id = rels.len() + 1;
                    rels.push(Relationship {
                        id: rel_id,
                        rel_type: rel_types::IMAGE,
                        target: format!("../media/{}", self.media[*media].part_name(media + 1)),
                    });
                    picture(&mut xml, shape_id, name, rel_id, *frame);
                }
            }
            shape_id += 1;
        }

        xml.push_str("</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>");
        (xml, package::relationships_xml(&rels))
    }
}

impl Default for PptxDeck {
    fn default() -> Self {
        Self::new()
    }
}

impl SlideDeck for PptxDeck {
    fn add_slide(&mut self, layout: SlideLayout) -> Result<usize> {
        self.slides.push(SlidePart {
            layout,
            title: None,
            body: None,
            shapes: Vec::new(),
        });
        Ok(self.slides.len() - 1)
    }

    fn set_title(&mut self, slide: usize, text: &str) -> Result<()> {
        let part = self.slide_mut(slide)?;
        if part.layout == SlideLayout::Blank {
            return Err(Error::InvalidTemplate("Blank layout has no title placeholder".to_string()));
        }
        part.title = Some(text.to_string());
        Ok(())
    }

    fn set_body(&mut self, slide: usize, paragraphs: &[Paragraph]) -> Result<()> {
        let part = self.slide_mut(slide)?;
        if part.layout == SlideLayout::Blank {
            return Err(Error::InvalidTemplate("Blank layout has no body placeholder".to_string()));
        }
        part.body = Some(paragraphs.to_vec());
        Ok(())
    }

    fn add_text_box(&mut self, slide: usize, text: &str, frame: Frame) -> Result<()> {
        let frame = self.scaled(frame);
        self.slide_mut(slide)?.shapes.push(Shape::TextBox {
            text: text.to_string(),
            frame,
        });
        Ok(())
    }

    fn add_picture(&mut self, slide: usize, path: &Path, x: i64, y: i64, width: i64) -> Result<()> {
        // Validate the slide before reading the image.
        self.slide_mut(slide)?;

        let extension = media_extension(path)
            .ok_or_else(|| Error::ImageError(format!("Unsupported image type: {}", path.display())))?;
        let data = std::fs::read(path)?;

        let aspect = match image::image_dimensions(path) {
            Ok((w, h)) if w > 0 => h as f64 / w as f64,
            Ok(_) => FALLBACK_ASPECT,
            Err(e) => {
                log::warn!("Could not read dimensions of {}: {}", path.display(), e);
                FALLBACK_ASPECT
            }
        };

        let scaled = self.scaled(Frame::new(x, y, width, 0));
        let frame = Frame::new(scaled.x, scaled.y, scaled.width, (scaled.width as f64 * aspect).round() as i64);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.media.push(Media { data, extension });
        let media = self.media.len() - 1;
        self.slide_mut(slide)?
            .shapes
            .push(Shape::Picture { media, name, frame });

        log::debug!("Embedded {} on slide {}", path.display(), slide + 1);
        Ok(())
    }

    fn slide_count(&self) -> usize {
        self.slides.len()
    }

    fn save(&self, path: &Path) -> Result<()> {
        // Serialize fully before touching the destination.
        let package = self.write_to(Cursor::new(Vec::new()))?.into_inner();
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(&package)?;
        writer.flush()?;
        Ok(())
    }
}

/// Map an image path to the media extension used inside the package.
fn media_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "png" => Some("png"),
        "jpg" | "jpeg" => Some("jpeg"),
        "gif" => Some("gif"),
        "bmp" => Some("bmp"),
        _ => None,
    }
}

fn write_part<W: Write + Seek>(zip: &mut ZipWriter<W>, options: FileOptions, name: &str, data: &[u8]) -> Result<()> {
    zip.start_file(name, options)
        .map_err(|e| Error::ZipError(format!("Failed to start '{}': {}", name, e)))?;
    zip.write_all(data)
        .map_err(|e| Error::ZipError(format!("Failed to write '{}': {}", name, e)))?;
    Ok(())
}

fn xfrm(xml: &mut String, frame: Frame) {
    let _ = write!(
        xml,
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        frame.x, frame.y, frame.width, frame.height
    );
}

/// Render paragraphs as `<a:p>` elements. Embedded newlines become line breaks.
fn paragraphs_xml(paragraphs: &[Paragraph], no_bullets: bool) -> String {
    let mut xml = String::new();

    if paragraphs.is_empty() {
        xml.push_str(r#"<a:p><a:endParaRPr lang="en-US"/></a:p>"#);
        return xml;
    }

    for paragraph in paragraphs {
        xml.push_str("<a:p>");
        match (paragraph.level, no_bullets) {
            (_, true) => xml.push_str(r#"<a:pPr marL="0" indent="0"><a:buNone/></a:pPr>"#),
            (0, false) => {}
            (level, false) => {
                let _ = write!(xml, r#"<a:pPr lvl="{}"/>"#, level);
            }
        }
        for (i, line) in paragraph.text.split('\n').enumerate() {
            if i > 0 {
                xml.push_str("<a:br/>");
            }
            let _ = write!(xml, r#"<a:r><a:rPr lang="en-US" dirty="0"/><a:t>{}</a:t></a:r>"#, escape(line));
        }
        xml.push_str("</a:p>");
    }

    xml
}

fn text_body(paragraphs: &[Paragraph], no_bullets: bool) -> String {
    format!("<p:txBody><a:bodyPr/><a:lstStyle/>{}</p:txBody>", paragraphs_xml(paragraphs, no_bullets))
}

fn placeholder(xml: &mut String, id: usize, name: &str, ph: &str, frame: Frame, body: &str) {
    let _ = write!(
        xml,
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{0}" name="{1} {0}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr>{2}</p:nvPr></p:nvSpPr><p:spPr>"#,
        id, name, ph
    );
    xfrm(xml, frame);
    xml.push_str("</p:spPr>");
    xml.push_str(body);
    xml.push_str("</p:sp>");
}

fn text_box(xml: &mut String, id: usize, text: &str, frame: Frame) {
    let _ = write!(
        xml,
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{0}" name="TextBox {0}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>"#,
        id
    );
    xfrm(xml, frame);
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>"#);

    let paragraphs: Vec<Paragraph> = text.split('\n').map(|line| Paragraph::new(line, 0)).collect();
    xml.push_str(r#"<p:txBody><a:bodyPr wrap="square" rtlCol="0"><a:spAutoFit/></a:bodyPr><a:lstStyle/>"#);
    xml.push_str(&paragraphs_xml(&paragraphs, false));
    xml.push_str("</p:txBody></p:sp>");
}

fn picture(xml: &mut String, id: usize, name: &str, rel_id: usize, frame: Frame) {
    let _ = write!(
        xml,
        r#"<p:pic><p:nvPicPr><p:cNvPr id="{0}" name="Picture {0}" descr="{1}"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId{2}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr>"#,
        id,
        escape(name),
        rel_id
    );
    xfrm(xml, frame);
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#);
}
