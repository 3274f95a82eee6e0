//! PPTX presentation reader.
//!
//! Reads slide titles and text back out of a `.pptx` package, in
//! presentation order.

use prez_core::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Text content of one slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckSlide {
    /// 1-based slide number.
    pub number: usize,

    /// Text of the title placeholder, if the slide has one.
    pub title: Option<String>,

    /// Other text shapes, top-to-bottom then left-to-right.
    pub texts: Vec<String>,

    /// Number of pictures on the slide.
    pub pictures: usize,
}

/// Reader for PPTX (Office Open XML) files.
pub struct PptxReader;

impl PptxReader {
    /// Create a new PPTX reader.
    pub fn new() -> Self {
        Self
    }

    /// Read a PPTX file from disk.
    pub fn read_path(&self, path: &Path) -> Result<Vec<DeckSlide>> {
        let file = File::open(path)?;
        self.read(BufReader::new(file))
    }

    /// Read a PPTX package from a reader.
    pub fn read<R: Read + Seek>(&self, reader: R) -> Result<Vec<DeckSlide>> {
        let mut archive =
            ZipArchive::new(reader).map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let slide_order = self.get_slide_order(&mut archive)?;

        let mut slides = Vec::with_capacity(slide_order.len());
        for (idx, slide_path) in slide_order.iter().enumerate() {
            slides.push(self.read_slide(&mut archive, slide_path, idx + 1)?);
        }

        Ok(slides)
    }

    /// Get the ordered list of slide paths from the presentation relationships.
    fn get_slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels_content = self.read_file_from_archive(archive, "ppt/_rels/presentation.xml.rels")?;
        let mut slides: Vec<(String, Option<usize>)> = Vec::new();

        let mut reader = Reader::from_str(&rels_content);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) if e.name().as_ref() == b"Relationship" => {
                    let mut rel_type = String::new();
                    let mut target = String::new();
                    let mut id = String::new();

                    for attr in e.attributes().flatten() {
                        let value = String::from_utf8_lossy(&attr.value).to_string();
                        match attr.key.as_ref() {
                            b"Type" => rel_type = value,
                            b"Target" => target = value,
                            b"Id" => id = value,
                            _ => {}
                        }
                    }

                    if is_slide_relationship(&rel_type) {
                        let order_num = extract_slide_number(&id).or_else(|| extract_slide_number(&target));
                        let full_path = match target.strip_prefix('/') {
                            Some(absolute) => absolute.to_string(),
                            None => format!("ppt/{}", target),
                        };
                        slides.push((full_path, order_num));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!("Error parsing relationships: {}", e)));
                }
                _ => {}
            }
        }

        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        Ok(slides.into_iter().map(|(path, _)| path).collect())
    }

    /// Read a single slide from the archive.
    fn read_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
        number: usize,
    ) -> Result<DeckSlide> {
        let content = self.read_file_from_archive(archive, slide_path)?;
        let mut shapes = extract_shapes_from_xml(&content);

        // Reading order: top-to-bottom, then left-to-right.
        shapes.sort_by(|a, b| a.y.cmp(&b.y).then(a.x.cmp(&b.x)));

        let mut slide = DeckSlide {
            number,
            title: None,
            texts: Vec::new(),
            pictures: 0,
        };

        for shape in shapes {
            if shape.is_picture {
                slide.pictures += 1;
            } else if shape.is_title && slide.title.is_none() {
                slide.title = Some(shape.text);
            } else if !shape.text.is_empty() {
                slide.texts.push(shape.text);
            }
        }

        Ok(slide)
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(&self, archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }
}

impl Default for PptxReader {
    fn default() -> Self {
        Self::new()
    }
}

/// A shape found in slide XML.
#[derive(Debug, Default)]
struct ShapeInfo {
    text: String,
    x: i64,
    y: i64,
    is_title: bool,
    is_picture: bool,
}

/// Whether a relationship type points at a slide (not a layout or master).
fn is_slide_relationship(rel_type: &str) -> bool {
    rel_type.ends_with("/slide")
}

/// Extract shapes with text and position from slide XML.
fn extract_shapes_from_xml(xml_content: &str) -> Vec<ShapeInfo> {
    let mut shapes = Vec::new();
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(true);

    let mut current: Option<ShapeInfo> = None;
    let mut in_paragraph = false;
    let mut paragraphs = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" | b"pic" => {
                    current = Some(ShapeInfo {
                        is_picture: local_name(e.name().as_ref()) == b"pic",
                        ..ShapeInfo::default()
                    });
                    paragraphs = 0;
                }
                b"p" => {
                    if let Some(shape) = current.as_mut() {
                        if paragraphs > 0 {
                            shape.text.push('\n');
                        }
                        paragraphs += 1;
                        in_paragraph = true;
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(ref e)) => {
                let Some(shape) = current.as_mut() else {
                    continue;
                };
                match local_name(e.name().as_ref()) {
                    b"off" => {
                        for attr in e.attributes().flatten() {
                            let value = String::from_utf8_lossy(&attr.value).parse::<i64>().ok();
                            match (attr.key.as_ref(), value) {
                                (b"x", Some(x)) => shape.x = x,
                                (b"y", Some(y)) => shape.y = y,
                                _ => {}
                            }
                        }
                    }
                    b"ph" => {
                        shape.is_title = e.attributes().flatten().any(|attr| {
                            attr.key.as_ref() == b"type"
                                && matches!(&*attr.value, b"title" | b"ctrTitle")
                        });
                    }
                    b"br" if in_paragraph => shape.text.push('\n'),
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) => {
                if let (true, Some(shape)) = (in_paragraph, current.as_mut()) {
                    let text = e.unescape().unwrap_or_default();
                    shape.text.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" | b"pic" => {
                    if let Some(mut shape) = current.take() {
                        shape.text = shape.text.trim().to_string();
                        shapes.push(shape);
                    }
                    in_paragraph = false;
                }
                b"p" => in_paragraph = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                log::warn!("XML parsing error, keeping shapes read so far: {}", e);
                break;
            }
            _ => {}
        }
    }

    shapes
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

/// Extract a slide number from a string like "rId2" or "slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}
