//! Text extraction from document bytes

use crate::config::ExtractionConfig;
use crate::error::{CandidateFitError, Result};
use crate::input::file_detector::FileType;
use pulldown_cmark::{Event, Parser, Tag};
use quick_xml::events::Event as XmlEvent;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use std::panic;

pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        // The PDF parser panics on some malformed inputs; treat that like any
        // other parse failure.
        let outcome = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes));

        match outcome {
            Ok(Ok(text)) => Ok(text.replace('\u{000C}', "\n")),
            Ok(Err(e)) => Err(CandidateFitError::UnreadableDocument(format!(
                "Failed to extract text from PDF: {}",
                e
            ))),
            Err(_) => Err(CandidateFitError::UnreadableDocument(
                "PDF parser failed on malformed input".to_string(),
            )),
        }
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let content = std::str::from_utf8(bytes).map_err(|e| {
            CandidateFitError::UnreadableDocument(format!("Text is not valid UTF-8: {}", e))
        })?;
        Ok(content.to_string())
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let markdown_content = PlainTextExtractor.extract(bytes)?;

        let mut text = String::new();
        for event in Parser::new(&markdown_content) {
            match event {
                Event::Text(t) | Event::Code(t) => text.push_str(&t),
                Event::SoftBreak | Event::HardBreak => text.push('\n'),
                Event::End(Tag::Paragraph)
                | Event::End(Tag::Heading(..))
                | Event::End(Tag::Item)
                | Event::End(Tag::CodeBlock(_)) => text.push('\n'),
                _ => {}
            }
        }

        let lines: Vec<&str> = text.lines().map(|line| line.trim()).filter(|line| !line.is_empty()).collect();
        Ok(lines.join("\n"))
    }
}

/// Word (`.docx`) documents: paragraph text from `word/document.xml`.
pub struct DocxExtractor;

impl DocxExtractor {
    const DOCUMENT_PART: &'static str = "word/document.xml";

    fn unreadable(detail: impl std::fmt::Display) -> CandidateFitError {
        CandidateFitError::UnreadableDocument(format!("Failed to read Word document: {}", detail))
    }
}

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(Self::unreadable)?;
        let mut xml = String::new();
        {
            let mut part = archive.by_name(Self::DOCUMENT_PART).map_err(Self::unreadable)?;
            part.read_to_string(&mut xml).map_err(Self::unreadable)?;
        }

        let mut reader = Reader::from_str(&xml);
        let mut text = String::new();
        let mut in_run_text = false;

        loop {
            match reader.read_event().map_err(Self::unreadable)? {
                XmlEvent::Start(e) if e.name().as_ref() == b"w:t" => in_run_text = true,
                XmlEvent::End(e) => match e.name().as_ref() {
                    b"w:t" => in_run_text = false,
                    b"w:p" => text.push('\n'),
                    _ => {}
                },
                XmlEvent::Empty(e) => match e.name().as_ref() {
                    b"w:tab" => text.push('\t'),
                    b"w:br" | b"w:cr" | b"w:p" => text.push('\n'),
                    _ => {}
                },
                XmlEvent::Text(t) if in_run_text => text.push_str(&t.unescape().map_err(Self::unreadable)?),
                XmlEvent::Eof => break,
                _ => {}
            }
        }

        Ok(text)
    }
}

/// Picks an extractor for a document and rejects results that are not text.
pub struct DocumentTextExtractor {
    limits: ExtractionConfig,
}

impl DocumentTextExtractor {
    pub fn new(limits: ExtractionConfig) -> Self {
        Self { limits }
    }

    /// Extract readable text from raw document bytes.
    ///
    /// `name_hint` is a file name or path used for type detection when the
    /// bytes do not identify the format.
    pub fn extract(&self, bytes: &[u8], name_hint: &str) -> Result<String> {
        if bytes.len() > self.limits.max_document_bytes {
            return Err(CandidateFitError::InvalidInput(format!(
                "Document is {} bytes, limit is {}",
                bytes.len(),
                self.limits.max_document_bytes
            )));
        }

        let file_type = FileType::detect(name_hint, bytes);
        let extractor: &dyn TextExtractor = match file_type {
            FileType::Pdf => &PdfExtractor,
            FileType::Text => &PlainTextExtractor,
            FileType::Markdown => &MarkdownExtractor,
            FileType::Docx => &DocxExtractor,
            FileType::Unknown => {
                return Err(CandidateFitError::UnsupportedFileType(if name_hint.is_empty() {
                    "unrecognized document".to_string()
                } else {
                    name_hint.to_string()
                }));
            }
        };

        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(CandidateFitError::UnreadableDocument("Document is empty".to_string()));
        }

        log::info!("Extracting {} text from '{}'", file_type, name_hint);
        let text = extractor.extract(bytes)?;

        self.validate_text(text)
    }

    /// Reject text that is too short or mostly non-alphabetic (scanned PDFs,
    /// binary data mislabelled as text).
    fn validate_text(&self, text: String) -> Result<String> {
        let visible: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();

        if visible.len() < self.limits.min_text_chars {
            return Err(CandidateFitError::UnreadableDocument(format!(
                "Extracted text is too short ({} characters)",
                visible.len()
            )));
        }

        let alphabetic = visible.iter().filter(|c| c.is_alphabetic()).count();
        let ratio = alphabetic as f64 / visible.len() as f64;
        if ratio < self.limits.min_alphabetic_ratio {
            return Err(CandidateFitError::UnreadableDocument(format!(
                "Extracted text does not look like prose ({:.0}% letters)",
                ratio * 100.0
            )));
        }

        Ok(text.trim().to_string())
    }
}
