//! File type detection

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Text,
    Markdown,
    Docx,
    Unknown,
}

const PDF_MAGIC: &[u8] = b"%PDF";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "txt" | "text" => FileType::Text,
            "md" | "markdown" => FileType::Markdown,
            "docx" => FileType::Docx,
            _ => FileType::Unknown,
        }
    }

    /// Detect the type of a document from its bytes and an optional file name.
    ///
    /// PDF magic bytes win over the name. A ZIP container is only taken for
    /// a Word document when the name says so or there is no extension.
    /// Without an extension, valid UTF-8 is treated as plain text.
    pub fn detect(name_hint: &str, bytes: &[u8]) -> Self {
        if bytes.starts_with(PDF_MAGIC) {
            return FileType::Pdf;
        }

        match Path::new(name_hint).extension().and_then(|ext| ext.to_str()) {
            Some(ext) => Self::from_extension(ext),
            None if bytes.starts_with(ZIP_MAGIC) => FileType::Docx,
            None if std::str::from_utf8(bytes).is_ok() => FileType::Text,
            None => FileType::Unknown,
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileType::Pdf => write!(f, "PDF"),
            FileType::Text => write!(f, "plain text"),
            FileType::Markdown => write!(f, "Markdown"),
            FileType::Docx => write!(f, "Word"),
            FileType::Unknown => write!(f, "unknown"),
        }
    }
}
