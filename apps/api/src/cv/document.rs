//! Plain-text extraction from uploaded CV documents (PDF, DOCX, TXT).

use std::io::{Cursor, Read};
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Unsupported file format. Use PDF, DOCX or TXT.")]
    UnsupportedFormat,

    #[error("Failed to read PDF: {0}")]
    Pdf(String),

    #[error("Failed to read DOCX: {0}")]
    Docx(String),

    #[error("Document contains no extractable text")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentFormat {
    /// Picks the format from the file extension, case-insensitively.
    pub fn from_file_name(file_name: &str) -> Result<Self, DocumentError> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .ok_or(DocumentError::UnsupportedFormat)?;
        match extension.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "txt" => Ok(Self::PlainText),
            _ => Err(DocumentError::UnsupportedFormat),
        }
    }
}

/// Extracts the text of a document. Fails with `Empty` when only whitespace is left.
///
/// PDF and DOCX parsing is CPU-bound; async callers should run this on a blocking thread.
pub fn extract_text(format: DocumentFormat, bytes: &[u8]) -> Result<String, DocumentError> {
    let text = match format {
        DocumentFormat::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| DocumentError::Pdf(e.to_string()))?,
        DocumentFormat::Docx => extract_docx_text(bytes)?,
        DocumentFormat::PlainText => String::from_utf8_lossy(bytes).into_owned(),
    };

    if text.trim().is_empty() {
        return Err(DocumentError::Empty);
    }
    Ok(text)
}

fn extract_docx_text(bytes: &[u8]) -> Result<String, DocumentError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| DocumentError::Docx(e.to_string()))?;
    let mut document = archive
        .by_name("word/document.xml")
        .map_err(|e| DocumentError::Docx(e.to_string()))?;

    let mut xml = String::new();
    document
        .read_to_string(&mut xml)
        .map_err(|e| DocumentError::Docx(e.to_string()))?;

    Ok(docx_xml_to_text(&xml))
}

fn tag_pattern() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"))
}

/// Flattens WordprocessingML into text: one line per paragraph, tabs and breaks kept.
fn docx_xml_to_text(xml: &str) -> String {
    let xml = xml
        .replace("</w:p>", "\n")
        .replace("<w:tab/>", "\t")
        .replace("<w:br/>", "\n");
    let text = tag_pattern().replace_all(&xml, "");

    let text = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&");

    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
