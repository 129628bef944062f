//! DOCX text extraction
//!
//! Reads `word/document.xml` out of the OOXML archive and walks its runs.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::document::{DocumentKind, ExtractedText, ExtractionError, ExtractionResult};

const DOCUMENT_XML: &str = "word/document.xml";

/// Extract the raw text of a DOCX package
pub fn extract(data: &[u8]) -> ExtractionResult {
    let mut archive = ZipArchive::new(Cursor::new(data))
        .map_err(|e| ExtractionError::Corrupt(format!("Invalid DOCX archive: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_XML)
        .map_err(|e| ExtractionError::Corrupt(format!("DOCX missing {}: {}", DOCUMENT_XML, e)))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractionError::Corrupt(format!("Failed to read {}: {}", DOCUMENT_XML, e)))?;

    let text = document_text(&xml)?;
    Ok(ExtractedText::plain(DocumentKind::Docx, text))
}

/// Paragraph text, separated by blank lines
///
/// Paragraphs can nest (text boxes hold their own `w:p`), so open paragraphs
/// are kept on a stack and each one is emitted when it closes.
fn document_text(xml: &str) -> Result<String, ExtractionError> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut open: Vec<String> = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:t" => in_text = true,
                b"w:p" => open.push(String::new()),
                _ => {}
            },
            Ok(Event::Empty(e)) => match (e.name().as_ref(), open.last_mut()) {
                (b"w:tab", Some(current)) => current.push('\t'),
                (b"w:br" | b"w:cr", Some(current)) => current.push('\n'),
                (b"w:p", _) => paragraphs.push(String::new()),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let content = t
                    .unescape()
                    .map_err(|e| ExtractionError::Corrupt(format!("Invalid DOCX text: {}", e)))?;
                if let Some(current) = open.last_mut() {
                    current.push_str(&content);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => paragraphs.extend(open.pop()),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractionError::Corrupt(format!(
                    "Malformed {} at {}: {}",
                    DOCUMENT_XML,
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(paragraphs.join("\n\n"))
}
