//! Plain text decoding

use crate::document::{DocumentKind, ExtractedText};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decode as UTF-8, replacing invalid sequences
pub fn extract(data: &[u8]) -> ExtractedText {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let text = String::from_utf8_lossy(data).into_owned();
    ExtractedText::plain(DocumentKind::Text, text)
}
