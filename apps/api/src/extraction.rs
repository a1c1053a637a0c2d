//! Document text extraction for uploaded resumes.
//!
//! PDF and DOCX parsing are CPU-bound and can panic on malformed input, so they
//! run inside `spawn_blocking`; a panic there surfaces as a `JoinError` and is
//! reported as an unreadable document.

use std::io::{Cursor, Read};

use anyhow::Context;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use crate::errors::AppError;

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
/// Main body part of a WordprocessingML package.
const DOCX_BODY: &str = "word/document.xml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

/// Picks the document kind from the file extension, falling back to the content type.
pub fn detect_kind(
    file_name: Option<&str>,
    content_type: Option<&str>,
) -> Result<DocumentKind, AppError> {
    let extension = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_lowercase());

    match (extension.as_deref(), content_type) {
        (Some("pdf"), _) => Ok(DocumentKind::Pdf),
        (Some("docx"), _) => Ok(DocumentKind::Docx),
        (Some("txt"), _) => Ok(DocumentKind::PlainText),
        (None, Some("application/pdf")) => Ok(DocumentKind::Pdf),
        (None, Some(DOCX_CONTENT_TYPE)) => Ok(DocumentKind::Docx),
        (None, Some(ct)) if ct.starts_with("text/plain") => Ok(DocumentKind::PlainText),
        (ext, ct) => Err(AppError::UnsupportedFormat(format!(
            "Unsupported file type '{}'. Only PDF, DOCX and plain-text uploads are supported.",
            ext.or(ct).unwrap_or("unknown")
        ))),
    }
}

/// Returns the plain text of an uploaded document.
pub async fn extract_text(
    bytes: Vec<u8>,
    file_name: Option<&str>,
    content_type: Option<&str>,
) -> Result<String, AppError> {
    let kind = detect_kind(file_name, content_type)?;

    let text = match kind {
        DocumentKind::PlainText => String::from_utf8_lossy(&bytes).into_owned(),
        DocumentKind::Pdf => tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&bytes)
        })
        .await
        .map_err(|e| AppError::UnprocessableEntity(format!("Could not read PDF: {e}")))?
        .map_err(|e| AppError::UnprocessableEntity(format!("Could not read PDF: {e}")))?,
        DocumentKind::Docx => tokio::task::spawn_blocking(move || docx_text(&bytes))
            .await
            .map_err(|e| AppError::UnprocessableEntity(format!("Could not read DOCX: {e}")))?
            .map_err(|e| AppError::UnprocessableEntity(format!("Could not read DOCX: {e:#}")))?,
    };

    if text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "No text could be extracted from the uploaded document".to_string(),
        ));
    }

    debug!(?kind, chars = text.len(), "Extracted document text");
    Ok(text)
}

/// Concatenates the `w:t` runs of the document body, one line per paragraph.
fn docx_text(bytes: &[u8]) -> anyhow::Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).context("not a DOCX package")?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY)
        .with_context(|| format!("{DOCX_BODY} is missing"))?
        .read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    let mut text = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" | b"w:br" => text.push('\n'),
                b"w:tab" => text.push('\t'),
                _ => {}
            },
            Event::Text(t) if in_text_run => text.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

/// Minimal DOCX package with one paragraph per entry.
#[cfg(test)]
pub(crate) fn docx_fixture(paragraphs: &[&str]) -> Vec<u8> {
    use std::io::Write;

    let body: String = paragraphs
        .iter()
        .map(|p| format!(r#"<w:p><w:r><w:t xml:space="preserve">{p}</w:t></w:r></w:p>"#))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file(DOCX_BODY, zip::write::FileOptions::default())
        .unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}
