//! Upload classification by declared MIME type and file name

use std::path::Path;

/// How an upload is turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentClass {
    /// Read directly as UTF-8 text
    PlainText,
    /// Sent to the text-extraction capability as base64
    Extractable,
}

pub const PLAIN_TEXT_MIME_TYPES: &[&str] = &["text/plain", "text/markdown"];

pub const EXTRACTABLE_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Extensions offered by the upload picker.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["txt", "md", "doc", "docx", "pdf"];

/// Strip parameters and normalize case: `Text/Plain; charset=utf-8` → `text/plain`.
pub fn mime_essence(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Classify an upload, or `None` if the type is not supported.
///
/// Markdown files are also recognized by their `.md` extension, since
/// pickers often report them without a MIME type.
pub fn classify(name: &str, mime_type: &str) -> Option<ContentClass> {
    let essence = mime_essence(mime_type);
    if PLAIN_TEXT_MIME_TYPES.contains(&essence.as_str())
        || name.to_ascii_lowercase().ends_with(".md")
    {
        return Some(ContentClass::PlainText);
    }
    if EXTRACTABLE_MIME_TYPES.contains(&essence.as_str()) {
        return Some(ContentClass::Extractable);
    }
    None
}

/// Detect MIME type from file extension.
pub fn mime_type_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match extension.as_deref() {
        Some("txt") => "text/plain",
        Some("md") | Some("markdown") => "text/markdown",
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("json") => "application/json",
        Some("html") | Some("htm") => "text/html",
        _ => "application/octet-stream",
    }
}
