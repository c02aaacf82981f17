//! Error taxonomy for the canvas core
//!
//! Every error is recovered where it occurs and surfaced to the user as a
//! short message. The underlying cause stays reachable through
//! `std::error::Error::source` for whatever logs it.

use crate::ai::CapabilityError;
use crate::ingest::ContentClass;
use thiserror::Error;

pub const UNSUPPORTED_FILE_TYPE_MESSAGE: &str =
    "Nem támogatott fájltípus. Támogatott: .txt, .md, .doc, .docx, .pdf";
pub const TEXT_READ_FAILURE_MESSAGE: &str = "Hiba a szöveges fájl olvasása közben.";
pub const RAW_READ_FAILURE_MESSAGE: &str = "Hiba a fájl beolvasása közben.";
pub const EXTRACTION_FAILURE_MESSAGE: &str = "Hiba a szöveg kinyerése közben a dokumentumból.";
pub const SUMMARY_FAILURE_MESSAGE: &str =
    "Hiba történt az összefoglaló készítése közben. Kérjük, próbálja újra később.";
pub const SUGGESTION_FAILURE_MESSAGE: &str =
    "Hiba történt a javaslatok generálása közben. Kérjük, próbálja újra később.";

/// Errors raised by the canvas core.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("unsupported file type '{mime_type}' for {name}")]
    UnsupportedFileType { name: String, mime_type: String },

    #[error("failed to read {name}: {source}")]
    FileRead {
        name: String,
        class: ContentClass,
        #[source]
        source: std::io::Error,
    },

    #[error("text extraction failed for {name}: {source}")]
    Extraction {
        name: String,
        #[source]
        source: CapabilityError,
    },

    #[error("summary generation failed: {0}")]
    SummaryGeneration(#[source] CapabilityError),

    #[error("suggestion generation failed for block '{block}': {source}")]
    SuggestionGeneration {
        block: String,
        #[source]
        source: CapabilityError,
    },
}

impl CanvasError {
    /// The fixed message shown to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::UnsupportedFileType { .. } => UNSUPPORTED_FILE_TYPE_MESSAGE,
            Self::FileRead { class: ContentClass::PlainText, .. } => TEXT_READ_FAILURE_MESSAGE,
            Self::FileRead { class: ContentClass::Extractable, .. } => RAW_READ_FAILURE_MESSAGE,
            Self::Extraction { .. } => EXTRACTION_FAILURE_MESSAGE,
            Self::SummaryGeneration(_) => SUMMARY_FAILURE_MESSAGE,
            Self::SuggestionGeneration { .. } => SUGGESTION_FAILURE_MESSAGE,
        }
    }

    /// Whether this failure clears the attached document.
    pub fn clears_document(&self) -> bool {
        matches!(self, Self::FileRead { .. } | Self::Extraction { .. })
    }
}

/// Result type for canvas operations
pub type CanvasResult<T> = Result<T, CanvasError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn read_failure_message_depends_on_content_class() {
        let text = CanvasError::FileRead {
            name: "notes.txt".to_string(),
            class: ContentClass::PlainText,
            source: std::io::Error::new(std::io::ErrorKind::Other, "boom"),
        };
        let raw = CanvasError::FileRead {
            name: "deck.pdf".to_string(),
            class: ContentClass::Extractable,
            source: std::io::Error::new(std::io::ErrorKind::Other, "boom"),
        };
        assert_eq!(text.user_message(), TEXT_READ_FAILURE_MESSAGE);
        assert_eq!(raw.user_message(), RAW_READ_FAILURE_MESSAGE);
    }

    #[test]
    fn underlying_cause_is_reachable() {
        let err = CanvasError::SummaryGeneration(CapabilityError::Failed("quota".to_string()));
        let source = err.source().expect("cause should be attached");
        assert!(source.to_string().contains("quota"));
        assert!(!err.clears_document());
    }
}
