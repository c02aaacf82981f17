//! The single attached-document slot and its per-attempt state machine
//!
//! ```text
//! plain text:  Idle → Reading → Ready | Failed
//! extractable: Idle → Reading → Extracting → Ready | Failed
//! ```
//!
//! Each attempt carries a generation. Completions for an attempt that has
//! been replaced or removed are discarded.

use super::classify::{classify, ContentClass};
use crate::error::{CanvasError, CanvasResult};
use crate::generation::{Generation, GenerationTracker};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// The attached document.
///
/// While `is_extracting` is set, `content` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedDocument {
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub is_extracting: bool,
}

impl UploadedDocument {
    pub fn ready(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            is_extracting: false,
        }
    }

    /// Placeholder shown while a binary document is being processed.
    pub fn extracting(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: String::new(),
            is_extracting: true,
        }
    }
}

/// Phase of the latest ingestion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IngestPhase {
    #[default]
    Idle,
    Reading,
    Extracting,
    Ready,
    Failed,
}

/// A started ingestion attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub generation: Generation,
    pub name: String,
    /// Normalized declared MIME type
    pub mime_type: String,
    pub class: ContentClass,
}

/// How an ingestion attempt ended.
#[derive(Debug)]
pub enum IngestOutcome {
    /// The document is attached and ready
    Ready(UploadedDocument),
    /// The attempt failed; the error message is on display
    Failed(CanvasError),
    /// A newer selection or a removal replaced this attempt; nothing applied
    Superseded(Generation),
}

impl IngestOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn error(&self) -> Option<&CanvasError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Holds at most one document plus the user-facing ingestion error.
#[derive(Debug, Default)]
pub struct DocumentSlot {
    document: Option<UploadedDocument>,
    error: Option<String>,
    phase: IngestPhase,
    attempts: GenerationTracker,
}

impl DocumentSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> Option<&UploadedDocument> {
        self.document.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> IngestPhase {
        self.phase
    }

    pub fn is_extracting(&self) -> bool {
        self.document.as_ref().is_some_and(|d| d.is_extracting)
    }

    /// Start an attempt for a newly selected file.
    ///
    /// Unsupported types are rejected without touching the document, the
    /// phase, or any attempt already in flight. Extractable uploads
    /// immediately replace the document with a processing placeholder.
    pub fn begin(&mut self, name: &str, mime_type: &str) -> CanvasResult<Attempt> {
        self.error = None;
        let Some(class) = classify(name, mime_type) else {
            let err = CanvasError::UnsupportedFileType {
                name: name.to_string(),
                mime_type: mime_type.to_string(),
            };
            self.error = Some(err.user_message().to_string());
            return Err(err);
        };

        let attempt = Attempt {
            generation: self.attempts.advance(),
            name: name.to_string(),
            mime_type: super::classify::mime_essence(mime_type),
            class,
        };
        self.phase = IngestPhase::Reading;
        if class == ContentClass::Extractable {
            self.document = Some(UploadedDocument::extracting(name));
        }
        debug!(document = name, generation = %attempt.generation, ?class, "ingestion started");
        Ok(attempt)
    }

    /// Raw bytes are in; the extraction call is about to be issued.
    ///
    /// Returns false if the attempt is no longer current.
    pub fn mark_extracting(&mut self, attempt: &Attempt) -> bool {
        if !self.attempts.is_current(attempt.generation) {
            return false;
        }
        self.phase = IngestPhase::Extracting;
        true
    }

    /// Apply the result of an attempt, unless it has been superseded.
    ///
    /// Success replaces the document only; an error raised by a later
    /// rejected selection stays visible.
    pub fn complete(&mut self, attempt: &Attempt, result: CanvasResult<String>) -> IngestOutcome {
        if !self.attempts.is_current(attempt.generation) {
            debug!(
                document = %attempt.name,
                generation = %attempt.generation,
                "discarding stale ingestion result"
            );
            return IngestOutcome::Superseded(attempt.generation);
        }
        match result {
            Ok(content) => {
                let document = UploadedDocument::ready(&attempt.name, content);
                info!(document = %attempt.name, chars = document.content.chars().count(), "document ready");
                self.document = Some(document.clone());
                self.phase = IngestPhase::Ready;
                IngestOutcome::Ready(document)
            }
            Err(err) => {
                self.document = None;
                self.error = Some(err.user_message().to_string());
                self.phase = IngestPhase::Failed;
                IngestOutcome::Failed(err)
            }
        }
    }

    /// Detach the document and clear the error. Any attempt in flight
    /// becomes stale.
    pub fn remove(&mut self) {
        self.attempts.invalidate();
        self.document = None;
        self.error = None;
        self.phase = IngestPhase::Idle;
    }

    /// Attach an already extracted document (e.g. from a saved session).
    pub fn restore(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.attempts.invalidate();
        self.document = Some(UploadedDocument::ready(name, content));
        self.error = None;
        self.phase = IngestPhase::Ready;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::CapabilityError;
    use crate::error::{EXTRACTION_FAILURE_MESSAGE, UNSUPPORTED_FILE_TYPE_MESSAGE};

    const PDF: &str = "application/pdf";

    fn extraction_error(name: &str) -> CanvasError {
        CanvasError::Extraction {
            name: name.to_string(),
            source: CapabilityError::Failed("bad scan".to_string()),
        }
    }

    #[test]
    fn plain_text_attempt_keeps_previous_document_until_read() {
        let mut slot = DocumentSlot::new();
        slot.restore("regi.txt", "régi");

        let attempt = slot.begin("uj.txt", "text/plain").unwrap();
        assert_eq!(slot.phase(), IngestPhase::Reading);
        assert_eq!(slot.document().unwrap().name, "regi.txt");

        let outcome = slot.complete(&attempt, Ok("új".to_string()));
        assert!(outcome.is_ready());
        assert_eq!(slot.document(), Some(&UploadedDocument::ready("uj.txt", "új")));
        assert_eq!(slot.phase(), IngestPhase::Ready);
    }

    #[test]
    fn extractable_attempt_shows_placeholder_immediately() {
        let mut slot = DocumentSlot::new();
        let attempt = slot.begin("deck.pdf", PDF).unwrap();

        let doc = slot.document().unwrap();
        assert!(doc.is_extracting);
        assert!(doc.content.is_empty());
        assert!(slot.is_extracting());

        assert!(slot.mark_extracting(&attempt));
        assert_eq!(slot.phase(), IngestPhase::Extracting);
    }

    #[test]
    fn unsupported_type_leaves_slot_untouched() {
        let mut slot = DocumentSlot::new();
        slot.restore("jo.md", "tartalom");

        let err = slot.begin("kep.png", "image/png").unwrap_err();
        assert!(matches!(err, CanvasError::UnsupportedFileType { .. }));
        assert_eq!(slot.error(), Some(UNSUPPORTED_FILE_TYPE_MESSAGE));
        assert_eq!(slot.document().unwrap().name, "jo.md");
        assert_eq!(slot.phase(), IngestPhase::Ready);
    }

    #[test]
    fn failure_clears_document_and_sets_message() {
        let mut slot = DocumentSlot::new();
        let attempt = slot.begin("deck.pdf", PDF).unwrap();

        let outcome = slot.complete(&attempt, Err(extraction_error("deck.pdf")));
        assert!(outcome.error().is_some());
        assert!(slot.document().is_none());
        assert_eq!(slot.error(), Some(EXTRACTION_FAILURE_MESSAGE));
        assert_eq!(slot.phase(), IngestPhase::Failed);
    }

    #[test]
    fn new_selection_clears_previous_error() {
        let mut slot = DocumentSlot::new();
        let _ = slot.begin("kep.png", "image/png");
        assert!(slot.error().is_some());

        slot.begin("jegyzet.txt", "text/plain").unwrap();
        assert!(slot.error().is_none());
    }

    #[test]
    fn completion_after_removal_is_discarded() {
        let mut slot = DocumentSlot::new();
        let attempt = slot.begin("deck.pdf", PDF).unwrap();
        slot.remove();

        assert!(!slot.mark_extracting(&attempt));
        let outcome = slot.complete(&attempt, Ok("késő".to_string()));
        assert!(matches!(outcome, IngestOutcome::Superseded(_)));
        assert!(slot.document().is_none());
        assert_eq!(slot.phase(), IngestPhase::Idle);
    }

    #[test]
    fn older_attempt_cannot_overwrite_newer_document() {
        let mut slot = DocumentSlot::new();
        let first = slot.begin("elso.pdf", PDF).unwrap();
        let second = slot.begin("masodik.txt", "text/plain").unwrap();

        slot.complete(&second, Ok("második".to_string()));
        let late = slot.complete(&first, Err(extraction_error("elso.pdf")));

        assert!(matches!(late, IngestOutcome::Superseded(_)));
        assert_eq!(slot.document().unwrap().content, "második");
        assert!(slot.error().is_none());
    }

    #[test]
    fn rejection_during_extraction_survives_late_success() {
        let mut slot = DocumentSlot::new();
        let attempt = slot.begin("deck.pdf", PDF).unwrap();
        let _ = slot.begin("kep.png", "image/png");

        let outcome = slot.complete(&attempt, Ok("kinyert".to_string()));
        assert!(outcome.is_ready());
        assert_eq!(slot.document().unwrap().content, "kinyert");
        assert_eq!(slot.error(), Some(UNSUPPORTED_FILE_TYPE_MESSAGE));
    }

    #[test]
    fn document_serializes_with_camel_case_flag() {
        let json = serde_json::to_value(UploadedDocument::extracting("a.pdf")).unwrap();
        assert_eq!(json["isExtracting"], true);
        assert_eq!(json["content"], "");
    }
}
