//! Async ingestion pipeline
//!
//! Turns a selected file into plain text usable as AI context:
//! 1. Classify and start an attempt (synchronous, may reject)
//! 2. Read the body (suspension point)
//! 3. For binary formats, base64-encode and call the extractor (suspension point)
//! 4. Apply the result if the attempt is still current
//!
//! The slot lock is never held across an await.

use super::classify::ContentClass;
use super::document::{Attempt, DocumentSlot, IngestOutcome, IngestPhase, UploadedDocument};
use super::upload::FileUpload;
use crate::ai::{AiGate, CapabilityError, ExtractionRequest, TextExtractor};
use crate::error::{CanvasError, CanvasResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{error, warn};

const UTF8_BOM: &str = "\u{feff}";

/// Single-slot document ingestion.
pub struct IngestPipeline {
    slot: Mutex<DocumentSlot>,
    extractor: Arc<dyn TextExtractor>,
    gate: AiGate,
}

impl IngestPipeline {
    pub fn new(extractor: Arc<dyn TextExtractor>, gate: AiGate) -> Self {
        Self {
            slot: Mutex::new(DocumentSlot::new()),
            extractor,
            gate,
        }
    }

    fn slot(&self) -> MutexGuard<'_, DocumentSlot> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn document(&self) -> Option<UploadedDocument> {
        self.slot().document().cloned()
    }

    /// User-facing message of the last failed ingestion, if any.
    pub fn error(&self) -> Option<String> {
        self.slot().error().map(str::to_string)
    }

    pub fn phase(&self) -> IngestPhase {
        self.slot().phase()
    }

    pub fn is_extracting(&self) -> bool {
        self.slot().is_extracting()
    }

    /// Ingest a newly selected file, replacing any attached document.
    pub async fn ingest(&self, upload: FileUpload) -> IngestOutcome {
        let attempt = match self.slot().begin(&upload.name, &upload.mime_type) {
            Ok(attempt) => attempt,
            Err(err) => {
                warn!(document = %upload.name, mime_type = %upload.mime_type, "unsupported upload rejected");
                return IngestOutcome::Failed(err);
            }
        };

        let result = match attempt.class {
            ContentClass::PlainText => read_text(&upload, &attempt).await,
            ContentClass::Extractable => match read_raw(&upload, &attempt).await {
                Ok(bytes) => {
                    if !self.slot().mark_extracting(&attempt) {
                        return IngestOutcome::Superseded(attempt.generation);
                    }
                    self.extract(bytes, &attempt).await
                }
                Err(err) => Err(err),
            },
        };

        if let Err(err) = &result {
            error!(document = %attempt.name, generation = %attempt.generation, error = %err, "document ingestion failed");
        }
        self.slot().complete(&attempt, result)
    }

    /// Detach the document and clear the error, regardless of any
    /// extraction still in flight.
    pub fn remove_document(&self) {
        self.slot().remove();
    }

    /// Attach already extracted text without going through a file.
    pub fn restore(&self, name: impl Into<String>, content: impl Into<String>) {
        self.slot().restore(name, content);
    }

    async fn extract(&self, bytes: Vec<u8>, attempt: &Attempt) -> CanvasResult<String> {
        let request = ExtractionRequest {
            base64_content: STANDARD.encode(bytes),
            mime_type: attempt.mime_type.clone(),
        };
        let text = self
            .gate
            .call(self.extractor.extract_text(request))
            .await
            .and_then(|text| {
                if text.trim().is_empty() {
                    Err(CapabilityError::EmptyResponse)
                } else {
                    Ok(text)
                }
            });
        text.map_err(|source| CanvasError::Extraction {
            name: attempt.name.clone(),
            source,
        })
    }
}

async fn read_raw(upload: &FileUpload, attempt: &Attempt) -> CanvasResult<Vec<u8>> {
    upload
        .read_bytes()
        .await
        .map_err(|source| CanvasError::FileRead {
            name: attempt.name.clone(),
            class: attempt.class,
            source,
        })
}

async fn read_text(upload: &FileUpload, attempt: &Attempt) -> CanvasResult<String> {
    let bytes = read_raw(upload, attempt).await?;
    Ok(decode_text(&bytes))
}

/// Decode as UTF-8, dropping a leading BOM and replacing invalid sequences.
fn decode_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix(UTF8_BOM).unwrap_or(&*text).to_string()
}
