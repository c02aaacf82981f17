//! Document ingestion
//!
//! Normalizes an uploaded file into plain text usable as AI context.
//! Plain-text uploads are read directly; PDF and Word documents are sent
//! to an external extraction capability.

mod classify;
mod document;
mod pipeline;
mod upload;

pub use classify::{
    classify, mime_essence, mime_type_for_path, ContentClass, ACCEPTED_EXTENSIONS,
    EXTRACTABLE_MIME_TYPES, PLAIN_TEXT_MIME_TYPES,
};
pub use document::{Attempt, DocumentSlot, IngestOutcome, IngestPhase, UploadedDocument};
pub use pipeline::IngestPipeline;
pub use upload::{FileBody, FileUpload, InMemoryBody, PathBody};
