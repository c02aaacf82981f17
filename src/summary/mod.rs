//! Business-concept composition and AI summaries
//!
//! `compose_concept` builds the canonical "full business concept" string
//! used by every AI call. `canvas_digest` renders the non-empty blocks as
//! plain bullet lists for the summary request.

mod orchestrator;

pub use orchestrator::{SummaryOrchestrator, SummaryOutcome, SummaryState};

use crate::canvas::CanvasSnapshot;
use crate::ingest::UploadedDocument;

/// Typed concept plus the attached document, trailing whitespace trimmed.
pub fn compose_concept(concept: &str, document: Option<&UploadedDocument>) -> String {
    let mut full = concept.to_string();
    if let Some(doc) = document {
        full.push_str(&format!(
            "\n\n--- Csatolt dokumentum ({}) ---\n{}",
            doc.name, doc.content
        ));
    }
    full.trim_end().to_string()
}

/// Non-empty blocks as `Title:` followed by `- item` lines, separated by
/// blank lines.
pub fn canvas_digest(canvas: &CanvasSnapshot) -> String {
    canvas
        .non_empty_blocks()
        .map(|block| {
            let items: Vec<String> = block
                .items
                .iter()
                .map(|item| format!("- {}", item.text))
                .collect();
            format!("{}:\n{}", block.title, items.join("\n"))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The data sent to the summary capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    pub full_concept: String,
    pub canvas_digest: String,
}

impl SummaryRequest {
    pub fn compose(
        concept: &str,
        document: Option<&UploadedDocument>,
        canvas: &CanvasSnapshot,
    ) -> Self {
        Self {
            full_concept: compose_concept(concept, document),
            canvas_digest: canvas_digest(canvas),
        }
    }
}
