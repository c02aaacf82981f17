//! CanvasSession: the interface presentation code calls into
//!
//! Owns the canvas store, the typed business concept, the document slot,
//! the summary and suggestion surfaces, and the selection set. Every
//! synchronous mutation is applied under its own lock, so a read right
//! after a call sees it fully applied. Async operations never hold a lock
//! across a suspension point.

use crate::ai::{AiGate, SuggestionSource, Summarizer, TextExtractor, Unconfigured};
use crate::canvas::{BlockCatalog, CanvasSnapshot, CanvasStore, ItemId};
use crate::config::CanvasConfig;
use crate::export::{
    read_sections, render_full, render_items, render_selections, ExportArtifact, FullExport,
    Projection,
};
use crate::ingest::{FileUpload, IngestOutcome, IngestPipeline, UploadedDocument};
use crate::selection::SelectionSet;
use crate::suggest::{SuggestionBoard, SuggestionOutcome, SuggestionState};
use crate::summary::{compose_concept, SummaryOrchestrator, SummaryOutcome, SummaryRequest, SummaryState};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::info;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// The external AI collaborators.
#[derive(Clone)]
pub struct AiServices {
    pub extractor: Arc<dyn TextExtractor>,
    pub summarizer: Arc<dyn Summarizer>,
    pub suggestions: Arc<dyn SuggestionSource>,
}

impl AiServices {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        summarizer: Arc<dyn Summarizer>,
        suggestions: Arc<dyn SuggestionSource>,
    ) -> Self {
        Self {
            extractor,
            summarizer,
            suggestions,
        }
    }

    /// Every capability fails as unavailable.
    pub fn unconfigured() -> Self {
        Self::new(Arc::new(Unconfigured), Arc::new(Unconfigured), Arc::new(Unconfigured))
    }
}

pub struct CanvasSession {
    store: Mutex<CanvasStore>,
    concept: Mutex<String>,
    selections: Mutex<SelectionSet>,
    ingest: IngestPipeline,
    summary: SummaryOrchestrator,
    suggestions: SuggestionBoard,
}

impl CanvasSession {
    pub fn new(catalog: BlockCatalog, services: AiServices, gate: AiGate) -> Self {
        Self {
            store: Mutex::new(CanvasStore::new(catalog)),
            concept: Mutex::new(String::new()),
            selections: Mutex::new(SelectionSet::new()),
            ingest: IngestPipeline::new(services.extractor, gate),
            summary: SummaryOrchestrator::new(services.summarizer, gate),
            suggestions: SuggestionBoard::new(services.suggestions, gate),
        }
    }

    pub fn from_config(config: &CanvasConfig, services: AiServices) -> Self {
        Self::new(config.block_catalog(), services, config.gate())
    }

    // === Canvas ===

    pub fn catalog(&self) -> BlockCatalog {
        lock(&self.store).catalog().clone()
    }

    pub fn snapshot(&self) -> CanvasSnapshot {
        lock(&self.store).snapshot()
    }

    pub fn add_item(&self, block_id: &str, text: &str) -> Option<ItemId> {
        lock(&self.store).add_item(block_id, text)
    }

    pub fn add_items<I, S>(&self, block_id: &str, texts: I) -> Vec<ItemId>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        lock(&self.store).add_items(block_id, texts)
    }

    pub fn update_item(&self, block_id: &str, item_id: &ItemId, text: &str) -> bool {
        lock(&self.store).update_item(block_id, item_id, text)
    }

    pub fn delete_item(&self, block_id: &str, item_id: &ItemId) -> bool {
        lock(&self.store).delete_item(block_id, item_id)
    }

    pub fn is_canvas_empty(&self) -> bool {
        lock(&self.store).is_empty()
    }

    // === Business concept ===

    pub fn set_concept(&self, text: impl Into<String>) {
        *lock(&self.concept) = text.into();
    }

    pub fn concept(&self) -> String {
        lock(&self.concept).clone()
    }

    /// Typed concept plus the attached document.
    pub fn full_concept(&self) -> String {
        compose_concept(&self.concept(), self.ready_document().as_ref())
    }

    // === Document ingestion ===

    pub async fn attach_file(&self, upload: FileUpload) -> IngestOutcome {
        self.ingest.ingest(upload).await
    }

    pub fn remove_document(&self) {
        self.ingest.remove_document();
    }

    pub fn document(&self) -> Option<UploadedDocument> {
        self.ingest.document()
    }

    pub fn document_error(&self) -> Option<String> {
        self.ingest.error()
    }

    pub fn is_processing_document(&self) -> bool {
        self.ingest.is_extracting()
    }

    fn ready_document(&self) -> Option<UploadedDocument> {
        self.ingest.document().filter(|doc| !doc.is_extracting)
    }

    // === Summary ===

    pub async fn generate_summary(&self) -> SummaryOutcome {
        let request = SummaryRequest::compose(
            &self.concept(),
            self.ready_document().as_ref(),
            &self.snapshot(),
        );
        self.summary.generate(request).await
    }

    pub fn summary_state(&self) -> SummaryState {
        self.summary.state()
    }

    // === Suggestions ===

    /// Ask for suggestions for one block. `None` if the block is unknown.
    pub async fn request_suggestions(&self, block_id: &str) -> Option<SuggestionOutcome> {
        let block = self.catalog().get(block_id)?.clone();
        let full_concept = self.full_concept();
        Some(self.suggestions.request(&block, &full_concept).await)
    }

    pub fn suggestion_state(&self, block_id: &str) -> SuggestionState {
        self.suggestions.state(block_id)
    }

    pub fn dismiss_suggestions(&self, block_id: &str) {
        self.suggestions.dismiss(block_id);
    }

    /// Commit picked suggestions as new items of a block.
    pub fn add_suggestions<I, S>(&self, block_id: &str, suggestions: I) -> Vec<ItemId>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_items(block_id, suggestions)
    }

    // === Selections ===

    pub fn toggle_selection(&self, block_title: &str, suggestion: &str) -> bool {
        lock(&self.selections).toggle(block_title, suggestion)
    }

    pub fn clear_selections(&self) {
        lock(&self.selections).clear();
    }

    pub fn selections(&self) -> SelectionSet {
        lock(&self.selections).clone()
    }

    // === Action gating ===

    pub fn can_generate_summary(&self) -> bool {
        let has_input = !self.concept().trim().is_empty() || self.document().is_some();
        !self.summary.is_pending()
            && !self.is_processing_document()
            && has_input
            && !self.is_canvas_empty()
    }

    pub fn can_download(&self) -> bool {
        let nothing_to_export = self.is_canvas_empty()
            && self.concept().trim().is_empty()
            && self.document().is_none();
        !self.is_processing_document() && !nothing_to_export
    }

    pub fn can_view_items(&self) -> bool {
        !self.is_canvas_empty()
    }

    pub fn can_view_selections(&self) -> bool {
        !lock(&self.selections).is_empty()
    }

    // === Export ===

    pub fn export(&self, projection: Projection) -> ExportArtifact {
        let content = match projection {
            Projection::Full => {
                let concept = self.concept();
                let document = self.ready_document();
                let canvas = self.snapshot();
                let summary = self.summary.summary();
                render_full(&FullExport {
                    concept: &concept,
                    document: document.as_ref(),
                    canvas: &canvas,
                    summary: summary.as_deref(),
                })
            }
            Projection::ItemsOnly => render_items(&self.snapshot()),
            Projection::SelectionsOnly => render_selections(&lock(&self.selections)),
        };
        ExportArtifact::new(projection, content)
    }

    /// Append the bullets of every exported section whose heading matches a
    /// block title. Returns the number of items added.
    pub fn import_items(&self, markdown: &str) -> usize {
        let sections = read_sections(markdown);
        let mut store = lock(&self.store);
        let catalog = store.catalog().clone();
        let mut added = 0;
        for section in sections {
            let Some(block) = catalog.find_by_title(&section.title) else {
                continue;
            };
            let bullets: Vec<String> = section
                .bullets
                .into_iter()
                .filter(|b| !b.trim().is_empty())
                .collect();
            added += store.add_items(&block.id, bullets).len();
        }
        info!(added, "imported canvas items");
        added
    }

    // === Saved state ===

    pub fn to_file(&self) -> SessionFile {
        let blocks: IndexMap<String, Vec<String>> = self
            .snapshot()
            .non_empty_blocks()
            .map(|block| {
                let texts: Vec<String> = block.items.iter().map(|i| i.text.clone()).collect();
                (block.id.clone(), texts)
            })
            .collect();
        SessionFile {
            concept: self.concept(),
            document: self.ready_document().map(|doc| SavedDocument {
                name: doc.name,
                content: doc.content,
            }),
            blocks,
            selections: self.selections(),
            summary: self.summary.summary(),
        }
    }

    /// Rebuild a session from saved state. Item ids are regenerated.
    pub fn from_file(
        file: SessionFile,
        catalog: BlockCatalog,
        services: AiServices,
        gate: AiGate,
    ) -> Result<Self, SessionFileError> {
        if let Some(unknown) = file.blocks.keys().find(|id| catalog.get(id).is_none()) {
            return Err(SessionFileError::UnknownBlock(unknown.clone()));
        }
        let session = Self::new(catalog, services, gate);
        session.set_concept(file.concept);
        for (block_id, texts) in file.blocks {
            session.add_items(&block_id, texts);
        }
        if let Some(doc) = file.document {
            session.ingest.restore(doc.name, doc.content);
        }
        *lock(&session.selections) = file.selections;
        if let Some(summary) = file.summary {
            session.summary.restore(summary);
        }
        Ok(session)
    }
}

#[derive(Debug, Error)]
pub enum SessionFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON session file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML session file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("session file references unknown block: {0}")]
    UnknownBlock(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedDocument {
    pub name: String,
    pub content: String,
}

/// Canvas state as saved to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFile {
    #[serde(default)]
    pub concept: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<SavedDocument>,
    /// Block id → item texts
    #[serde(default)]
    pub blocks: IndexMap<String, Vec<String>>,
    #[serde(default)]
    pub selections: SelectionSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl SessionFile {
    fn is_yaml(path: &Path) -> bool {
        matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        )
    }

    /// Load from JSON, or YAML for `.yaml`/`.yml` files.
    pub fn load(path: &Path) -> Result<Self, SessionFileError> {
        let data = std::fs::read_to_string(path)?;
        if Self::is_yaml(path) {
            Ok(serde_yaml::from_str(&data)?)
        } else {
            Ok(serde_json::from_str(&data)?)
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SessionFileError> {
        let data = if Self::is_yaml(path) {
            serde_yaml::to_string(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };
        std::fs::write(path, data)?;
        Ok(())
    }
}
