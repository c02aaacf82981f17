//! Per-block AI suggestions
//!
//! Each block has its own suggestion surface. A new request for a block
//! replaces whatever that block showed before; requests for different
//! blocks are independent. Picked suggestions go to the `SelectionSet` or
//! straight onto the canvas through `CanvasStore::add_items`.

use crate::ai::{AiGate, SuggestionRequest, SuggestionSource};
use crate::canvas::BlockSpec;
use crate::error::CanvasError;
use crate::generation::{Generation, GenerationTracker};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error};

/// What one block's suggestion surface shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionState {
    pub suggestions: Vec<String>,
    pub is_pending: bool,
    pub error: Option<String>,
}

#[derive(Debug)]
pub enum SuggestionOutcome {
    Completed(Vec<String>),
    Failed(CanvasError),
    Superseded(Generation),
}

#[derive(Debug, Default)]
struct BlockSurface {
    state: SuggestionState,
    attempts: GenerationTracker,
}

pub struct SuggestionBoard {
    source: Arc<dyn SuggestionSource>,
    gate: AiGate,
    surfaces: Mutex<HashMap<String, BlockSurface>>,
}

impl SuggestionBoard {
    pub fn new(source: Arc<dyn SuggestionSource>, gate: AiGate) -> Self {
        Self {
            source,
            gate,
            surfaces: Mutex::new(HashMap::new()),
        }
    }

    fn surfaces(&self) -> MutexGuard<'_, HashMap<String, BlockSurface>> {
        self.surfaces
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self, block_id: &str) -> SuggestionState {
        self.surfaces()
            .get(block_id)
            .map(|surface| surface.state.clone())
            .unwrap_or_default()
    }

    /// Drop the suggestions shown for a block. A request in flight for it
    /// is discarded when it settles.
    pub fn dismiss(&self, block_id: &str) {
        if let Some(surface) = self.surfaces().get_mut(block_id) {
            surface.attempts.invalidate();
            surface.state = SuggestionState::default();
        }
    }

    pub async fn request(&self, block: &BlockSpec, full_concept: &str) -> SuggestionOutcome {
        let generation = {
            let mut surfaces = self.surfaces();
            let surface = surfaces.entry(block.id.clone()).or_default();
            surface.state = SuggestionState {
                suggestions: Vec::new(),
                is_pending: true,
                error: None,
            };
            surface.attempts.advance()
        };

        let request = SuggestionRequest {
            block_title: block.title.clone(),
            block_description: block.description.clone(),
            full_concept: full_concept.to_string(),
        };
        let result = self.gate.call(self.source.suggest(request)).await;

        let mut surfaces = self.surfaces();
        let Some(surface) = surfaces
            .get_mut(&block.id)
            .filter(|surface| surface.attempts.is_current(generation))
        else {
            debug!(block_id = %block.id, %generation, "discarding stale suggestions");
            return SuggestionOutcome::Superseded(generation);
        };
        match result {
            Ok(suggestions) => {
                let suggestions: Vec<String> = suggestions
                    .into_iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                surface.state = SuggestionState {
                    suggestions: suggestions.clone(),
                    is_pending: false,
                    error: None,
                };
                SuggestionOutcome::Completed(suggestions)
            }
            Err(source) => {
                let err = CanvasError::SuggestionGeneration {
                    block: block.title.clone(),
                    source,
                };
                error!(block_id = %block.id, error = %err, "suggestion request failed");
                surface.state = SuggestionState {
                    suggestions: Vec::new(),
                    is_pending: false,
                    error: Some(err.user_message().to_string()),
                };
                SuggestionOutcome::Failed(err)
            }
        }
    }
}
