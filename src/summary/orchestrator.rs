//! Summary orchestrator: one visible summary attempt at a time
//!
//! Each call clears the previous summary and error, marks the state
//! pending, and awaits the summary capability. Only the latest call may
//! write its result back; earlier calls that settle later are discarded.

use super::SummaryRequest;
use crate::ai::{AiGate, CapabilityError, Summarizer};
use crate::error::CanvasError;
use crate::generation::{Generation, GenerationTracker};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info};

/// What the summary surface currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryState {
    pub text: Option<String>,
    pub is_pending: bool,
    pub error: Option<String>,
}

/// How a summary call ended.
#[derive(Debug)]
pub enum SummaryOutcome {
    /// The summary was stored
    Completed(String),
    /// The call failed; the fixed error message is on display
    Failed(CanvasError),
    /// A newer call started before this one settled; nothing applied
    Superseded(Generation),
}

impl SummaryOutcome {
    pub fn summary(&self) -> Option<&str> {
        match self {
            Self::Completed(text) => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: SummaryState,
    attempts: GenerationTracker,
}

pub struct SummaryOrchestrator {
    summarizer: Arc<dyn Summarizer>,
    gate: AiGate,
    inner: Mutex<Inner>,
}

impl SummaryOrchestrator {
    pub fn new(summarizer: Arc<dyn Summarizer>, gate: AiGate) -> Self {
        Self {
            summarizer,
            gate,
            inner: Mutex::new(Inner::default()),
        }
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self) -> SummaryState {
        self.inner().state.clone()
    }

    /// The last successful summary, if it is still on display.
    pub fn summary(&self) -> Option<String> {
        self.inner().state.text.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.inner().state.is_pending
    }

    /// Attach a summary without calling the capability (saved sessions).
    pub fn restore(&self, text: impl Into<String>) {
        let mut inner = self.inner();
        inner.attempts.invalidate();
        inner.state = SummaryState {
            text: Some(text.into()),
            is_pending: false,
            error: None,
        };
    }

    /// Request a summary. Always issues a call; gating is the caller's job.
    pub async fn generate(&self, request: SummaryRequest) -> SummaryOutcome {
        let generation = {
            let mut inner = self.inner();
            inner.state = SummaryState {
                text: None,
                is_pending: true,
                error: None,
            };
            inner.attempts.advance()
        };

        let result = self
            .gate
            .call(
                self.summarizer
                    .summarize(&request.full_concept, &request.canvas_digest),
            )
            .await
            .and_then(|text| {
                if text.trim().is_empty() {
                    Err(CapabilityError::EmptyResponse)
                } else {
                    Ok(text)
                }
            });

        let mut inner = self.inner();
        if !inner.attempts.is_current(generation) {
            debug!(%generation, "discarding stale summary result");
            return SummaryOutcome::Superseded(generation);
        }
        match result {
            Ok(text) => {
                info!(%generation, chars = text.chars().count(), "summary ready");
                inner.state = SummaryState {
                    text: Some(text.clone()),
                    is_pending: false,
                    error: None,
                };
                SummaryOutcome::Completed(text)
            }
            Err(source) => {
                let err = CanvasError::SummaryGeneration(source);
                error!(%generation, error = %err, "summary generation failed");
                inner.state = SummaryState {
                    text: None,
                    is_pending: false,
                    error: Some(err.user_message().to_string()),
                };
                SummaryOutcome::Failed(err)
            }
        }
    }
}
