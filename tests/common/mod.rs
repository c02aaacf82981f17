//! Common test utilities for bmcanvas integration tests
//!
//! Gated collaborators park every call on a oneshot channel until the test
//! releases it, so overlapping requests can be completed in any order.

#![allow(dead_code)]

use async_trait::async_trait;
use bmcanvas::{
    AiGate, AiServices, BlockCatalog, CanvasSession, CapabilityError, ExtractionRequest,
    Summarizer, TextExtractor, Unconfigured,
};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

type Reply = Result<String, CapabilityError>;

/// Calls waiting for a reply, in arrival order.
#[derive(Default)]
pub struct Parked {
    senders: Mutex<Vec<Option<oneshot::Sender<Reply>>>>,
}

impl Parked {
    async fn park(&self) -> Reply {
        let (tx, rx) = oneshot::channel();
        self.senders.lock().unwrap().push(Some(tx));
        rx.await
            .unwrap_or_else(|_| Err(CapabilityError::Failed("call dropped".to_string())))
    }

    pub fn calls(&self) -> usize {
        self.senders.lock().unwrap().len()
    }

    /// Yield until `count` calls have arrived.
    pub async fn wait_for_calls(&self, count: usize) {
        for _ in 0..10_000 {
            if self.calls() >= count {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("expected {} parked calls, saw {}", count, self.calls());
    }

    /// Complete the `index`-th call (0-based).
    pub fn release(&self, index: usize, reply: Reply) {
        let sender = self.senders.lock().unwrap()[index]
            .take()
            .expect("call already released");
        let _ = sender.send(reply);
    }
}

#[derive(Default)]
pub struct GatedSummarizer {
    pub parked: Parked,
    requests: Mutex<Vec<(String, String)>>,
}

impl GatedSummarizer {
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Summarizer for GatedSummarizer {
    async fn summarize(&self, full_concept: &str, canvas_digest: &str) -> Reply {
        self.requests
            .lock()
            .unwrap()
            .push((full_concept.to_string(), canvas_digest.to_string()));
        self.parked.park().await
    }
}

#[derive(Default)]
pub struct GatedExtractor {
    pub parked: Parked,
    requests: Mutex<Vec<ExtractionRequest>>,
}

impl GatedExtractor {
    pub fn requests(&self) -> Vec<ExtractionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextExtractor for GatedExtractor {
    async fn extract_text(&self, request: ExtractionRequest) -> Reply {
        self.requests.lock().unwrap().push(request);
        self.parked.park().await
    }
}

/// Session wired to gated fakes, with a default catalog.
pub struct Harness {
    pub session: Arc<CanvasSession>,
    pub summarizer: Arc<GatedSummarizer>,
    pub extractor: Arc<GatedExtractor>,
}

impl Harness {
    pub fn new() -> Self {
        let summarizer = Arc::new(GatedSummarizer::default());
        let extractor = Arc::new(GatedExtractor::default());
        let services = AiServices::new(
            extractor.clone(),
            summarizer.clone(),
            Arc::new(Unconfigured),
        );
        let session = Arc::new(CanvasSession::new(
            BlockCatalog::default(),
            services,
            AiGate::configured(),
        ));
        Self {
            session,
            summarizer,
            extractor,
        }
    }
}
