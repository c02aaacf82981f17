//! AI collaborator boundary
//!
//! Defines the capability traits the core calls for text extraction,
//! summaries and per-block suggestions, plus the process-wide availability
//! gate. Implementations live outside the core; `mock` provides
//! preconfigured ones for tests and `Unconfigured` for a missing key.

pub mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

pub use mock::{MockExtractor, MockSuggestions, MockSummarizer};

/// Errors from a collaborator call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CapabilityError {
    #[error("AI service not available: {0}")]
    Unavailable(String),
    #[error("AI request failed: {0}")]
    Failed(String),
    #[error("AI request timed out after {0:?}")]
    TimedOut(Duration),
    #[error("AI service returned an empty response")]
    EmptyResponse,
}

/// Payload handed to the text-extraction capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionRequest {
    /// Raw document bytes, standard base64
    pub base64_content: String,
    /// Declared MIME type of the upload
    pub mime_type: String,
}

/// Input for one per-block suggestion call.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionRequest {
    pub block_title: String,
    pub block_description: String,
    pub full_concept: String,
}

/// Turns binary documents (PDF, Word) into plain text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, request: ExtractionRequest) -> Result<String, CapabilityError>;
}

/// Produces a summary of the business concept and the canvas.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(
        &self,
        full_concept: &str,
        canvas_digest: &str,
    ) -> Result<String, CapabilityError>;
}

/// Proposes candidate items for one block.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    async fn suggest(&self, request: SuggestionRequest) -> Result<Vec<String>, CapabilityError>;
}

/// Process-wide availability flag, read once at startup and injected.
///
/// Calls made through an unconfigured gate fail with
/// `CapabilityError::Unavailable` without reaching the collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AiGate {
    configured: bool,
    timeout: Option<Duration>,
}

impl AiGate {
    pub fn configured() -> Self {
        Self {
            configured: true,
            timeout: None,
        }
    }

    pub fn unconfigured() -> Self {
        Self::default()
    }

    /// Bound every call made through this gate.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run a collaborator call behind the gate and the optional timeout.
    pub async fn call<T, F>(&self, call: F) -> Result<T, CapabilityError>
    where
        F: Future<Output = Result<T, CapabilityError>>,
    {
        if !self.configured {
            return Err(CapabilityError::Unavailable(
                "no AI credentials configured".to_string(),
            ));
        }
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| CapabilityError::TimedOut(limit))?,
            None => call.await,
        }
    }
}

/// Stand-in for every capability when no AI service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconfigured;

impl Unconfigured {
    fn error() -> CapabilityError {
        CapabilityError::Unavailable("no AI service configured".to_string())
    }
}

#[async_trait]
impl TextExtractor for Unconfigured {
    async fn extract_text(&self, _request: ExtractionRequest) -> Result<String, CapabilityError> {
        Err(Self::error())
    }
}

#[async_trait]
impl Summarizer for Unconfigured {
    async fn summarize(&self, _: &str, _: &str) -> Result<String, CapabilityError> {
        Err(Self::error())
    }
}

#[async_trait]
impl SuggestionSource for Unconfigured {
    async fn suggest(&self, _request: SuggestionRequest) -> Result<Vec<String>, CapabilityError> {
        Err(Self::error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_gate_short_circuits() {
        let gate = AiGate::unconfigured();
        let result: Result<u8, _> = gate.call(async { Ok(1) }).await;
        assert!(matches!(result, Err(CapabilityError::Unavailable(_))));
    }

    #[tokio::test]
    async fn configured_gate_passes_result_through() {
        let gate = AiGate::configured();
        let result: Result<u8, _> = gate.call(async { Ok(7) }).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test]
    async fn timeout_turns_hang_into_failure() {
        let gate = AiGate::configured().with_timeout(Duration::from_millis(20));
        let result: Result<(), _> = gate.call(std::future::pending()).await;
        assert_eq!(result, Err(CapabilityError::TimedOut(Duration::from_millis(20))));
    }

    #[test]
    fn extraction_request_uses_camel_case_on_the_wire() {
        let request = ExtractionRequest {
            base64_content: "SGk=".to_string(),
            mime_type: "application/pdf".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["base64Content"], "SGk=");
        assert_eq!(json["mimeType"], "application/pdf");
    }
}
