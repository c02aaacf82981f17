//! Preconfigured collaborators for tests and offline runs
//!
//! Each mock returns a fixed response (or failure) and records the
//! requests it received.

use super::{
    CapabilityError, ExtractionRequest, SuggestionRequest, SuggestionSource, Summarizer,
    TextExtractor,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

fn record<T: Clone>(log: &Mutex<Vec<T>>, entry: &T) {
    log.lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .push(entry.clone());
}

fn snapshot<T: Clone>(log: &Mutex<Vec<T>>) -> Vec<T> {
    log.lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

/// Extractor returning a fixed text.
pub struct MockExtractor {
    response: Result<String, CapabilityError>,
    requests: Mutex<Vec<ExtractionRequest>>,
}

impl MockExtractor {
    pub fn returning(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: CapabilityError) -> Self {
        Self {
            response: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<ExtractionRequest> {
        snapshot(&self.requests)
    }
}

#[async_trait]
impl TextExtractor for MockExtractor {
    async fn extract_text(&self, request: ExtractionRequest) -> Result<String, CapabilityError> {
        record(&self.requests, &request);
        self.response.clone()
    }
}

/// Summarizer returning a fixed summary.
pub struct MockSummarizer {
    response: Result<String, CapabilityError>,
    requests: Mutex<Vec<(String, String)>>,
}

impl MockSummarizer {
    pub fn returning(summary: impl Into<String>) -> Self {
        Self {
            response: Ok(summary.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: CapabilityError) -> Self {
        Self {
            response: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// `(full_concept, canvas_digest)` pairs received so far.
    pub fn requests(&self) -> Vec<(String, String)> {
        snapshot(&self.requests)
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(
        &self,
        full_concept: &str,
        canvas_digest: &str,
    ) -> Result<String, CapabilityError> {
        record(
            &self.requests,
            &(full_concept.to_string(), canvas_digest.to_string()),
        );
        self.response.clone()
    }
}

/// Suggestion source with canned answers per block title.
pub struct MockSuggestions {
    responses: HashMap<String, Result<Vec<String>, CapabilityError>>,
    requests: Mutex<Vec<SuggestionRequest>>,
}

impl MockSuggestions {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response<I, S>(mut self, block_title: impl Into<String>, suggestions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.responses.insert(
            block_title.into(),
            Ok(suggestions.into_iter().map(Into::into).collect()),
        );
        self
    }

    pub fn with_failure(mut self, block_title: impl Into<String>, error: CapabilityError) -> Self {
        self.responses.insert(block_title.into(), Err(error));
        self
    }

    pub fn requests(&self) -> Vec<SuggestionRequest> {
        snapshot(&self.requests)
    }
}

impl Default for MockSuggestions {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SuggestionSource for MockSuggestions {
    async fn suggest(&self, request: SuggestionRequest) -> Result<Vec<String>, CapabilityError> {
        record(&self.requests, &request);
        match self.responses.get(&request.block_title) {
            Some(response) => response.clone(),
            None => Err(CapabilityError::Failed(format!(
                "no mock suggestions for block '{}'",
                request.block_title
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_summarizer_records_requests() {
        let summarizer = MockSummarizer::returning("Összegzés");
        let summary = summarizer.summarize("koncepció", "digest").await.unwrap();
        assert_eq!(summary, "Összegzés");
        assert_eq!(
            summarizer.requests(),
            vec![("koncepció".to_string(), "digest".to_string())]
        );
    }

    #[tokio::test]
    async fn mock_suggestions_fail_for_unknown_block() {
        let source = MockSuggestions::new().with_response("Csatornák", ["Webshop"]);
        let request = SuggestionRequest {
            block_title: "Partnerek".to_string(),
            block_description: String::new(),
            full_concept: String::new(),
        };
        let err = source.suggest(request).await.unwrap_err();
        assert!(matches!(err, CapabilityError::Failed(_)));
    }
}
