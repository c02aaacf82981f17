//! Attempt tags for async surfaces
//!
//! Every async surface (document ingestion, summary, per-block suggestions)
//! tags each attempt with a generation captured at request time. The
//! completion handler compares its tag against the tracker before applying
//! anything. Late completions of superseded attempts are discarded; the
//! underlying call is never aborted.

/// The tag of a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tracks the latest attempt on one surface.
///
/// The tracker lives next to the state it guards (behind the same lock),
/// so "is this still current?" and "apply the result" happen atomically.
#[derive(Debug, Default)]
pub struct GenerationTracker {
    latest: u64,
}

impl GenerationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new attempt. Every earlier tag becomes stale.
    pub fn advance(&mut self) -> Generation {
        self.latest += 1;
        Generation(self.latest)
    }

    /// Invalidate the current attempt without starting a new one.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        generation.0 == self.latest
    }
}
