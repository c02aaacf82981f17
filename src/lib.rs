//! bmcanvas: Business Model Canvas engine
//!
//! Holds the state behind an AI-assisted Business Model Canvas editor:
//! nine (or configured) blocks of free-text items, a business concept with
//! an optional attached document, an AI summary, per-block AI suggestions
//! and the set of suggestions the user picked.
//!
//! # Core Concepts
//!
//! - **Canvas**: copy-on-write block store; every snapshot is immutable
//! - **Ingestion**: uploaded files become text, either directly or through
//!   an extraction capability
//! - **Generations**: every async surface tags its attempts, and only the
//!   latest attempt may write state
//! - **Export**: three markdown projections of the canvas
//!
//! # Example
//!
//! ```
//! use bmcanvas::{AiGate, AiServices, BlockCatalog, CanvasSession, Projection};
//!
//! let session = CanvasSession::new(
//!     BlockCatalog::default(),
//!     AiServices::unconfigured(),
//!     AiGate::unconfigured(),
//! );
//! session.add_item("channels", "Webshop");
//! let artifact = session.export(Projection::ItemsOnly);
//! assert!(artifact.content.contains("- Webshop"));
//! ```

pub mod ai;
pub mod canvas;
pub mod config;
pub mod error;
pub mod export;
pub mod generation;
pub mod ingest;
pub mod selection;
pub mod session;
pub mod suggest;
pub mod summary;

pub use ai::{
    AiGate, CapabilityError, ExtractionRequest, SuggestionRequest, SuggestionSource, Summarizer,
    TextExtractor, Unconfigured,
};
pub use canvas::{
    BlockCatalog, BlockSpec, CanvasBlockData, CanvasItem, CanvasSnapshot, CanvasStore, ItemId,
};
pub use config::{default_config_path, AiSettings, CanvasConfig, ConfigError};
pub use error::{CanvasError, CanvasResult};
pub use export::{read_sections, ExportArtifact, ExportSection, Projection};
pub use generation::{Generation, GenerationTracker};
pub use ingest::{
    ContentClass, FileUpload, IngestOutcome, IngestPhase, IngestPipeline, UploadedDocument,
};
pub use selection::{SelectionSet, SuggestionSelection};
pub use session::{AiServices, CanvasSession, SavedDocument, SessionFile, SessionFileError};
pub use suggest::{SuggestionBoard, SuggestionOutcome, SuggestionState};
pub use summary::{
    compose_concept, SummaryOrchestrator, SummaryOutcome, SummaryRequest, SummaryState,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
