//! Clipcheck Core Library
//!
//! Evaluates the factual credibility of a YouTube video: fetch its
//! transcript, derive a search query, collect web sources, and have an LLM
//! write a structured credibility assessment.

pub mod config;
pub mod error;
pub mod evaluation;
pub mod evidence;
pub mod format;
pub mod pipeline;
pub mod provider;
pub mod query;
pub mod search;
pub mod transcript;
pub mod types;

#[cfg(test)]
mod testing;

// Re-export commonly used items at crate root
pub use config::{GenerationSettings, PipelineConfig, SearchConfig};
pub use error::{
    ConfigError, EvaluateError, GenerationError, GenerationStage, SearchError, StageError,
    TranscriptError,
};
pub use format::{format_run_readable, format_timestamp};
pub use pipeline::{EvaluateRequest, Pipeline, PipelineRun, PipelineState};
pub use provider::{HttpTextGenerator, Provider, ProviderConfig, TextGenerator};
pub use search::{GoogleCustomSearch, WebSearch};
pub use transcript::{TranscriptFetcher, TranscriptHandle, TranscriptProvider, YoutubeTranscripts};
pub use types::{
    EvaluationReport, EvidenceSet, SearchQuery, SourceSummary, Transcript, TranscriptSegment,
    VideoId,
};
