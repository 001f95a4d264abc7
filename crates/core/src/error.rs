use std::fmt;

use thiserror::Error;

use crate::transcript::TranscriptHandle;

#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error("Video {video_id} is unavailable: {reason}")]
    VideoUnavailable { video_id: String, reason: String },

    #[error("Transcripts are disabled for video {video_id}")]
    TranscriptsDisabled { video_id: String },

    /// `available` holds the tracks seen while looking, so a fallback can
    /// use them without enumerating again. Empty when the provider doesn't say.
    #[error("No {language} transcript for video {video_id}")]
    NoTranscriptForLanguage {
        video_id: String,
        language: String,
        available: Vec<TranscriptHandle>,
    },

    #[error("The {language} transcript for video {video_id} contains no text")]
    Empty { video_id: String, language: String },

    #[error("Transcript request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected transcript response: {reason}")]
    Parse { reason: String },
}

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} API error ({status}): {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("Invalid API response: {reason}")]
    InvalidResponse { reason: String },

    #[error("Content blocked by provider: {reason}")]
    Blocked { reason: String },
}

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Search request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Search API responded with {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing API key: {env_var} environment variable is not set")]
    MissingApiKey { env_var: &'static str },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Which text-generation call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    Query,
    Evaluation,
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationStage::Query => f.write_str("query"),
            GenerationStage::Evaluation => f.write_str("evaluation"),
        }
    }
}

/// Internal failure of a single pipeline stage. Never shown to callers.
#[derive(Error, Debug)]
pub enum StageError {
    #[error("Could not retrieve any transcript for video {video_id}")]
    TranscriptUnavailable {
        video_id: String,
        #[source]
        source: TranscriptError,
    },

    #[error("Generation failed in {stage} stage")]
    Generation {
        stage: GenerationStage,
        #[source]
        source: GenerationError,
    },

    #[error("Evidence retrieval degraded")]
    SearchDegraded(#[from] SearchError),

    /// A stage broke its own contract, e.g. a generator handed back no text
    #[error("Unexpected failure: {reason}")]
    Unexpected { reason: String },
}

/// The only errors a caller of the pipeline ever sees
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluateError {
    #[error("videoId is required")]
    Validation,

    #[error("Failed to evaluate content")]
    PipelineFailed,
}

/// Renders an error with its whole `source()` chain on one line
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        current = cause.source();
    }
    out
}
