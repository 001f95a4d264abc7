use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque YouTube video identifier, guaranteed non-empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One timed line of spoken content. Offsets are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    pub language: String,
    pub segments: Vec<TranscriptSegment>,
    text: String,
}

impl Transcript {
    /// Builds a transcript, or `None` when the segments carry no text at all.
    pub fn new(language: impl Into<String>, segments: Vec<TranscriptSegment>) -> Option<Self> {
        let text = segments
            .iter()
            .map(|seg| seg.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        if text.trim().is_empty() {
            return None;
        }

        Some(Self {
            language: language.into(),
            segments,
            text,
        })
    }

    /// Segment texts joined with single spaces
    pub fn full_text(&self) -> &str {
        &self.text
    }

    pub fn duration_seconds(&self) -> f64 {
        self.segments
            .last()
            .map(|s| s.start + s.duration)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self(query.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single web search hit. Absent fields decode as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSummary {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

impl SourceSummary {
    /// Renders as `title: link - snippet`
    pub fn render(&self) -> String {
        format!("{}: {} - {}", self.title, self.link, self.snippet)
    }
}

/// Evidence handed to the evaluation prompt.
///
/// Retrieval never fails the pipeline: an empty result set or a failed
/// search is represented by a sentinel line instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvidenceSet {
    Sources(Vec<SourceSummary>),
    NoSources,
    Unavailable,
}

impl EvidenceSet {
    pub const NO_SOURCES: &'static str = "No reliable sources found";
    pub const UNAVAILABLE: &'static str = "Error fetching search results";

    pub fn from_sources(sources: Vec<SourceSummary>) -> Self {
        if sources.is_empty() {
            Self::NoSources
        } else {
            Self::Sources(sources)
        }
    }

    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Sources(sources) => sources.iter().map(SourceSummary::render).collect(),
            Self::NoSources => vec![Self::NO_SOURCES.to_string()],
            Self::Unavailable => vec![Self::UNAVAILABLE.to_string()],
        }
    }

    /// Newline-joined lines, as embedded in the evaluation prompt
    pub fn render(&self) -> String {
        self.lines().join("\n")
    }

    pub fn source_count(&self) -> usize {
        match self {
            Self::Sources(sources) => sources.len(),
            Self::NoSources | Self::Unavailable => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EvaluationReport(String);

impl EvaluationReport {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn word_count(&self) -> usize {
        self.0.split_whitespace().count()
    }
}
