//! The evaluation pipeline: transcript, query, evidence, evaluation.
//!
//! Stages run strictly in order and each consumes the previous stage's
//! output. Any stage failure moves the run to [`PipelineState::Failed`];
//! the cause is logged here and callers only ever see
//! [`EvaluateError::PipelineFailed`].

use std::{fmt, sync::Arc};

use serde::Deserialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    config::PipelineConfig,
    error::{EvaluateError, StageError, error_chain},
    evaluation::EvaluationSynthesizer,
    evidence::EvidenceRetriever,
    provider::TextGenerator,
    query::QueryGenerator,
    search::WebSearch,
    transcript::{TranscriptFetcher, TranscriptProvider},
    types::{EvaluationReport, EvidenceSet, SearchQuery, Transcript, VideoId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    ValidatingInput,
    FetchingTranscript,
    GeneratingQuery,
    RetrievingEvidence,
    SynthesizingEvaluation,
    Done,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::ValidatingInput => "validating_input",
            PipelineState::FetchingTranscript => "fetching_transcript",
            PipelineState::GeneratingQuery => "generating_query",
            PipelineState::RetrievingEvidence => "retrieving_evidence",
            PipelineState::SynthesizingEvaluation => "synthesizing_evaluation",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Body of `POST /evaluate`
#[derive(Debug, Default, Deserialize)]
pub struct EvaluateRequest {
    #[serde(rename = "videoId", default)]
    pub video_id: Option<String>,
}

impl EvaluateRequest {
    pub fn new(video_id: impl Into<String>) -> Self {
        Self {
            video_id: Some(video_id.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptInfo {
    pub language: String,
    pub segments: usize,
    pub duration_seconds: f64,
}

impl From<&Transcript> for TranscriptInfo {
    fn from(transcript: &Transcript) -> Self {
        Self {
            language: transcript.language.clone(),
            segments: transcript.segments.len(),
            duration_seconds: transcript.duration_seconds(),
        }
    }
}

/// Everything observed during one execution
#[derive(Debug)]
pub struct PipelineRun {
    pub run_id: Uuid,
    pub video_id: VideoId,
    /// Every state entered, in order
    pub states: Vec<PipelineState>,
    pub transcript: Option<TranscriptInfo>,
    pub query: Option<SearchQuery>,
    pub evidence: Option<EvidenceSet>,
    pub outcome: Result<EvaluationReport, StageError>,
}

impl PipelineRun {
    pub fn final_state(&self) -> PipelineState {
        self.states
            .last()
            .copied()
            .unwrap_or(PipelineState::ValidatingInput)
    }

    pub fn visited(&self, state: PipelineState) -> bool {
        self.states.contains(&state)
    }

    /// The stage that was running when the pipeline failed
    pub fn failed_in(&self) -> Option<PipelineState> {
        match self.states.as_slice() {
            [.., stage, PipelineState::Failed] => Some(*stage),
            _ => None,
        }
    }
}

struct RunTrace {
    run_id: Uuid,
    states: Vec<PipelineState>,
    transcript: Option<TranscriptInfo>,
    query: Option<SearchQuery>,
    evidence: Option<EvidenceSet>,
}

impl RunTrace {
    fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            states: vec![PipelineState::ValidatingInput],
            transcript: None,
            query: None,
            evidence: None,
        }
    }

    fn current(&self) -> PipelineState {
        self.states
            .last()
            .copied()
            .unwrap_or(PipelineState::ValidatingInput)
    }

    fn advance(&mut self, next: PipelineState) {
        debug!(run_id = %self.run_id, from = %self.current(), to = %next, "Pipeline transition");
        self.states.push(next);
    }
}

pub struct Pipeline {
    transcripts: TranscriptFetcher,
    queries: QueryGenerator,
    evidence: EvidenceRetriever,
    synthesizer: EvaluationSynthesizer,
}

impl Pipeline {
    pub fn new(
        config: &PipelineConfig,
        transcripts: Arc<dyn TranscriptProvider>,
        generator: Arc<dyn TextGenerator>,
        search: Arc<dyn WebSearch>,
    ) -> Self {
        Self {
            transcripts: TranscriptFetcher::new(transcripts, config.preferred_language.clone()),
            queries: QueryGenerator::new(Arc::clone(&generator), config.query),
            evidence: EvidenceRetriever::new(search, config.search_results),
            synthesizer: EvaluationSynthesizer::new(generator, config.evaluation),
        }
    }

    /// Checks that the request names a video. No stage runs on failure.
    pub fn validate(request: &EvaluateRequest) -> Result<VideoId, EvaluateError> {
        request
            .video_id
            .as_deref()
            .and_then(VideoId::parse)
            .ok_or(EvaluateError::Validation)
    }

    /// Validate, run every stage, and collapse any stage failure into
    /// [`EvaluateError::PipelineFailed`].
    pub async fn evaluate(
        &self,
        request: &EvaluateRequest,
    ) -> Result<EvaluationReport, EvaluateError> {
        let video_id = Self::validate(request).inspect_err(|_| {
            warn!("Rejected evaluation request without videoId");
        })?;

        self.execute(video_id)
            .await
            .outcome
            .map_err(|_| EvaluateError::PipelineFailed)
    }

    /// Run all four stages for an already validated video id
    pub async fn execute(&self, video_id: VideoId) -> PipelineRun {
        let mut trace = RunTrace::new();
        info!(run_id = %trace.run_id, %video_id, "Evaluation started");

        let outcome = self.run_stages(&video_id, &mut trace).await;

        match &outcome {
            Ok(report) => {
                trace.advance(PipelineState::Done);
                debug!(run_id = %trace.run_id, words = report.word_count(), "Evaluation length");
                info!(run_id = %trace.run_id, %video_id, "Evaluation finished");
            }
            Err(e) => {
                let failed_in = trace.current();
                trace.advance(PipelineState::Failed);
                error!(
                    run_id = %trace.run_id,
                    %video_id,
                    stage = %failed_in,
                    error = %error_chain(e),
                    "Evaluation failed"
                );
            }
        }

        PipelineRun {
            run_id: trace.run_id,
            video_id,
            states: trace.states,
            transcript: trace.transcript,
            query: trace.query,
            evidence: trace.evidence,
            outcome,
        }
    }

    async fn run_stages(
        &self,
        video_id: &VideoId,
        trace: &mut RunTrace,
    ) -> Result<EvaluationReport, StageError> {
        trace.advance(PipelineState::FetchingTranscript);
        let transcript = self.transcripts.fetch(video_id).await?;
        trace.transcript = Some(TranscriptInfo::from(&transcript));

        trace.advance(PipelineState::GeneratingQuery);
        let query = self.queries.generate(transcript.full_text()).await?;
        info!(run_id = %trace.run_id, %query, "Generated search query");
        trace.query = Some(query.clone());

        trace.advance(PipelineState::RetrievingEvidence);
        let evidence = self.evidence.retrieve(&query).await;
        trace.evidence = Some(evidence.clone());

        trace.advance(PipelineState::SynthesizingEvaluation);
        self.synthesizer
            .synthesize(transcript.full_text(), &evidence)
            .await
    }
}
