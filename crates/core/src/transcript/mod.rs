//! Transcript acquisition with language fallback.
//!
//! The preferred language is tried first. If that fails for any reason the
//! provider's list of available tracks is walked in the order it is returned
//! and the first track that fetches successfully wins. Each track is tried
//! exactly once.

pub mod youtube;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::{
    error::{StageError, TranscriptError},
    types::{Transcript, VideoId},
};

pub use youtube::YoutubeTranscripts;

/// A fetchable transcript track as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptHandle {
    pub video_id: String,
    pub language_code: String,
    pub language: String,
    pub is_generated: bool,
    pub url: String,
}

#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    async fn fetch_transcript(
        &self,
        video_id: &VideoId,
        language: &str,
    ) -> Result<Transcript, TranscriptError>;

    /// Tracks available for the video, in provider order
    async fn list_transcripts(
        &self,
        video_id: &VideoId,
    ) -> Result<Vec<TranscriptHandle>, TranscriptError>;

    async fn fetch(&self, handle: &TranscriptHandle) -> Result<Transcript, TranscriptError>;
}

pub struct TranscriptFetcher {
    provider: Arc<dyn TranscriptProvider>,
    preferred_language: String,
}

impl TranscriptFetcher {
    pub fn new(provider: Arc<dyn TranscriptProvider>, preferred_language: impl Into<String>) -> Self {
        Self {
            provider,
            preferred_language: preferred_language.into(),
        }
    }

    pub async fn fetch(&self, video_id: &VideoId) -> Result<Transcript, StageError> {
        let preferred_err = match self
            .provider
            .fetch_transcript(video_id, &self.preferred_language)
            .await
        {
            Ok(transcript) => return Ok(transcript),
            Err(e) => e,
        };

        debug!(
            %video_id,
            language = %self.preferred_language,
            error = %preferred_err,
            "Preferred transcript unavailable, trying other languages"
        );

        let handles = match &preferred_err {
            TranscriptError::NoTranscriptForLanguage { available, .. } if !available.is_empty() => {
                available.clone()
            }
            _ => self
                .provider
                .list_transcripts(video_id)
                .await
                .map_err(|source| StageError::TranscriptUnavailable {
                    video_id: video_id.to_string(),
                    source,
                })?,
        };

        let mut last_err = preferred_err;
        for handle in &handles {
            match self.provider.fetch(handle).await {
                Ok(transcript) => {
                    info!(
                        %video_id,
                        language = %handle.language_code,
                        generated = handle.is_generated,
                        "Using fallback transcript"
                    );
                    return Ok(transcript);
                }
                Err(e) => {
                    debug!(%video_id, language = %handle.language_code, error = %e, "Transcript fetch failed");
                    last_err = e;
                }
            }
        }

        Err(StageError::TranscriptUnavailable {
            video_id: video_id.to_string(),
            source: last_err,
        })
    }
}
