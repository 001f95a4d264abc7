use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    error::{ConfigError, TranscriptError},
    transcript::{TranscriptHandle, TranscriptProvider},
    types::{Transcript, TranscriptSegment, VideoId},
};

/// Caption tracks straight from YouTube: the watch page yields the innertube
/// key, the innertube player endpoint lists the tracks, and each track is
/// downloaded in `json3` format.
pub struct YoutubeTranscripts {
    client: reqwest::Client,
    base_url: String,
}

impl YoutubeTranscripts {
    pub const DEFAULT_BASE_URL: &'static str = "https://www.youtube.com";
    const CLIENT_NAME: &'static str = "ANDROID";
    const CLIENT_VERSION: &'static str = "20.10.38";
    const TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new() -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder().timeout(Self::TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn innertube_api_key(&self, video_id: &VideoId) -> Result<String, TranscriptError> {
        let html = self
            .client
            .get(format!("{}/watch", self.base_url))
            .query(&[("v", video_id.as_str())])
            .header("Accept-Language", "en-US")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        extract_innertube_key(&html)
            .map(str::to_string)
            .ok_or_else(|| TranscriptError::Parse {
                reason: format!("no innertube API key on watch page for {video_id}"),
            })
    }

    async fn caption_tracks(
        &self,
        video_id: &VideoId,
    ) -> Result<Vec<TranscriptHandle>, TranscriptError> {
        let api_key = self.innertube_api_key(video_id).await?;

        let player: PlayerResponse = self
            .client
            .post(format!("{}/youtubei/v1/player", self.base_url))
            .query(&[("key", api_key.as_str())])
            .json(&serde_json::json!({
                "context": {
                    "client": {
                        "clientName": Self::CLIENT_NAME,
                        "clientVersion": Self::CLIENT_VERSION,
                    },
                },
                "videoId": video_id.as_str(),
            }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let playability = player.playability_status.unwrap_or_default();
        if playability.status.as_deref().is_some_and(|s| s != "OK") {
            return Err(TranscriptError::VideoUnavailable {
                video_id: video_id.to_string(),
                reason: playability
                    .reason
                    .unwrap_or_else(|| playability.status.unwrap_or_default()),
            });
        }

        let tracks = player
            .captions
            .and_then(|c| c.player_captions_tracklist_renderer)
            .and_then(|r| r.caption_tracks)
            .unwrap_or_default();

        if tracks.is_empty() {
            return Err(TranscriptError::TranscriptsDisabled {
                video_id: video_id.to_string(),
            });
        }

        Ok(tracks
            .into_iter()
            .map(|track| TranscriptHandle {
                video_id: video_id.to_string(),
                language: track.name.display(&track.language_code),
                is_generated: track.kind.as_deref() == Some("asr"),
                url: track.base_url.replace("&fmt=srv3", ""),
                language_code: track.language_code,
            })
            .collect())
    }
}

#[async_trait]
impl TranscriptProvider for YoutubeTranscripts {
    async fn fetch_transcript(
        &self,
        video_id: &VideoId,
        language: &str,
    ) -> Result<Transcript, TranscriptError> {
        let tracks = self.caption_tracks(video_id).await?;

        // Manually created tracks sort ahead of auto-generated ones
        let preferred = tracks
            .iter()
            .filter(|t| t.language_code == language)
            .min_by_key(|t| t.is_generated);

        match preferred {
            Some(handle) => self.fetch(handle).await,
            None => Err(TranscriptError::NoTranscriptForLanguage {
                video_id: video_id.to_string(),
                language: language.to_string(),
                available: tracks,
            }),
        }
    }

    async fn list_transcripts(
        &self,
        video_id: &VideoId,
    ) -> Result<Vec<TranscriptHandle>, TranscriptError> {
        self.caption_tracks(video_id).await
    }

    async fn fetch(&self, handle: &TranscriptHandle) -> Result<Transcript, TranscriptError> {
        let body: Json3Transcript = self
            .client
            .get(&handle.url)
            .query(&[("fmt", "json3")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| TranscriptError::Parse {
                reason: format!("caption track {}: {e}", handle.language_code),
            })?;

        Transcript::new(handle.language_code.clone(), segments_from_json3(body)).ok_or_else(|| {
            TranscriptError::Empty {
                video_id: handle.video_id.clone(),
                language: handle.language_code.clone(),
            }
        })
    }
}

fn extract_innertube_key(html: &str) -> Option<&str> {
    const MARKER: &str = "\"INNERTUBE_API_KEY\":\"";
    let start = html.find(MARKER)? + MARKER.len();
    let len = html[start..].find('"')?;
    let key = &html[start..start + len];
    (!key.is_empty()).then_some(key)
}

fn segments_from_json3(body: Json3Transcript) -> Vec<TranscriptSegment> {
    body.events
        .into_iter()
        .filter_map(|event| {
            let text: String = event.segs?.into_iter().map(|s| s.utf8).collect();
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            Some(TranscriptSegment {
                text: text.to_string(),
                start: event.t_start_ms as f64 / 1000.0,
                duration: event.d_duration_ms as f64 / 1000.0,
            })
        })
        .collect()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    playability_status: Option<PlayabilityStatus>,
    captions: Option<Captions>,
}

#[derive(Deserialize, Default)]
struct PlayabilityStatus {
    status: Option<String>,
    reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    player_captions_tracklist_renderer: Option<TrackList>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackList {
    caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    #[serde(default)]
    name: TrackName,
    language_code: String,
    kind: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct TrackName {
    simple_text: Option<String>,
    runs: Option<Vec<TextRun>>,
}

impl TrackName {
    fn display(&self, fallback: &str) -> String {
        if let Some(text) = &self.simple_text {
            return text.clone();
        }
        self.runs
            .as_ref()
            .map(|runs| runs.iter().map(|r| r.text.as_str()).collect::<String>())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}

#[derive(Deserialize)]
struct TextRun {
    text: String,
}

#[derive(Deserialize, Default)]
struct Json3Transcript {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: u64,
    segs: Option<Vec<Json3Seg>>,
}

#[derive(Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}
