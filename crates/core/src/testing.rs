//! Mock collaborators shared by the unit tests

use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::Mutex,
};

use async_trait::async_trait;

use crate::{
    config::GenerationSettings,
    error::{GenerationError, SearchError, TranscriptError},
    provider::TextGenerator,
    search::WebSearch,
    transcript::{TranscriptHandle, TranscriptProvider},
    types::{SourceSummary, Transcript, TranscriptSegment, VideoId},
};

pub fn handle(language_code: &str, is_generated: bool) -> TranscriptHandle {
    TranscriptHandle {
        video_id: "abc123".to_string(),
        language_code: language_code.to_string(),
        language: language_code.to_uppercase(),
        is_generated,
        url: format!("https://captions.test/{language_code}"),
    }
}

fn single_segment(language: &str, text: &str) -> Transcript {
    Transcript::new(
        language,
        vec![TranscriptSegment {
            text: text.to_string(),
            start: 0.0,
            duration: 3.5,
        }],
    )
    .expect("mock transcript has text")
}

#[derive(Default)]
pub struct MockTranscripts {
    languages: HashMap<String, String>,
    handles: Vec<TranscriptHandle>,
    failing: HashSet<String>,
    disabled: bool,
    tracks_on_miss: bool,
    calls: Mutex<Vec<String>>,
}

impl MockTranscripts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(mut self, language: &str, text: &str) -> Self {
        self.languages
            .insert(language.to_string(), text.to_string());
        self
    }

    pub fn with_handles(mut self, handles: Vec<TranscriptHandle>) -> Self {
        self.handles = handles;
        self
    }

    pub fn failing(mut self, language_code: &str) -> Self {
        self.failing.insert(language_code.to_string());
        self
    }

    /// A miss on the preferred language reports the tracks it saw
    pub fn tracks_on_miss(mut self) -> Self {
        self.tracks_on_miss = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl TranscriptProvider for MockTranscripts {
    async fn fetch_transcript(
        &self,
        video_id: &VideoId,
        language: &str,
    ) -> Result<Transcript, TranscriptError> {
        self.record(format!("fetch_transcript:{language}"));
        if self.disabled {
            return Err(TranscriptError::TranscriptsDisabled {
                video_id: video_id.to_string(),
            });
        }
        self.languages
            .get(language)
            .map(|text| single_segment(language, text))
            .ok_or_else(|| TranscriptError::NoTranscriptForLanguage {
                video_id: video_id.to_string(),
                language: language.to_string(),
                available: if self.tracks_on_miss {
                    self.handles.clone()
                } else {
                    Vec::new()
                },
            })
    }

    async fn list_transcripts(
        &self,
        video_id: &VideoId,
    ) -> Result<Vec<TranscriptHandle>, TranscriptError> {
        self.record("list".to_string());
        if self.disabled {
            return Err(TranscriptError::TranscriptsDisabled {
                video_id: video_id.to_string(),
            });
        }
        Ok(self.handles.clone())
    }

    async fn fetch(&self, handle: &TranscriptHandle) -> Result<Transcript, TranscriptError> {
        self.record(format!("fetch:{}", handle.language_code));
        if self.failing.contains(&handle.language_code) {
            return Err(TranscriptError::Empty {
                video_id: handle.video_id.clone(),
                language: handle.language_code.clone(),
            });
        }
        Ok(single_segment(
            &handle.language_code,
            &format!("{} words", handle.language_code),
        ))
    }
}

/// Replies with queued results in order; records every prompt it sees
#[derive(Default)]
pub struct MockGenerator {
    replies: Mutex<VecDeque<Result<String, GenerationError>>>,
    prompts: Mutex<Vec<(String, GenerationSettings)>>,
}

impl MockGenerator {
    pub fn replying(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| Ok(r.to_string())).collect()),
            prompts: Mutex::default(),
        }
    }

    pub fn then_fail(self) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(GenerationError::Api {
                provider: "Mock",
                status: 503,
                message: "model overloaded".to_string(),
            }));
        self
    }

    pub fn prompts(&self) -> Vec<(String, GenerationSettings)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(
        &self,
        prompt: &str,
        settings: &GenerationSettings,
    ) -> Result<String, GenerationError> {
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), *settings));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(GenerationError::InvalidResponse {
                    reason: "no reply queued".to_string(),
                })
            })
    }
}

pub enum SearchReply {
    Items(Vec<SourceSummary>),
    Status(u16),
}

pub struct MockSearch {
    reply: SearchReply,
    queries: Mutex<Vec<(String, u8)>>,
}

impl MockSearch {
    pub fn new(reply: SearchReply) -> Self {
        Self {
            reply,
            queries: Mutex::default(),
        }
    }

    pub fn queries(&self) -> Vec<(String, u8)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebSearch for MockSearch {
    async fn search(&self, query: &str, count: u8) -> Result<Vec<SourceSummary>, SearchError> {
        self.queries
            .lock()
            .unwrap()
            .push((query.to_string(), count));
        match &self.reply {
            SearchReply::Items(items) => Ok(items.clone()),
            SearchReply::Status(status) => Err(SearchError::Status {
                status: *status,
                body: "quota exceeded".to_string(),
            }),
        }
    }
}

pub fn source(title: &str) -> SourceSummary {
    SourceSummary {
        title: title.to_string(),
        link: format!("https://{}.example", title.to_lowercase()),
        snippet: format!("{title} snippet"),
    }
}
