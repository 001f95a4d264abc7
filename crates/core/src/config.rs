//! Immutable configuration values, built once at startup and handed to
//! each component's constructor.

/// Sampling parameters for one text-generation call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl GenerationSettings {
    /// Low randomness and a small budget for short, repeatable queries
    pub const QUERY: Self = Self {
        temperature: 0.3,
        top_p: 0.95,
        top_k: 40,
        max_output_tokens: 100,
    };

    pub const EVALUATION: Self = Self {
        temperature: 0.7,
        top_p: 0.95,
        top_k: 40,
        max_output_tokens: 1000,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Language tried before falling back to whatever the video offers
    pub preferred_language: String,
    pub query: GenerationSettings,
    pub evaluation: GenerationSettings,
    /// Top results requested from web search
    pub search_results: u8,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            preferred_language: "en".to_string(),
            query: GenerationSettings::QUERY,
            evaluation: GenerationSettings::EVALUATION,
            search_results: SearchConfig::MAX_RESULTS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub api_key: String,
    pub engine_id: String,
    pub endpoint: String,
}

impl SearchConfig {
    pub const DEFAULT_ENDPOINT: &'static str = "https://www.googleapis.com/customsearch/v1";
    /// Custom Search returns at most 10 results per request
    pub const MAX_RESULTS: u8 = 10;

    pub fn new(api_key: impl Into<String>, engine_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            engine_id: engine_id.into(),
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}
