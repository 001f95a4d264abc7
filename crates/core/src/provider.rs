use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    config::GenerationSettings,
    error::{ConfigError, GenerationError},
};

/// Text-generation capability used by the query and evaluation stages
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        settings: &GenerationSettings,
    ) -> Result<String, GenerationError>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Provider {
    #[default]
    Gemini,
    Openai,
    Grok,
}

pub struct ProviderConfig {
    pub api_url: &'static str,
    pub model: &'static str,
    pub env_var: &'static str,
}

impl Provider {
    pub fn config(&self) -> ProviderConfig {
        match self {
            Provider::Gemini => ProviderConfig {
                api_url: "https://generativelanguage.googleapis.com/v1beta",
                model: "gemini-2.0-flash-exp",
                env_var: "GEMINI_API_KEY",
            },
            Provider::Openai => ProviderConfig {
                api_url: "https://api.openai.com/v1/chat/completions",
                model: "gpt-4o-mini",
                env_var: "OPENAI_API_KEY",
            },
            Provider::Grok => ProviderConfig {
                api_url: "https://api.x.ai/v1/chat/completions",
                model: "grok-4-fast",
                env_var: "XAI_API_KEY",
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Gemini => "Gemini",
            Provider::Openai => "OpenAI",
            Provider::Grok => "Grok",
        }
    }

    /// Read this provider's API key from the environment. Startup only.
    pub fn validate_api_key(&self) -> Result<String, ConfigError> {
        let env_var = self.config().env_var;
        match std::env::var(env_var) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ConfigError::MissingApiKey { env_var }),
        }
    }
}

/// `TextGenerator` backed by a hosted model API
pub struct HttpTextGenerator {
    provider: Provider,
    api_key: String,
    api_url: String,
    model: String,
    client: reqwest::Client,
}

impl HttpTextGenerator {
    const TIMEOUT: Duration = Duration::from_secs(120);

    pub fn new(provider: Provider, api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let config = provider.config();
        let client = reqwest::Client::builder().timeout(Self::TIMEOUT).build()?;

        Ok(Self {
            provider,
            api_key: api_key.into(),
            api_url: config.api_url.to_string(),
            model: config.model.to_string(),
            client,
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn generate_gemini(
        &self,
        prompt: &str,
        settings: &GenerationSettings,
    ) -> Result<String, GenerationError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: settings.temperature,
                top_p: settings.top_p,
                top_k: settings.top_k,
                max_output_tokens: settings.max_output_tokens,
            },
        };

        // Key goes in a header so it never shows up in logged URLs
        let url = format!("{}/models/{}:generateContent", self.api_url, self.model);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<GeminiApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(GenerationError::Api {
                provider: self.provider.name(),
                status: status.as_u16(),
                message,
            });
        }

        let response: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| GenerationError::InvalidResponse {
                reason: format!("failed to parse generateContent response: {e}"),
            })?;

        if let Some(reason) = response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
        {
            return Err(GenerationError::Blocked { reason });
        }

        let candidate = response
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| GenerationError::InvalidResponse {
                reason: "no candidates returned".to_string(),
            })?;

        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GenerationError::InvalidResponse {
                reason: format!(
                    "candidate has no text (finish reason: {})",
                    candidate.finish_reason.as_deref().unwrap_or("unknown")
                ),
            });
        }

        Ok(text)
    }

    async fn generate_chat(
        &self,
        prompt: &str,
        settings: &GenerationSettings,
    ) -> Result<String, GenerationError> {
        // top_k has no equivalent in the chat completions API
        let response = self
            .client
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&serde_json::json!({
                "model": self.model,
                "messages": [
                    {
                        "role": "user",
                        "content": prompt,
                    },
                ],
                "temperature": settings.temperature,
                "top_p": settings.top_p,
                "max_tokens": settings.max_output_tokens,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Api {
                provider: self.provider.name(),
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let response = response.json::<serde_json::Value>().await?;

        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| GenerationError::InvalidResponse {
                reason: format!("unexpected chat completion shape: {response}"),
            })?;

        Ok(content.to_string())
    }
}

#[async_trait]
impl TextGenerator for HttpTextGenerator {
    async fn generate(
        &self,
        prompt: &str,
        settings: &GenerationSettings,
    ) -> Result<String, GenerationError> {
        match self.provider {
            Provider::Gemini => self.generate_gemini(prompt, settings).await,
            Provider::Openai | Provider::Grok => self.generate_chat(prompt, settings).await,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiApiError {
    error: GeminiApiErrorDetail,
}

#[derive(Deserialize)]
struct GeminiApiErrorDetail {
    message: String,
}
