use std::sync::Arc;

use clipcheck_core::{
    ConfigError, GoogleCustomSearch, HttpTextGenerator, Pipeline, PipelineConfig, Provider,
    SearchConfig, YoutubeTranscripts,
};

use crate::Cli;

/// Everything read from flags and the environment, resolved once at startup
pub struct AppConfig {
    pub provider: Provider,
    pub model: Option<String>,
    pub generation_api_key: String,
    pub search: SearchConfig,
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let provider: Provider = cli.provider.clone().into();
        let generation_api_key = provider.validate_api_key()?;

        let google_api_key = required(cli.google_api_key.as_deref(), "GOOGLE_API_KEY")?;
        let google_cx = required(cli.google_cx.as_deref(), "GOOGLE_CX")?;

        Ok(Self {
            provider,
            model: cli.model.clone(),
            generation_api_key,
            search: SearchConfig::new(google_api_key, google_cx),
            pipeline: PipelineConfig {
                preferred_language: cli.language.clone(),
                ..PipelineConfig::default()
            },
        })
    }

    pub fn build_pipeline(&self) -> Result<Pipeline, ConfigError> {
        let mut generator = HttpTextGenerator::new(self.provider, &self.generation_api_key)?;
        if let Some(model) = &self.model {
            generator = generator.with_model(model);
        }
        tracing::info!(
            provider = self.provider.name(),
            model = generator.model(),
            language = %self.pipeline.preferred_language,
            "Pipeline configured"
        );

        Ok(Pipeline::new(
            &self.pipeline,
            Arc::new(YoutubeTranscripts::new()?),
            Arc::new(generator),
            Arc::new(GoogleCustomSearch::new(&self.search)?),
        ))
    }
}

fn required(value: Option<&str>, env_var: &'static str) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .ok_or(ConfigError::MissingApiKey { env_var })
}
