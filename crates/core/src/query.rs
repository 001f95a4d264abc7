use std::sync::Arc;

use crate::{
    config::GenerationSettings,
    error::{GenerationStage, StageError},
    provider::TextGenerator,
    types::SearchQuery,
};

fn query_prompt(transcript: &str) -> String {
    format!(
        r#"You are a search query specialist who turns long video transcripts into short, effective web search queries.

Read the transcript below and write ONE fact-focused search query that captures the factual claims made in the video.

The query must:
- Name the main subject and the key themes of the video
- Keep the concrete details that matter: names, dates, events, places, figures and technical terms
- Leave out sponsor messages, advertisements, calls to subscribe and any other promotional content
- Be phrased to surface reputable, authoritative sources
- Be no longer than 20-30 words

Output ONLY the query text, nothing else.

Transcript:
{transcript}
"#
    )
}

/// Turns transcript text into a short search query
pub struct QueryGenerator {
    generator: Arc<dyn TextGenerator>,
    settings: GenerationSettings,
}

impl QueryGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>, settings: GenerationSettings) -> Self {
        Self {
            generator,
            settings,
        }
    }

    pub async fn generate(&self, transcript: &str) -> Result<SearchQuery, StageError> {
        let prompt = query_prompt(transcript);
        let text = self
            .generator
            .generate(&prompt, &self.settings)
            .await
            .map_err(|source| StageError::Generation {
                stage: GenerationStage::Query,
                source,
            })?;

        let query = text.trim();
        if query.is_empty() {
            return Err(StageError::Unexpected {
                reason: "query stage produced an empty search query".to_string(),
            });
        }

        Ok(SearchQuery::new(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockGenerator;

    #[tokio::test]
    async fn query_is_trimmed_and_uses_query_settings() {
        let generator = Arc::new(MockGenerator::replying(&["  moon landing 1969 Apollo 11 hoax claims \n"]));
        let stage = QueryGenerator::new(generator.clone(), GenerationSettings::QUERY);

        let query = stage.generate("we never went to the moon").await.unwrap();

        assert_eq!(query.as_str(), "moon landing 1969 Apollo 11 hoax claims");
        let prompts = generator.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].0.ends_with("Transcript:\nwe never went to the moon\n"));
        assert!(prompts[0].0.contains("promotional"));
        assert_eq!(prompts[0].1, GenerationSettings::QUERY);
    }

    #[tokio::test]
    async fn blank_query_is_unexpected() {
        let generator = Arc::new(MockGenerator::replying(&[" \n\t "]));
        let stage = QueryGenerator::new(generator, GenerationSettings::QUERY);

        let err = stage.generate("anything").await.unwrap_err();

        assert!(matches!(err, StageError::Unexpected { .. }));
    }

    #[tokio::test]
    async fn generation_failure_is_tagged_with_query_stage() {
        let generator = Arc::new(MockGenerator::default().then_fail());
        let stage = QueryGenerator::new(generator, GenerationSettings::QUERY);

        let err = stage.generate("anything").await.unwrap_err();

        assert!(matches!(
            err,
            StageError::Generation {
                stage: GenerationStage::Query,
                ..
            }
        ));
    }
}
