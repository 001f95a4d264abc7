use std::sync::Arc;

use crate::{
    config::GenerationSettings,
    error::{GenerationStage, StageError},
    provider::TextGenerator,
    types::{EvaluationReport, EvidenceSet},
};

fn evaluation_prompt(transcript: &str, sources: &str) -> String {
    format!(
        r#"You are an experienced fact-checker and media analyst. You evaluate online video content for factual accuracy, bias and logical consistency.

Below is the transcript of a YouTube video followed by a list of sources found on the web. Analyse the transcript by working through these steps in order. Ignore sponsor segments, advertisements and any other promotion or monetization content: it has no bearing on factual accuracy or bias.

1. **Key Factual Points**
   - List the main factual claims and assertions made in the transcript.

2. **Source Verification**
   - Compare each factual point with the sources provided.
   - Point out confirmations, contradictions, and context the sources add.

3. **Bias and Representation**
   - Look for selective presentation of facts, missing viewpoints and emotionally loaded language.
   - Note perspectives that are overemphasised or ignored.

4. **Logical Consistency**
   - Assess how the arguments flow.
   - Identify logical fallacies, contradictions or gaps in reasoning.

5. **Additional Observations**
   - Note misleading statements or rhetorical techniques that could shape how viewers perceive the content.

6. **Overall Assessment**
   - Give a concise verdict on the credibility, balance and reliability of the video.

Write the evaluation as clear, structured bullet points. The whole output must not exceed 500 words.

Transcript:
{transcript}

Reliable Sources:
{sources}
"#
    )
}

/// Turns transcript and evidence into a credibility report
pub struct EvaluationSynthesizer {
    generator: Arc<dyn TextGenerator>,
    settings: GenerationSettings,
}

impl EvaluationSynthesizer {
    pub fn new(generator: Arc<dyn TextGenerator>, settings: GenerationSettings) -> Self {
        Self {
            generator,
            settings,
        }
    }

    pub async fn synthesize(
        &self,
        transcript: &str,
        evidence: &EvidenceSet,
    ) -> Result<EvaluationReport, StageError> {
        let prompt = evaluation_prompt(transcript, &evidence.render());
        let text = self
            .generator
            .generate(&prompt, &self.settings)
            .await
            .map_err(|source| StageError::Generation {
                stage: GenerationStage::Evaluation,
                source,
            })?;

        let report = text.trim();
        if report.is_empty() {
            return Err(StageError::Unexpected {
                reason: "evaluation stage produced no text".to_string(),
            });
        }

        Ok(EvaluationReport::new(report))
    }
}
