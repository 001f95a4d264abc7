use crate::pipeline::PipelineRun;

/// Format seconds as MM:SS timestamp
pub fn format_timestamp(seconds: f64) -> String {
    let mins = (seconds / 60.0) as u32;
    let secs = (seconds % 60.0) as u32;
    format!("{:02}:{:02}", mins, secs)
}

/// Format a finished run as human-readable markdown
pub fn format_run_readable(run: &PipelineRun) -> String {
    let mut output = String::new();

    output.push_str(&format!("# Evaluation of {}\n\n", run.video_id));

    if let Some(transcript) = &run.transcript {
        output.push_str(&format!(
            "**Transcript:** {} | **Length:** {} | **Segments:** {}\n\n",
            transcript.language,
            format_timestamp(transcript.duration_seconds),
            transcript.segments
        ));
    }

    if let Some(query) = &run.query {
        output.push_str("## Search query\n\n");
        output.push_str(&format!("{}\n\n", query));
    }

    if let Some(evidence) = &run.evidence {
        output.push_str("## Sources\n\n");
        for line in evidence.lines() {
            output.push_str(&format!("• {}\n", line));
        }
        output.push('\n');
    }

    if let Ok(report) = &run.outcome {
        output.push_str("## Assessment\n\n");
        output.push_str(report.as_str());
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::{
        error::{StageError, TranscriptError},
        pipeline::{PipelineState, TranscriptInfo},
        types::{EvaluationReport, EvidenceSet, SearchQuery, VideoId},
    };

    #[test]
    fn readable_run_lists_query_sources_and_assessment() {
        let run = PipelineRun {
            run_id: Uuid::nil(),
            video_id: VideoId::parse("abc123").unwrap(),
            states: vec![PipelineState::Done],
            transcript: Some(TranscriptInfo {
                language: "en".to_string(),
                segments: 42,
                duration_seconds: 125.0,
            }),
            query: Some(SearchQuery::new("moon landing 1969")),
            evidence: Some(EvidenceSet::NoSources),
            outcome: Ok(EvaluationReport::new("- Mostly accurate.")),
        };

        let text = format_run_readable(&run);

        assert!(text.starts_with("# Evaluation of abc123\n\n"));
        assert!(text.contains("**Transcript:** en | **Length:** 02:05 | **Segments:** 42"));
        assert!(text.contains("## Search query\n\nmoon landing 1969\n"));
        assert!(text.contains("• No reliable sources found\n"));
        assert!(text.ends_with("## Assessment\n\n- Mostly accurate.\n"));
    }

    #[test]
    fn failed_run_has_no_assessment() {
        let run = PipelineRun {
            run_id: Uuid::nil(),
            video_id: VideoId::parse("abc123").unwrap(),
            states: vec![PipelineState::FetchingTranscript, PipelineState::Failed],
            transcript: None,
            query: None,
            evidence: None,
            outcome: Err(StageError::TranscriptUnavailable {
                video_id: "abc123".to_string(),
                source: TranscriptError::TranscriptsDisabled {
                    video_id: "abc123".to_string(),
                },
            }),
        };

        assert_eq!(format_run_readable(&run), "# Evaluation of abc123\n\n");
    }

    #[test]
    fn timestamps_are_zero_padded() {
        assert_eq!(format_timestamp(0.0), "00:00");
        assert_eq!(format_timestamp(75.4), "01:15");
        assert_eq!(format_timestamp(3600.0), "60:00");
    }
}
