//! Pipeline metric events and usage aggregation types.
//!
//! Each stage of the voice pipeline reports per-turn measurements through
//! the session's `metrics_collected` event. The variants here mirror what
//! the providers emit; aggregation lives in the agent crate.

use serde::{Deserialize, Serialize};

/// A single metric event emitted by one pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum PipelineMetric {
    /// Language-model turn: token counts plus time to first token.
    Llm {
        prompt_tokens: u64,
        completion_tokens: u64,
        ttft_ms: u64,
    },
    /// Speech-to-text: duration of audio transcribed.
    Stt { audio_duration_ms: u64 },
    /// Text-to-speech: characters synthesized plus time to first byte.
    Tts { characters: u64, ttfb_ms: u64 },
    /// End-of-utterance detection delay for one turn.
    EndOfUtterance { delay_ms: u64 },
}

impl PipelineMetric {
    /// Returns the canonical stage label for this metric.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Llm { .. } => "llm",
            Self::Stt { .. } => "stt",
            Self::Tts { .. } => "tts",
            Self::EndOfUtterance { .. } => "eou",
        }
    }
}

/// Aggregate usage totals for one session, reported at shutdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSummary {
    pub llm_prompt_tokens: u64,
    pub llm_completion_tokens: u64,
    pub tts_characters: u64,
    pub stt_audio_duration_ms: u64,
}

impl std::fmt::Display for UsageSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "llm_prompt_tokens={} llm_completion_tokens={} tts_characters={} stt_audio_ms={}",
            self.llm_prompt_tokens,
            self.llm_completion_tokens,
            self.tts_characters,
            self.stt_audio_duration_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_serializes_with_stage_tag() {
        let metric = PipelineMetric::Llm {
            prompt_tokens: 12,
            completion_tokens: 34,
            ttft_ms: 250,
        };

        let json = serde_json::to_value(&metric).unwrap();
        assert_eq!(json["stage"], "llm");
        assert_eq!(json["prompt_tokens"], 12);
    }

    #[test]
    fn stage_labels_are_stable() {
        assert_eq!(PipelineMetric::Stt { audio_duration_ms: 1 }.stage(), "stt");
        assert_eq!(PipelineMetric::EndOfUtterance { delay_ms: 1 }.stage(), "eou");
    }
}
