//! Per-session usage aggregation.

use intellay_types::{PipelineMetric, UsageSummary};
use tracing::debug;

/// Accumulates pipeline metric events into a session usage summary.
///
/// Fed from the session's `metrics_collected` events; the summary is
/// logged once from the shutdown path.
#[derive(Debug, Default)]
pub struct UsageCollector {
    summary: UsageSummary,
    events: u64,
}

impl UsageCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one metric event into the running totals.
    pub fn collect(&mut self, metric: &PipelineMetric) {
        debug!(stage = metric.stage(), "collected pipeline metric");
        self.events += 1;
        match metric {
            PipelineMetric::Llm {
                prompt_tokens,
                completion_tokens,
                ..
            } => {
                self.summary.llm_prompt_tokens += prompt_tokens;
                self.summary.llm_completion_tokens += completion_tokens;
            }
            PipelineMetric::Tts { characters, .. } => {
                self.summary.tts_characters += characters;
            }
            PipelineMetric::Stt { audio_duration_ms } => {
                self.summary.stt_audio_duration_ms += audio_duration_ms;
            }
            PipelineMetric::EndOfUtterance { .. } => {}
        }
    }

    /// The aggregate totals so far.
    pub fn summary(&self) -> UsageSummary {
        self.summary
    }

    /// Number of metric events collected.
    pub fn event_count(&self) -> u64 {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collector_sums_across_stages() {
        let mut collector = UsageCollector::new();

        collector.collect(&PipelineMetric::Llm {
            prompt_tokens: 10,
            completion_tokens: 20,
            ttft_ms: 300,
        });
        collector.collect(&PipelineMetric::Llm {
            prompt_tokens: 5,
            completion_tokens: 7,
            ttft_ms: 250,
        });
        collector.collect(&PipelineMetric::Tts {
            characters: 120,
            ttfb_ms: 90,
        });
        collector.collect(&PipelineMetric::Stt {
            audio_duration_ms: 4_000,
        });
        collector.collect(&PipelineMetric::EndOfUtterance { delay_ms: 80 });

        let summary = collector.summary();
        assert_eq!(summary.llm_prompt_tokens, 15);
        assert_eq!(summary.llm_completion_tokens, 27);
        assert_eq!(summary.tts_characters, 120);
        assert_eq!(summary.stt_audio_duration_ms, 4_000);
        assert_eq!(collector.event_count(), 5);
    }

    #[test]
    fn empty_collector_reports_zero_summary() {
        let collector = UsageCollector::new();
        assert_eq!(collector.summary(), UsageSummary::default());
    }
}
