//! Intent resolution chain - core business logic

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use slotwise_domain::constants::{
    DEFAULT_MIN_PRIMARY_CONFIDENCE, MAX_INTERPRETATION_CHARS, MIN_INTERPRETATION_CHARS,
};
use slotwise_domain::{Intent, ParsingMethod};
use tracing::debug;

use super::heuristic::{avoid_rejected_times, default_intent, heuristic_intent};
use super::ports::{IntentExtractor, IntentPrompt, RawIntent};
use crate::events::{EngineEvent, EventSink};

/// Outcome of the resolution chain: the intent plus how long the
/// language-understanding attempt took, when one was made.
#[derive(Debug, Clone)]
pub struct IntentResolution {
    pub intent: Intent,
    pub llm_ms: Option<u64>,
}

/// Three-stage resolution chain: primary → heuristic → default.
///
/// Never fails; every stage either yields a validated [`Intent`] or signals
/// the next one. Rejected-time avoidance applies to the two fallback stages
/// only.
pub struct IntentResolver {
    extractor: Arc<dyn IntentExtractor>,
    sink: Arc<dyn EventSink>,
    min_confidence: f64,
}

impl IntentResolver {
    pub fn new(extractor: Arc<dyn IntentExtractor>, sink: Arc<dyn EventSink>) -> Self {
        Self { extractor, sink, min_confidence: DEFAULT_MIN_PRIMARY_CONFIDENCE }
    }

    /// Override the confidence threshold below which primary results are
    /// discarded.
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// Resolve `query` into an intent, degrading gracefully through the
    /// chain. `now` anchors every relative phrase to the caller's timezone.
    pub async fn resolve(
        &self,
        query: &str,
        now: DateTime<Tz>,
        rejected_times: &[DateTime<FixedOffset>],
        template: Option<&str>,
    ) -> IntentResolution {
        let started = Instant::now();
        let primary = self.try_primary(query, now, rejected_times, template).await;
        let llm_ms = Some(started.elapsed().as_millis() as u64);

        if let Some(intent) = primary {
            return IntentResolution { intent, llm_ms };
        }

        let intent = match heuristic_intent(query, now) {
            Some(intent) => {
                self.sink.emit(EngineEvent::HeuristicResolved {
                    interpretation: intent.interpretation.clone(),
                });
                intent
            }
            None => {
                let intent = default_intent(query, now);
                self.sink.emit(EngineEvent::DefaultResolved {
                    interpretation: intent.interpretation.clone(),
                });
                intent
            }
        };

        let (intent, moved) = avoid_rejected_times(intent, rejected_times);
        if let Some((from, to)) = moved {
            debug!(%from, %to, "fallback start collided with a rejected time");
            self.sink.emit(EngineEvent::StartShifted { from, to });
        }

        IntentResolution { intent, llm_ms }
    }

    async fn try_primary(
        &self,
        query: &str,
        now: DateTime<Tz>,
        rejected_times: &[DateTime<FixedOffset>],
        template: Option<&str>,
    ) -> Option<Intent> {
        let prompt = IntentPrompt {
            query: query.to_string(),
            now,
            rejected_times: rejected_times.to_vec(),
            template: template.map(str::to_string),
        };

        let raw = match self.extractor.extract(&prompt).await {
            Ok(raw) => raw,
            Err(err) => {
                debug!(error = %err, "language-understanding call failed");
                self.sink.emit(EngineEvent::PrimaryDiscarded { reason: err.to_string() });
                return None;
            }
        };

        match validate_candidate(&raw, self.min_confidence) {
            Ok((start_time, end_time)) => {
                self.sink.emit(EngineEvent::PrimaryAccepted { confidence: raw.confidence });
                Some(Intent {
                    start_time,
                    end_time,
                    interpretation: raw.interpretation,
                    confidence: raw.confidence,
                    method: ParsingMethod::Primary,
                })
            }
            Err(reason) => {
                debug!(%reason, "discarding language-understanding candidate");
                self.sink.emit(EngineEvent::PrimaryDiscarded { reason });
                None
            }
        }
    }
}

/// Enforce the collaborator contract on a raw candidate: RFC 3339 timestamps
/// with explicit offsets, positive duration, bounded interpretation, and the
/// confidence threshold. Any violation is a plain "try the next stage"
/// reason, never an error that escapes the chain.
fn validate_candidate(
    raw: &RawIntent,
    min_confidence: f64,
) -> std::result::Result<(DateTime<FixedOffset>, DateTime<FixedOffset>), String> {
    let start = DateTime::parse_from_rfc3339(&raw.start_time)
        .map_err(|e| format!("invalid startTime {:?}: {e}", raw.start_time))?;
    let end = DateTime::parse_from_rfc3339(&raw.end_time)
        .map_err(|e| format!("invalid endTime {:?}: {e}", raw.end_time))?;

    if end <= start {
        return Err("endTime is not after startTime".to_string());
    }

    let chars = raw.interpretation.chars().count();
    if !(MIN_INTERPRETATION_CHARS..=MAX_INTERPRETATION_CHARS).contains(&chars) {
        return Err(format!("interpretation length {chars} out of range"));
    }

    if !(0.0..=1.0).contains(&raw.confidence) {
        return Err(format!("confidence {} out of range", raw.confidence));
    }

    if raw.confidence < min_confidence {
        return Err(format!(
            "confidence {} below threshold {min_confidence}",
            raw.confidence
        ));
    }

    Ok((start, end))
}
