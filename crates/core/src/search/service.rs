//! Expanding search orchestrator - core business logic

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Duration, FixedOffset, Utc};
use chrono_tz::Tz;
use slotwise_domain::{AttemptLabel, Intent, Result, SearchWindow, Slot, SlotwiseError};
use tracing::{debug, warn};

use super::ports::{SlotQuery, SlotSource};
use crate::events::{EngineEvent, EventSink};

/// Result of a successful search: the surviving slots, the window that
/// produced them, and the cumulative slot-source time across attempts.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub slots: Vec<Slot>,
    pub window: SearchWindow,
    pub cal_api_ms: u64,
}

/// The four escalating windows derived from an intent, in try order.
pub fn expansion_windows(intent: &Intent, flexibility_hours: i64) -> [SearchWindow; 4] {
    let start = intent.start_time.with_timezone(&Utc);
    let end = intent.end_time.with_timezone(&Utc);
    let flex = Duration::hours(flexibility_hours);

    [
        SearchWindow { from: start - flex, to: end + flex, label: AttemptLabel::RequestedRange },
        SearchWindow {
            from: start - Duration::hours(24),
            to: end + Duration::hours(24),
            label: AttemptLabel::Plus24h,
        },
        SearchWindow {
            from: start - Duration::days(7),
            to: end + Duration::days(7),
            label: AttemptLabel::Plus7d,
        },
        SearchWindow { from: start, to: start + Duration::days(30), label: AttemptLabel::Next30d },
    ]
}

/// Sequential widening search against the slot source.
///
/// Inherently serial: each window's outcome decides whether the next one is
/// tried at all, and the loop stops at the first attempt with at least one
/// non-rejected slot.
pub struct ExpandingSearch {
    source: Arc<dyn SlotSource>,
    sink: Arc<dyn EventSink>,
}

impl ExpandingSearch {
    pub fn new(source: Arc<dyn SlotSource>, sink: Arc<dyn EventSink>) -> Self {
        Self { source, sink }
    }

    /// Try the four expansion windows in order. A transport failure on one
    /// attempt counts as zero results for that attempt; only full exhaustion
    /// is an error, surfaced as the distinguishable no-availability outcome.
    pub async fn find_slots(
        &self,
        intent: &Intent,
        flexibility_hours: i64,
        event_type_id: i64,
        duration_minutes: i64,
        timezone: Tz,
        rejected_times: &[DateTime<FixedOffset>],
    ) -> Result<SearchOutcome> {
        let windows = expansion_windows(intent, flexibility_hours);
        let mut cal_api_ms = 0u64;

        for window in windows {
            self.sink.emit(EngineEvent::SearchAttempt {
                label: window.label,
                from: window.from,
                to: window.to,
            });
            debug!(attempt = %window.label, from = %window.from, to = %window.to, "querying slot source");

            let query = SlotQuery {
                from: window.from,
                to: window.to,
                event_type_id,
                duration_minutes,
                timezone,
            };

            let started = Instant::now();
            let fetched = self.source.fetch_slots(&query).await;
            cal_api_ms += started.elapsed().as_millis() as u64;

            match fetched {
                Ok(found) => {
                    let total = found.len();
                    let slots = drop_rejected(found, rejected_times);
                    self.sink.emit(EngineEvent::SearchAttemptReturned {
                        label: window.label,
                        found: total,
                        rejected: total - slots.len(),
                    });

                    if !slots.is_empty() {
                        return Ok(SearchOutcome { slots, window, cal_api_ms });
                    }
                }
                Err(err) => {
                    warn!(attempt = %window.label, error = %err, "slot source attempt failed, advancing");
                    self.sink.emit(EngineEvent::SearchAttemptFailed {
                        label: window.label,
                        error: err.to_string(),
                    });
                }
            }
        }

        self.sink.emit(EngineEvent::SearchExhausted { attempts: windows.len() });

        let searched_from = windows.iter().map(|w| w.from).min().unwrap_or_else(Utc::now);
        let searched_to = windows.iter().map(|w| w.to).max().unwrap_or_else(Utc::now);
        Err(SlotwiseError::NoAvailability { searched_from, searched_to })
    }
}

/// Exact-instant exclusion: a slot is dropped only when its start equals a
/// rejected timestamp. Near misses are kept; rejected times influence the
/// heuristic shift, never window filtering.
fn drop_rejected(slots: Vec<Slot>, rejected_times: &[DateTime<FixedOffset>]) -> Vec<Slot> {
    if rejected_times.is_empty() {
        return slots;
    }
    slots
        .into_iter()
        .filter(|slot| !rejected_times.iter().any(|r| r.with_timezone(&Utc) == slot.start))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono_tz::America::Chicago;
    use slotwise_domain::ParsingMethod;

    use super::*;
    use crate::events::{NullSink, RecordingSink};

    /// Slot source that replays a script of per-attempt responses and
    /// records the queries it received.
    struct ScriptedSource {
        script: Mutex<Vec<Result<Vec<Slot>>>>,
        queries: Mutex<Vec<SlotQuery>>,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<Vec<Slot>>>) -> Arc<Self> {
            Arc::new(Self { script: Mutex::new(script), queries: Mutex::new(Vec::new()) })
        }

        fn calls(&self) -> usize {
            self.queries.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SlotSource for ScriptedSource {
        async fn fetch_slots(&self, query: &SlotQuery) -> Result<Vec<Slot>> {
            self.queries.lock().unwrap().push(query.clone());
            let mut script = self.script.lock().unwrap();
            if script.is_empty() {
                return Ok(Vec::new());
            }
            script.remove(0)
        }
    }

    fn intent() -> Intent {
        Intent {
            start_time: "2025-10-23T11:30:00-05:00".parse().unwrap(),
            end_time: "2025-10-23T13:30:00-05:00".parse().unwrap(),
            interpretation: "Lunch window tomorrow".into(),
            confidence: 0.6,
            method: ParsingMethod::FallbackHeuristic,
        }
    }

    fn slot_at(rfc3339: &str) -> Slot {
        let start: DateTime<Utc> = rfc3339.parse().unwrap();
        Slot { start, end: start + Duration::minutes(30) }
    }

    fn search(source: Arc<ScriptedSource>) -> ExpandingSearch {
        ExpandingSearch::new(source, Arc::new(NullSink))
    }

    #[test]
    fn windows_escalate_in_the_documented_order() {
        let windows = expansion_windows(&intent(), 2);
        let start = intent().start_time.with_timezone(&Utc);
        let end = intent().end_time.with_timezone(&Utc);

        assert_eq!(windows[0].label, AttemptLabel::RequestedRange);
        assert_eq!(windows[0].from, start - Duration::hours(2));
        assert_eq!(windows[0].to, end + Duration::hours(2));

        assert_eq!(windows[1].label, AttemptLabel::Plus24h);
        assert_eq!(windows[1].from, start - Duration::hours(24));

        assert_eq!(windows[2].label, AttemptLabel::Plus7d);
        assert_eq!(windows[2].to, end + Duration::days(7));

        assert_eq!(windows[3].label, AttemptLabel::Next30d);
        assert_eq!(windows[3].from, start);
        assert_eq!(windows[3].to, start + Duration::days(30));
    }

    #[tokio::test]
    async fn stops_at_the_first_non_empty_attempt() {
        let source = ScriptedSource::new(vec![Ok(vec![slot_at("2025-10-23T17:00:00Z")])]);
        let outcome = search(source.clone())
            .find_slots(&intent(), 2, 7, 30, Chicago, &[])
            .await
            .unwrap();

        assert_eq!(outcome.window.label, AttemptLabel::RequestedRange);
        assert_eq!(outcome.slots.len(), 1);
        // Monotonicity: later windows were never issued.
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn empty_attempts_escalate_until_one_succeeds() {
        let source = ScriptedSource::new(vec![
            Ok(Vec::new()),
            Ok(Vec::new()),
            Ok(vec![slot_at("2025-10-27T15:00:00Z")]),
        ]);
        let outcome = search(source.clone())
            .find_slots(&intent(), 2, 7, 30, Chicago, &[])
            .await
            .unwrap();

        assert_eq!(outcome.window.label, AttemptLabel::Plus7d);
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn transport_failure_advances_instead_of_aborting() {
        let source = ScriptedSource::new(vec![
            Err(SlotwiseError::Network("timed out".into())),
            Ok(vec![slot_at("2025-10-24T15:00:00Z")]),
        ]);
        let outcome = search(source.clone())
            .find_slots(&intent(), 2, 7, 30, Chicago, &[])
            .await
            .unwrap();

        assert_eq!(outcome.window.label, AttemptLabel::Plus24h);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn exhaustion_is_the_distinguishable_no_availability_outcome() {
        let source = ScriptedSource::new(vec![
            Ok(Vec::new()),
            Ok(Vec::new()),
            Ok(Vec::new()),
            Ok(Vec::new()),
        ]);
        let err = search(source.clone())
            .find_slots(&intent(), 2, 7, 30, Chicago, &[])
            .await
            .unwrap_err();

        assert!(matches!(err, SlotwiseError::NoAvailability { .. }));
        // No fifth attempt exists.
        assert_eq!(source.calls(), 4);
    }

    #[tokio::test]
    async fn fully_rejected_attempt_counts_as_empty() {
        let rejected: DateTime<FixedOffset> = "2025-10-23T12:00:00-05:00".parse().unwrap();
        let only = slot_at("2025-10-23T17:00:00Z"); // same instant as the rejection
        let source = ScriptedSource::new(vec![
            Ok(vec![only]),
            Ok(vec![slot_at("2025-10-24T16:00:00Z")]),
        ]);

        let outcome = search(source)
            .find_slots(&intent(), 2, 7, 30, Chicago, &[rejected])
            .await
            .unwrap();

        assert_eq!(outcome.window.label, AttemptLabel::Plus24h);
    }

    #[tokio::test]
    async fn rejected_time_filtering_is_exact_match_only() {
        // Open question from the original behavior, pinned deliberately: a
        // slot 15 minutes away from a rejected time survives filtering even
        // though the heuristic shift would have avoided it.
        let rejected: DateTime<FixedOffset> = "2025-10-23T12:00:00-05:00".parse().unwrap();
        let exact = slot_at("2025-10-23T17:00:00Z");
        let near = slot_at("2025-10-23T17:15:00Z");
        let source = ScriptedSource::new(vec![Ok(vec![exact, near])]);

        let outcome = search(source)
            .find_slots(&intent(), 2, 7, 30, Chicago, &[rejected])
            .await
            .unwrap();

        assert_eq!(outcome.slots, vec![near]);
    }

    #[tokio::test]
    async fn emits_the_full_decision_path() {
        let sink = Arc::new(RecordingSink::new());
        let source = ScriptedSource::new(vec![
            Ok(Vec::new()),
            Ok(vec![slot_at("2025-10-24T16:00:00Z")]),
        ]);
        let search = ExpandingSearch::new(source, sink.clone());

        search.find_slots(&intent(), 2, 7, 30, Chicago, &[]).await.unwrap();

        let events = sink.events();
        let attempts = events
            .iter()
            .filter(|e| matches!(e, EngineEvent::SearchAttempt { .. }))
            .count();
        assert_eq!(attempts, 2);
    }
}
