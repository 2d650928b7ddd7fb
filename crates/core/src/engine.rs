//! Availability resolution engine - request orchestration

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use slotwise_domain::{
    AvailabilityRequest, AvailabilityResponse, ResponseMetadata, Result, SearchRange, Timings,
};

use crate::categorize::categorize;
use crate::events::EventSink;
use crate::intent::{IntentExtractor, IntentResolver};
use crate::search::{ExpandingSearch, SlotSource};

/// End-to-end availability resolution: text → intent → expanding search →
/// categorized result with timing metadata.
///
/// Pure given its inputs aside from reading "now" once at entry; all network
/// effects live behind the injected ports.
pub struct AvailabilityEngine {
    resolver: IntentResolver,
    search: ExpandingSearch,
}

impl AvailabilityEngine {
    pub fn new(
        extractor: Arc<dyn IntentExtractor>,
        source: Arc<dyn SlotSource>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            resolver: IntentResolver::new(extractor, sink.clone()),
            search: ExpandingSearch::new(source, sink),
        }
    }

    /// Override the primary-parse confidence threshold.
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.resolver = self.resolver.with_min_confidence(min_confidence);
        self
    }

    /// Handle one request, anchored to the current instant.
    pub async fn handle(&self, request: &AvailabilityRequest) -> Result<AvailabilityResponse> {
        let now = Utc::now().with_timezone(&request.timezone);
        self.handle_at(request, now).await
    }

    /// Handle one request anchored to an explicit instant. Split out so the
    /// whole flow stays deterministic under test.
    pub async fn handle_at(
        &self,
        request: &AvailabilityRequest,
        now: DateTime<Tz>,
    ) -> Result<AvailabilityResponse> {
        let started = Instant::now();

        let resolution = self
            .resolver
            .resolve(
                &request.user_query,
                now,
                &request.rejected_times,
                request.system_prompt.as_deref(),
            )
            .await;

        let outcome = self
            .search
            .find_slots(
                &resolution.intent,
                request.flexibility_hours,
                request.event_type_id,
                request.duration_minutes,
                request.timezone,
                &request.rejected_times,
            )
            .await?;

        let categorized = categorize(&outcome.slots, &resolution.intent);

        Ok(AvailabilityResponse {
            available: categorized.available,
            proposed: categorized.proposed,
            metadata: ResponseMetadata {
                parsed_intent: (&resolution.intent).into(),
                search_range: SearchRange {
                    start: outcome.window.from,
                    end: outcome.window.to,
                    attempt: outcome.window.label,
                },
                timings: Timings {
                    llm_ms: resolution.llm_ms,
                    cal_api_ms: outcome.cal_api_ms,
                    total_ms: started.elapsed().as_millis() as u64,
                },
            },
        })
    }
}
