//! Heuristic fallback parsing policy.
//!
//! Turns the generic date grammar's output into a concrete civil-time window
//! using domain keywords (lunch/morning/afternoon/evening, "same time") and
//! the mid-morning default. All windows are computed on wall-clock time in
//! the caller's timezone, then materialized to offset-carrying instants.

use chrono::{DateTime, Duration, FixedOffset, LocalResult, NaiveDateTime, NaiveTime, TimeZone, Timelike};
use chrono_tz::Tz;
use slotwise_domain::constants::{
    DEFAULT_FALLBACK_CONFIDENCE, DEFAULT_FALLBACK_HOUR, DEFAULT_INTENT_SPAN_MINUTES,
    HEURISTIC_CONFIDENCE, REJECTED_PROXIMITY_MINUTES, REJECTED_SHIFT_MINUTES,
};
use slotwise_domain::utils::date_grammar::{extract_date_candidate, DateCandidate};
use slotwise_domain::{Intent, ParsingMethod};

/// Deterministic parse of `query` anchored to `now`.
///
/// Returns `None` when the generic grammar finds no date or time in the text
/// at all, signalling the chain to fall through to the default stage.
pub fn heuristic_intent(query: &str, now: DateTime<Tz>) -> Option<Intent> {
    let candidate = extract_date_candidate(query, now.naive_local())?;
    Some(build_intent(query, candidate, now, ParsingMethod::FallbackHeuristic, HEURISTIC_CONFIDENCE))
}

/// Last-resort intent: tomorrow, mid-morning. The time-of-day keyword policy
/// still applies on top of the tomorrow anchor so that phrases like "lunch"
/// keep their meaning even when no date could be extracted.
pub fn default_intent(query: &str, now: DateTime<Tz>) -> Intent {
    let candidate =
        DateCandidate { date: now.date_naive() + Duration::days(1), time: None };
    build_intent(query, candidate, now, ParsingMethod::FallbackDefault, DEFAULT_FALLBACK_CONFIDENCE)
}

/// Soft exclusion: a fallback start within ±30 minutes of any rejected time
/// moves forward exactly one hour. Applied once, never re-checked against
/// the remaining rejections.
pub fn avoid_rejected_times(
    intent: Intent,
    rejected: &[DateTime<FixedOffset>],
) -> (Intent, Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)>) {
    let proximity = Duration::minutes(REJECTED_PROXIMITY_MINUTES);
    let collides = rejected
        .iter()
        .any(|r| intent.start_time.signed_duration_since(*r).abs() <= proximity);

    if !collides {
        return (intent, None);
    }

    let shift = Duration::minutes(REJECTED_SHIFT_MINUTES);
    let from = intent.start_time;
    let shifted = Intent {
        start_time: intent.start_time + shift,
        end_time: intent.end_time + shift,
        ..intent
    };
    let to = shifted.start_time;
    (shifted, Some((from, to)))
}

fn build_intent(
    query: &str,
    candidate: DateCandidate,
    now: DateTime<Tz>,
    method: ParsingMethod,
    confidence: f64,
) -> Intent {
    let (start_of_day, span, label) = resolve_time_of_day(query, candidate.time, now);

    let start_naive = candidate.date.and_time(start_of_day);
    let end_naive = start_naive + span;

    let tz = now.timezone();
    let start = resolve_local(tz, start_naive);
    let end = resolve_local(tz, end_naive);

    let interpretation = format!(
        "{} on {} from {} to {}",
        label,
        candidate.date,
        start_naive.format("%H:%M"),
        end_naive.format("%H:%M"),
    );

    Intent {
        start_time: start.fixed_offset(),
        end_time: end.fixed_offset(),
        interpretation,
        confidence,
        method,
    }
}

/// Keyword policy, first match wins; "same time" is checked last and
/// overrides everything else, including an explicitly parsed hour.
fn resolve_time_of_day(
    query: &str,
    parsed_time: Option<NaiveTime>,
    now: DateTime<Tz>,
) -> (NaiveTime, Duration, &'static str) {
    let lower = query.to_lowercase();

    let (start, span, label) = if lower.contains("lunch") {
        (time(11, 30), Duration::minutes(120), "Lunch window")
    } else if lower.contains("morning") {
        (time(9, 0), Duration::minutes(180), "Morning window")
    } else if lower.contains("afternoon") {
        (time(13, 0), Duration::minutes(240), "Afternoon window")
    } else if lower.contains("evening") {
        (time(17, 0), Duration::minutes(180), "Evening window")
    } else if let Some(t) = parsed_time {
        (t, Duration::minutes(DEFAULT_INTENT_SPAN_MINUTES), "Requested time")
    } else {
        (
            time(DEFAULT_FALLBACK_HOUR, 0),
            Duration::minutes(DEFAULT_INTENT_SPAN_MINUTES),
            "Assumed mid-morning start",
        )
    };

    if lower.contains("same time") {
        return (
            time(now.hour(), now.minute()),
            Duration::minutes(DEFAULT_INTENT_SPAN_MINUTES),
            "Same time of day",
        );
    }

    (start, span, label)
}

fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

/// Materialize a civil time in `tz`, tolerating DST transitions: ambiguous
/// times take the earlier offset, times inside a spring-forward gap move one
/// hour later.
fn resolve_local(tz: Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(first, _) => first,
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .unwrap_or_else(|| tz.from_utc_datetime(&naive)),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use chrono_tz::America::Chicago;

    use super::*;

    // Wednesday 2025-10-22, 09:15 in Chicago.
    fn now() -> DateTime<Tz> {
        Chicago.with_ymd_and_hms(2025, 10, 22, 9, 15, 42).unwrap()
    }

    fn local_hm(intent: &Intent) -> (u32, u32, u32, u32) {
        let start = intent.start_time.with_timezone(&Chicago);
        let end = intent.end_time.with_timezone(&Chicago);
        (start.hour(), start.minute(), end.hour(), end.minute())
    }

    #[test]
    fn lunch_resolves_to_half_past_eleven() {
        let intent = heuristic_intent("tomorrow around lunch", now()).unwrap();
        assert_eq!(local_hm(&intent), (11, 30, 13, 30));
        assert_eq!(
            intent.start_time.with_timezone(&Chicago).date_naive(),
            NaiveDate::from_ymd_opt(2025, 10, 23).unwrap()
        );
        assert_eq!(intent.method, ParsingMethod::FallbackHeuristic);
        assert_eq!(intent.confidence, HEURISTIC_CONFIDENCE);
    }

    #[test]
    fn lunch_keeps_its_meaning_in_the_default_stage() {
        let intent = default_intent("lunch", now());
        assert_eq!(local_hm(&intent), (11, 30, 13, 30));
        assert_eq!(intent.method, ParsingMethod::FallbackDefault);
        assert_eq!(intent.confidence, DEFAULT_FALLBACK_CONFIDENCE);
    }

    #[test]
    fn morning_afternoon_evening_windows() {
        let morning = heuristic_intent("friday morning", now()).unwrap();
        assert_eq!(local_hm(&morning), (9, 0, 12, 0));

        let afternoon = heuristic_intent("friday afternoon", now()).unwrap();
        assert_eq!(local_hm(&afternoon), (13, 0, 17, 0));

        let evening = heuristic_intent("friday evening", now()).unwrap();
        assert_eq!(local_hm(&evening), (17, 0, 20, 0));
    }

    #[test]
    fn explicit_hour_gets_a_one_hour_span() {
        let intent = heuristic_intent("tomorrow at 2:30pm", now()).unwrap();
        assert_eq!(local_hm(&intent), (14, 30, 15, 30));
    }

    #[test]
    fn missing_hour_defaults_to_ten() {
        let intent = heuristic_intent("next friday", now()).unwrap();
        assert_eq!(local_hm(&intent), (10, 0, 11, 0));
    }

    #[test]
    fn same_time_overrides_everything_and_drops_seconds() {
        let intent = heuristic_intent("tomorrow same time as lunch", now()).unwrap();
        assert_eq!(local_hm(&intent), (9, 15, 10, 15));
        assert_eq!(intent.start_time.second(), 0);
    }

    #[test]
    fn end_is_always_after_start() {
        for query in ["lunch tomorrow", "friday evening", "tomorrow at 11pm", "next monday"] {
            let intent = heuristic_intent(query, now()).unwrap();
            assert!(intent.end_time > intent.start_time, "query: {query}");
        }
        let fallback = default_intent("anything goes", now());
        assert!(fallback.end_time > fallback.start_time);
    }

    #[test]
    fn grammarless_query_yields_none() {
        assert!(heuristic_intent("whenever suits you", now()).is_none());
    }

    #[test]
    fn default_intent_lands_tomorrow_at_ten() {
        let intent = default_intent("whenever suits you", now());
        let start = intent.start_time.with_timezone(&Chicago);
        assert_eq!(start.date_naive(), NaiveDate::from_ymd_opt(2025, 10, 23).unwrap());
        assert_eq!((start.hour(), start.minute()), (10, 0));
    }

    #[test]
    fn rejected_time_within_thirty_minutes_shifts_one_hour() {
        // Heuristic resolves to 14:00; caller already rejected that slot.
        let intent = heuristic_intent("tomorrow at 2pm", now()).unwrap();
        let rejected: DateTime<FixedOffset> = "2025-10-23T14:00:00-05:00".parse().unwrap();

        let (shifted, moved) = avoid_rejected_times(intent, &[rejected]);
        assert_eq!(local_hm(&shifted), (15, 0, 16, 0));
        let (from, to) = moved.unwrap();
        assert_eq!(to.signed_duration_since(from), Duration::hours(1));
    }

    #[test]
    fn shift_is_applied_once_even_if_the_new_start_collides_again() {
        let intent = heuristic_intent("tomorrow at 2pm", now()).unwrap();
        let first: DateTime<FixedOffset> = "2025-10-23T14:00:00-05:00".parse().unwrap();
        let second: DateTime<FixedOffset> = "2025-10-23T15:10:00-05:00".parse().unwrap();

        let (shifted, moved) = avoid_rejected_times(intent, &[first, second]);
        // 15:00 is within 30 minutes of the second rejection, but no second
        // shift happens.
        assert_eq!(local_hm(&shifted), (15, 0, 16, 0));
        assert!(moved.is_some());
    }

    #[test]
    fn distant_rejected_times_leave_the_intent_alone() {
        let intent = heuristic_intent("tomorrow at 2pm", now()).unwrap();
        let rejected: DateTime<FixedOffset> = "2025-10-23T16:00:00-05:00".parse().unwrap();

        let (kept, moved) = avoid_rejected_times(intent.clone(), &[rejected]);
        assert_eq!(kept.start_time, intent.start_time);
        assert!(moved.is_none());
    }
}
