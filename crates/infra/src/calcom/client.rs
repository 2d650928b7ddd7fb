use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::Duration;
use reqwest::Method;
use slotwise_core::search::{SlotQuery, SlotSource};
use slotwise_domain::{Result, Slot, SlotSourceConfig, SlotwiseError};
use tracing::debug;

use super::types::SlotsResponse;
use crate::http::HttpClient;

/// Slots API client.
///
/// One attempt per expansion window; the search loop treats a failed attempt
/// as empty and widens, so retrying here would only stall it.
pub struct CalComClient {
    http_client: HttpClient,
    api_key: String,
    base_url: String,
}

impl CalComClient {
    pub fn new(api_key: String, base_url: String, http_client: HttpClient) -> Self {
        Self { http_client, api_key, base_url }
    }

    /// Build a client from configuration, including its per-query timeout.
    pub fn from_config(config: &SlotSourceConfig) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(StdDuration::from_secs(config.timeout_secs))
            .max_attempts(1)
            .build()?;

        Ok(Self {
            http_client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl SlotSource for CalComClient {
    async fn fetch_slots(&self, query: &SlotQuery) -> Result<Vec<Slot>> {
        let url = format!("{}/slots", self.base_url.trim_end_matches('/'));

        let request_builder = self.http_client.request(Method::GET, &url).query(&[
            ("apiKey", self.api_key.as_str()),
            ("eventTypeId", &query.event_type_id.to_string()),
            ("dateFrom", &query.from.to_rfc3339()),
            ("dateTo", &query.to.to_rfc3339()),
            ("duration", &query.duration_minutes.to_string()),
            ("timeZone", query.timezone.name()),
        ]);

        let response = self.http_client.send(request_builder).await?;

        let status = response.status();
        debug!(status = status.as_u16(), "received slot source response");

        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(match status.as_u16() {
                401 | 403 => {
                    SlotwiseError::Config(format!("slot source rejected the API key ({status})"))
                }
                _ => SlotwiseError::Network(format!(
                    "slot source error (status {status}): {message}"
                )),
            });
        }

        let body: SlotsResponse = response.json().await.map_err(|e| {
            SlotwiseError::Network(format!("failed to parse slot source response: {e}"))
        })?;

        let span = Duration::minutes(query.duration_minutes);
        let mut slots: Vec<Slot> = body
            .slots
            .into_values()
            .flatten()
            .map(|entry| Slot { start: entry.time, end: entry.time + span })
            .collect();
        slots.sort_by_key(|slot| slot.start);

        Ok(slots)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use chrono_tz::America::Chicago;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn test_client(base_url: String) -> CalComClient {
        let http_client = HttpClient::builder()
            .timeout(StdDuration::from_secs(5))
            .max_attempts(1)
            .build()
            .expect("http client");

        CalComClient::new("test-api-key".to_string(), base_url, http_client)
    }

    fn sample_query() -> SlotQuery {
        SlotQuery {
            from: "2025-10-23T14:30:00Z".parse().unwrap(),
            to: "2025-10-23T20:30:00Z".parse().unwrap(),
            event_type_id: 7,
            duration_minutes: 30,
            timezone: Chicago,
        }
    }

    #[tokio::test]
    async fn fetches_and_flattens_the_date_keyed_slots() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/slots"))
            .and(query_param("apiKey", "test-api-key"))
            .and(query_param("eventTypeId", "7"))
            .and(query_param("duration", "30"))
            .and(query_param("timeZone", "America/Chicago"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "slots": {
                    "2025-10-24": [{ "time": "2025-10-24T15:00:00Z" }],
                    "2025-10-23": [
                        { "time": "2025-10-23T17:00:00Z" },
                        { "time": "2025-10-23T15:30:00Z" }
                    ]
                }
            })))
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        let slots = client.fetch_slots(&sample_query()).await.expect("slots");

        let starts: Vec<DateTime<Utc>> = slots.iter().map(|s| s.start).collect();
        assert_eq!(
            starts,
            vec![
                "2025-10-23T15:30:00Z".parse::<DateTime<Utc>>().unwrap(),
                "2025-10-23T17:00:00Z".parse().unwrap(),
                "2025-10-24T15:00:00Z".parse().unwrap(),
            ]
        );
        // End is derived from the requested duration.
        assert_eq!(slots[0].end, slots[0].start + Duration::minutes(30));
    }

    #[tokio::test]
    async fn empty_map_yields_no_slots() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/slots"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "slots": {}
            })))
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        let slots = client.fetch_slots(&sample_query()).await.expect("slots");
        assert!(slots.is_empty());
    }

    #[tokio::test]
    async fn server_error_surfaces_as_network_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/slots"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        let result = client.fetch_slots(&sample_query()).await;

        assert!(matches!(result, Err(SlotwiseError::Network(_))));
    }

    #[tokio::test]
    async fn authentication_failure_is_a_config_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/slots"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        let result = client.fetch_slots(&sample_query()).await;

        assert!(matches!(result, Err(SlotwiseError::Config(_))));
    }
}
