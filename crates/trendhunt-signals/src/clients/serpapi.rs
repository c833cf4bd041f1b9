//! Search-interest index client, read through SerpApi's Google Trends engine.

use reqwest::Client;
use serde::Deserialize;

use super::{fetch_json, normalize_base_url, HttpSettings};
use crate::error::SignalError;

#[derive(Debug, Deserialize)]
struct TrendsResponse {
    error: Option<String>,
    interest_over_time: Option<InterestOverTime>,
    related_queries: Option<RelatedQueries>,
}

#[derive(Debug, Deserialize)]
struct InterestOverTime {
    #[serde(default)]
    timeline_data: Vec<TimelinePoint>,
}

#[derive(Debug, Deserialize)]
struct TimelinePoint {
    #[serde(default)]
    values: Vec<TimelineValue>,
}

#[derive(Debug, Deserialize)]
struct TimelineValue {
    #[serde(default)]
    extracted_value: f64,
}

#[derive(Debug, Deserialize)]
struct RelatedQueries {
    #[serde(default)]
    rising: Vec<RisingQuery>,
}

/// One "rising" related query. `extracted_value` is the percentage increase.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RisingQuery {
    pub query: String,
    #[serde(default)]
    pub extracted_value: f64,
}

pub struct SerpApiClient {
    client: Client,
    settings: HttpSettings,
    api_key: String,
    base_url: String,
}

impl SerpApiClient {
    /// # Errors
    ///
    /// Returns [`SignalError`] if the HTTP client cannot be built or the URL is blank.
    pub fn with_base_url(
        api_key: &str,
        settings: &HttpSettings,
        base_url: &str,
    ) -> Result<Self, SignalError> {
        Ok(Self {
            client: settings.build_client()?,
            settings: settings.clone(),
            api_key: api_key.to_owned(),
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// Interest-over-time values (0–100), oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::Api`] if the engine reports an error, or
    /// [`SignalError`] on transport and decode failures.
    pub async fn interest_over_time(&self, query: &str) -> Result<Vec<f64>, SignalError> {
        let response = self.trends(query, "TIMESERIES").await?;
        Ok(response
            .interest_over_time
            .map(|iot| {
                iot.timeline_data
                    .into_iter()
                    .filter_map(|point| point.values.first().map(|v| v.extracted_value))
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Related queries in the "rising" bucket.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::Api`] if the engine reports an error, or
    /// [`SignalError`] on transport and decode failures.
    pub async fn rising_queries(&self, query: &str) -> Result<Vec<RisingQuery>, SignalError> {
        let response = self.trends(query, "RELATED_QUERIES").await?;
        Ok(response
            .related_queries
            .map(|rq| rq.rising)
            .unwrap_or_default())
    }

    async fn trends(&self, query: &str, data_type: &str) -> Result<TrendsResponse, SignalError> {
        let url = format!("{}/search.json", self.base_url);
        let response: TrendsResponse = fetch_json(&self.settings, "serpapi google_trends", || {
            self.client.get(&url).query(&[
                ("engine", "google_trends"),
                ("q", query),
                ("data_type", data_type),
                ("api_key", self.api_key.as_str()),
            ])
        })
        .await?;

        // "hasn't returned any results" is an empty timeline, not a failure.
        match response.error {
            Some(message) if !message.contains("hasn't returned any results") => {
                Err(SignalError::Api {
                    source_name: "SerpApi",
                    message,
                })
            }
            _ => Ok(response),
        }
    }
}
