//! Places text-search client (`X-Goog-Api-Key` plus a field mask).

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{fetch_json, normalize_base_url, HttpSettings};
use crate::error::SignalError;

const FIELD_MASK: &str = "places.id,places.displayName";

#[derive(Debug, Deserialize)]
struct SearchTextResponse {
    #[serde(default)]
    places: Vec<serde_json::Value>,
}

pub struct PlacesClient {
    client: Client,
    settings: HttpSettings,
    api_key: String,
    base_url: String,
}

impl PlacesClient {
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

    /// Number of places matching the free-text query. An empty result has no
    /// `places` key at all.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError`] on transport failure, non-2xx status, or a
    /// malformed body.
    pub async fn count_text_matches(&self, text_query: &str) -> Result<usize, SignalError> {
        let url = format!("{}/v1/places:searchText", self.base_url);
        let body = json!({ "textQuery": text_query });
        let response: SearchTextResponse = fetch_json(&self.settings, "places searchText", || {
            self.client
                .post(&url)
                .header("X-Goog-Api-Key", &self.api_key)
                .header("X-Goog-FieldMask", FIELD_MASK)
                .json(&body)
        })
        .await?;
        Ok(response.places.len())
    }
}
