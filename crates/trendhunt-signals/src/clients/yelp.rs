//! Business directory search client (`Authorization: Bearer <key>`).

use reqwest::Client;
use serde::Deserialize;

use super::{fetch_json, normalize_base_url, HttpSettings};
use crate::error::SignalError;

#[derive(Debug, Clone, Deserialize)]
pub struct YelpCategory {
    #[serde(default)]
    pub alias: String,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YelpBusiness {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub categories: Vec<YelpCategory>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YelpSearch {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub businesses: Vec<YelpBusiness>,
}

pub struct YelpClient {
    client: Client,
    settings: HttpSettings,
    api_key: String,
    base_url: String,
}

impl YelpClient {
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

    /// Listings matching `term` near `location`.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError`] on transport failure, non-2xx status, or a
    /// malformed body.
    pub async fn search(
        &self,
        term: &str,
        location: &str,
        limit: u32,
    ) -> Result<YelpSearch, SignalError> {
        let limit = limit.to_string();
        self.businesses_search(
            "yelp business search",
            &[("term", term), ("location", location), ("limit", limit.as_str())],
        )
        .await
    }

    /// Food and restaurant listings flagged `hot_and_new` near `location`.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError`] on transport failure, non-2xx status, or a
    /// malformed body.
    pub async fn hot_and_new(&self, location: &str, limit: u32) -> Result<YelpSearch, SignalError> {
        let limit = limit.to_string();
        self.businesses_search(
            "yelp hot and new",
            &[
                ("location", location),
                ("attributes", "hot_and_new"),
                ("categories", "food,restaurants"),
                ("limit", limit.as_str()),
            ],
        )
        .await
    }

    async fn businesses_search(
        &self,
        context: &str,
        params: &[(&str, &str)],
    ) -> Result<YelpSearch, SignalError> {
        let url = format!("{}/v3/businesses/search", self.base_url);
        fetch_json(&self.settings, context, || {
            self.client
                .get(&url)
                .bearer_auth(&self.api_key)
                .query(params)
        })
        .await
    }
}
