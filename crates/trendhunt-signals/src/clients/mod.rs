//! HTTP clients for the external signal sources.
//!
//! Each client owns a base URL so tests can point it at a mock server. The
//! adapters and the discovery strategies share the same client instances via
//! [`SourceClients`].

mod places;
mod reddit;
mod serpapi;
mod yelp;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use trendhunt_core::AppConfig;

use crate::error::SignalError;
use crate::retry::retry_with_backoff;

pub use places::PlacesClient;
pub use reddit::{RedditClient, RedditPost};
pub use serpapi::{RisingQuery, SerpApiClient};
pub use yelp::{YelpBusiness, YelpCategory, YelpClient, YelpSearch};

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Transport settings shared by every source client.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub user_agent: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl HttpSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            user_agent: config.http_user_agent.clone(),
            timeout_secs: config.adapter_timeout_secs,
            max_retries: config.adapter_max_retries,
            backoff_base_ms: config.adapter_backoff_base_ms,
        }
    }

    pub(crate) fn build_client(&self) -> Result<Client, SignalError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(self.user_agent.clone())
            .build()?;
        Ok(client)
    }
}

/// Root URLs of every source. [`Default`] points at production.
#[derive(Debug, Clone)]
pub struct BaseUrls {
    pub reddit: String,
    pub yelp: String,
    pub serpapi: String,
    pub places: String,
}

impl Default for BaseUrls {
    fn default() -> Self {
        Self {
            reddit: "https://www.reddit.com".to_string(),
            yelp: "https://api.yelp.com".to_string(),
            serpapi: "https://serpapi.com".to_string(),
            places: "https://places.googleapis.com".to_string(),
        }
    }
}

impl BaseUrls {
    /// Every source rooted at the same URL (a single mock server in tests).
    #[must_use]
    pub fn all(base_url: &str) -> Self {
        Self {
            reddit: base_url.to_string(),
            yelp: base_url.to_string(),
            serpapi: base_url.to_string(),
            places: base_url.to_string(),
        }
    }
}

/// The configured set of source clients.
///
/// Credentialed sources are `None` when their key is absent; the forum
/// client needs no key and is always present.
#[derive(Clone)]
pub struct SourceClients {
    pub reddit: Arc<RedditClient>,
    pub yelp: Option<Arc<YelpClient>>,
    pub serpapi: Option<Arc<SerpApiClient>>,
    pub places: Option<Arc<PlacesClient>>,
}

impl SourceClients {
    /// Build production clients from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::Http`] if an HTTP client cannot be constructed.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, SignalError> {
        Self::with_base_urls(config, &BaseUrls::default())
    }

    /// Build clients rooted at custom URLs (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::Http`] if an HTTP client cannot be constructed,
    /// or [`SignalError::InvalidBaseUrl`] if a URL is empty.
    pub fn with_base_urls(config: &AppConfig, urls: &BaseUrls) -> Result<Self, SignalError> {
        let settings = HttpSettings::from_app_config(config);

        let yelp = config
            .yelp_api_key
            .as_deref()
            .map(|key| YelpClient::with_base_url(key, &settings, &urls.yelp))
            .transpose()?
            .map(Arc::new);
        let serpapi = config
            .serpapi_api_key
            .as_deref()
            .map(|key| SerpApiClient::with_base_url(key, &settings, &urls.serpapi))
            .transpose()?
            .map(Arc::new);
        let places = config
            .google_maps_api_key
            .as_deref()
            .map(|key| PlacesClient::with_base_url(key, &settings, &urls.places))
            .transpose()?
            .map(Arc::new);

        Ok(Self {
            reddit: Arc::new(RedditClient::with_base_url(&settings, &urls.reddit)?),
            yelp,
            serpapi,
            places,
        })
    }
}

pub(crate) fn normalize_base_url(base_url: &str) -> Result<String, SignalError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(SignalError::InvalidBaseUrl(base_url.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Send the request built by `build` and decode a JSON body, retrying
/// transient failures per `settings`.
pub(crate) async fn fetch_json<T, B>(
    settings: &HttpSettings,
    context: &str,
    build: B,
) -> Result<T, SignalError>
where
    T: DeserializeOwned,
    B: Fn() -> RequestBuilder,
{
    retry_with_backoff(settings.max_retries, settings.backoff_base_ms, || {
        let request = build();
        async move {
            let response = request.send().await?.error_for_status()?;
            let body = response.text().await?;
            serde_json::from_str(&body).map_err(|e| SignalError::Deserialize {
                context: context.to_string(),
                source: e,
            })
        }
    })
    .await
}
