use std::net::SocketAddr;
use std::path::PathBuf;

/// Validated process configuration.
///
/// Every `Option` credential is a capability toggle: when it is `None` the
/// component that needs it degrades (zero-value signal, no persistence,
/// fallback analysis) instead of failing.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub terms_path: PathBuf,
    /// Display region stamped on every tracked term that does not set its own.
    pub region: String,
    /// Location string sent to directory and places searches.
    pub search_location: String,
    pub yelp_api_key: Option<String>,
    pub serpapi_api_key: Option<String>,
    pub google_maps_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub http_user_agent: String,
    pub adapter_timeout_secs: u64,
    pub adapter_max_retries: u32,
    pub adapter_backoff_base_ms: u64,
    pub max_concurrent_terms: usize,
    pub discovery_subreddits: Vec<String>,
    pub discovery_seed_count: usize,
    pub discovery_timeout_secs: u64,
    pub discovery_cron: String,
    pub collection_cron: String,
    pub rate_limit_per_minute: usize,
}

impl AppConfig {
    /// Whether a persistence backend is configured.
    #[must_use]
    pub fn persistence_enabled(&self) -> bool {
        self.database_url.is_some()
    }
}

fn redact(value: Option<&String>) -> Option<&'static str> {
    value.map(|_| "[redacted]")
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &redact(self.database_url.as_ref()))
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("terms_path", &self.terms_path)
            .field("region", &self.region)
            .field("search_location", &self.search_location)
            .field("yelp_api_key", &redact(self.yelp_api_key.as_ref()))
            .field("serpapi_api_key", &redact(self.serpapi_api_key.as_ref()))
            .field(
                "google_maps_api_key",
                &redact(self.google_maps_api_key.as_ref()),
            )
            .field("gemini_api_key", &redact(self.gemini_api_key.as_ref()))
            .field("gemini_model", &self.gemini_model)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("http_user_agent", &self.http_user_agent)
            .field("adapter_timeout_secs", &self.adapter_timeout_secs)
            .field("adapter_max_retries", &self.adapter_max_retries)
            .field("adapter_backoff_base_ms", &self.adapter_backoff_base_ms)
            .field("max_concurrent_terms", &self.max_concurrent_terms)
            .field("discovery_subreddits", &self.discovery_subreddits)
            .field("discovery_seed_count", &self.discovery_seed_count)
            .field("discovery_timeout_secs", &self.discovery_timeout_secs)
            .field("discovery_cron", &self.discovery_cron)
            .field("collection_cron", &self.collection_cron)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish()
    }
}
