use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Pure parsing and validation, decoupled from the process environment so tests
/// can drive it from a `HashMap`.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    // Blank values are treated as unset so `KEY=` in a .env file disables a source.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default =
        |var: &str, default: &str| -> String { optional(var).unwrap_or_else(|| default.to_string()) };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = optional("DATABASE_URL");

    let bind_addr = or_default("TRENDHUNT_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("TRENDHUNT_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("TRENDHUNT_LOG_LEVEL", "info");
    let terms_path = PathBuf::from(or_default("TRENDHUNT_TERMS_PATH", "./config/terms.yaml"));
    let region = or_default("TRENDHUNT_REGION", "Minneapolis–St Paul");
    let search_location = or_default("TRENDHUNT_SEARCH_LOCATION", "Minneapolis");

    let yelp_api_key = optional("YELP_API_KEY");
    let serpapi_api_key = optional("SERPAPI_API_KEY");
    let google_maps_api_key = optional("GOOGLE_MAPS_API_KEY");
    let gemini_api_key = optional("GEMINI_API_KEY");
    let gemini_model = or_default("TRENDHUNT_GEMINI_MODEL", "gemini-2.5-flash");

    let db_max_connections = parse_u32("TRENDHUNT_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("TRENDHUNT_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("TRENDHUNT_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let http_user_agent = or_default("TRENDHUNT_USER_AGENT", "trendhunt/0.1 (demand-signals)");
    let adapter_timeout_secs = parse_u64("TRENDHUNT_ADAPTER_TIMEOUT_SECS", "15")?;
    if adapter_timeout_secs == 0 {
        return Err(invalid(
            "TRENDHUNT_ADAPTER_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }
    let adapter_max_retries = parse_u32("TRENDHUNT_ADAPTER_MAX_RETRIES", "0")?;
    let adapter_backoff_base_ms = parse_u64("TRENDHUNT_ADAPTER_BACKOFF_BASE_MS", "500")?;
    let max_concurrent_terms = parse_usize("TRENDHUNT_MAX_CONCURRENT_TERMS", "5")?.max(1);

    let discovery_subreddits: Vec<String> =
        or_default("TRENDHUNT_DISCOVERY_SUBREDDITS", "Minneapolis,TwinCities")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned)
            .collect();
    let discovery_seed_count = parse_usize("TRENDHUNT_DISCOVERY_SEED_COUNT", "2")?;
    let discovery_timeout_secs = parse_u64("TRENDHUNT_DISCOVERY_TIMEOUT_SECS", "120")?;
    let discovery_cron = or_default("TRENDHUNT_DISCOVERY_CRON", "0 0 */6 * * *");
    let collection_cron = or_default("TRENDHUNT_COLLECTION_CRON", "0 0 * * * *");
    let rate_limit_per_minute = parse_usize("TRENDHUNT_RATE_LIMIT_PER_MINUTE", "30")?;

    Ok(AppConfig {
        database_url,
        bind_addr,
        log_level,
        terms_path,
        region,
        search_location,
        yelp_api_key,
        serpapi_api_key,
        google_maps_api_key,
        gemini_api_key,
        gemini_model,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        http_user_agent,
        adapter_timeout_secs,
        adapter_max_retries,
        adapter_backoff_base_ms,
        max_concurrent_terms,
        discovery_subreddits,
        discovery_seed_count,
        discovery_timeout_secs,
        discovery_cron,
        collection_cron,
        rate_limit_per_minute,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
