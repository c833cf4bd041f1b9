use thiserror::Error;

/// Errors from the external signal sources and the collection pipeline.
#[derive(Debug, Error)]
pub enum SignalError {
    /// Network or TLS failure, or a non-2xx status, from the HTTP client.
    /// The request URL is stripped, since some sources carry keys in the query.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// The source answered 2xx but reported an application-level error.
    #[error("{source_name} API error: {message}")]
    Api {
        source_name: &'static str,
        message: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    /// A spawned per-term collection task panicked or was cancelled.
    #[error("collection task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<reqwest::Error> for SignalError {
    fn from(err: reqwest::Error) -> Self {
        SignalError::Http(err.without_url())
    }
}
