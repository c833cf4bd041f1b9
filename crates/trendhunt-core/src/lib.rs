//! Shared domain types and configuration for trendhunt.

pub mod app_config;
pub mod config;
pub mod signals;
pub mod terms;
pub mod trend;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{build_app_config, load_app_config, load_app_config_from_env};
pub use signals::{HistoryPoint, Platform, SignalSample, SignalSet, HISTORY_WINDOW};
pub use terms::{load_terms, normalize_term, TermsFile, TrackedTerm};
pub use trend::{CandidateStatus, DiscoveryCandidate, Scores, TrendRecord};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read terms file {path}: {source}")]
    TermsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse terms file: {0}")]
    TermsFileParse(#[from] serde_yaml::Error),

    #[error("terms validation failed: {0}")]
    Validation(String),
}
