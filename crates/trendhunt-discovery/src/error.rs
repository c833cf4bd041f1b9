use thiserror::Error;
use trendhunt_db::DbError;
use trendhunt_signals::SignalError;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("discovery source error: {0}")]
    Source(#[from] SignalError),

    #[error("discovery queue error: {0}")]
    Gateway(#[from] DbError),
}
