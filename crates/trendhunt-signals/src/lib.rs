//! Signal fusion for trendhunt.
//!
//! Platform Adapters read each external source and normalize it to a
//! [`SignalSample`](trendhunt_core::SignalSample); the [`Collector`] fans a
//! term out to every adapter; the [`scorer`] turns the resulting signal set
//! into four 0–100 scores; [`run_collection`] ties it together and appends
//! each result to history through the persistence gateway.

pub mod adapters;
pub mod analysis;
pub mod clients;
pub mod collector;
pub mod error;
pub mod pipeline;
pub mod scorer;

mod retry;

use std::time::Duration;

pub use adapters::{build_adapters, PlatformAdapter};
pub use analysis::{Analysis, GeminiClient, Summarizer};
pub use clients::{BaseUrls, HttpSettings, SourceClients};
pub use collector::Collector;
pub use error::SignalError;
pub use pipeline::{run_collection, run_collection_positioned};
pub use scorer::{predicted_breakout_week, score};

/// A collector over every platform, using the configured timeout and search
/// location.
#[must_use]
pub fn build_collector(config: &trendhunt_core::AppConfig, clients: &SourceClients) -> Collector {
    Collector::new(
        build_adapters(clients),
        Duration::from_secs(config.adapter_timeout_secs),
        config.search_location.clone(),
    )
}
