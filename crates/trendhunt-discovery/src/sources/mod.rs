//! Candidate sources. Each yields `(term, source label, initial score)`
//! proposals as pending [`DiscoveryCandidate`]s.

mod community;
mod hot_and_new;
mod rising;

use std::sync::Arc;

use async_trait::async_trait;
use trendhunt_core::{AppConfig, DiscoveryCandidate, TrackedTerm};
use trendhunt_signals::SourceClients;

use crate::error::DiscoveryError;

pub use community::CommunityTitles;
pub use hot_and_new::HotAndNew;
pub use rising::RisingQueries;

#[async_trait]
pub trait DiscoverySource: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    async fn propose(&self) -> Result<Vec<DiscoveryCandidate>, DiscoveryError>;
}

/// Every source whose credentials are configured.
///
/// Rising-query discovery seeds from the first
/// `discovery_seed_count` entries of `tracked`.
#[must_use]
pub fn build_sources(
    config: &AppConfig,
    clients: &SourceClients,
    tracked: &[TrackedTerm],
) -> Vec<Arc<dyn DiscoverySource>> {
    let mut sources: Vec<Arc<dyn DiscoverySource>> = Vec::new();

    match &clients.yelp {
        Some(yelp) => sources.push(Arc::new(HotAndNew::new(
            Arc::clone(yelp),
            config.search_location.clone(),
        ))),
        None => tracing::debug!("YELP_API_KEY not set; hot-and-new discovery disabled"),
    }

    match &clients.serpapi {
        Some(serpapi) => {
            let seeds = tracked
                .iter()
                .take(config.discovery_seed_count)
                .map(|t| t.term.clone())
                .collect();
            sources.push(Arc::new(RisingQueries::new(Arc::clone(serpapi), seeds)));
        }
        None => tracing::debug!("SERPAPI_API_KEY not set; rising-query discovery disabled"),
    }

    if !config.discovery_subreddits.is_empty() {
        sources.push(Arc::new(CommunityTitles::new(
            Arc::clone(&clients.reddit),
            config.discovery_subreddits.clone(),
        )));
    }

    sources
}
