use std::sync::Arc;

use async_trait::async_trait;
use trendhunt_core::DiscoveryCandidate;
use trendhunt_signals::clients::{RisingQuery, SerpApiClient};

use super::DiscoverySource;
use crate::error::DiscoveryError;

/// "Rising" related queries of a few seed terms.
pub struct RisingQueries {
    client: Arc<SerpApiClient>,
    seeds: Vec<String>,
}

impl RisingQueries {
    #[must_use]
    pub fn new(client: Arc<SerpApiClient>, seeds: Vec<String>) -> Self {
        Self { client, seeds }
    }

    /// Drops queries that merely restate the seed; the score is the reported
    /// percentage increase.
    pub(crate) fn candidates(seed: &str, rising: &[RisingQuery]) -> Vec<DiscoveryCandidate> {
        let seed_lower = seed.to_lowercase();
        let source = format!("Google Trends Rising (via {seed})");
        rising
            .iter()
            .filter(|q| !q.query.to_lowercase().contains(&seed_lower))
            .map(|q| DiscoveryCandidate::pending(q.query.clone(), source.clone(), q.extracted_value))
            .collect()
    }
}

#[async_trait]
impl DiscoverySource for RisingQueries {
    fn name(&self) -> &'static str {
        "rising_queries"
    }

    /// A failing seed is logged and skipped; the other seeds still count.
    async fn propose(&self) -> Result<Vec<DiscoveryCandidate>, DiscoveryError> {
        let mut candidates = Vec::new();
        for seed in &self.seeds {
            match self.client.rising_queries(seed).await {
                Ok(rising) => candidates.extend(Self::candidates(seed, &rising)),
                Err(e) => {
                    tracing::warn!(seed = %seed, error = %e, "rising-query lookup failed");
                }
            }
        }
        Ok(candidates)
    }
}
