use std::sync::Arc;

use async_trait::async_trait;
use trendhunt_core::DiscoveryCandidate;
use trendhunt_signals::clients::{YelpClient, YelpSearch};

use super::DiscoverySource;
use crate::error::DiscoveryError;

const HOT_AND_NEW_LIMIT: u32 = 20;
const CATEGORY_SCORE: f64 = 50.0;
const SOURCE_LABEL: &str = "Yelp Hot & New (Category)";

/// Categories of newly opened, trending local listings.
pub struct HotAndNew {
    client: Arc<YelpClient>,
    location: String,
}

impl HotAndNew {
    #[must_use]
    pub fn new(client: Arc<YelpClient>, location: String) -> Self {
        Self { client, location }
    }

    /// One candidate per category title, across all businesses.
    pub(crate) fn candidates(search: &YelpSearch) -> Vec<DiscoveryCandidate> {
        search
            .businesses
            .iter()
            .flat_map(|business| &business.categories)
            .map(|category| {
                DiscoveryCandidate::pending(category.title.clone(), SOURCE_LABEL, CATEGORY_SCORE)
            })
            .collect()
    }
}

#[async_trait]
impl DiscoverySource for HotAndNew {
    fn name(&self) -> &'static str {
        "yelp_hot_and_new"
    }

    async fn propose(&self) -> Result<Vec<DiscoveryCandidate>, DiscoveryError> {
        let search = self
            .client
            .hot_and_new(&self.location, HOT_AND_NEW_LIMIT)
            .await?;
        Ok(Self::candidates(&search))
    }
}
