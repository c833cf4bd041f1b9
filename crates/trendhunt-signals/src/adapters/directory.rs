//! Business-directory adapters; both indicate existing supply.

use std::sync::Arc;

use async_trait::async_trait;
use trendhunt_core::{Platform, SignalSample};

use super::{count_intensity, PlatformAdapter};
use crate::clients::{PlacesClient, YelpClient};
use crate::error::SignalError;

const YELP_SEARCH_LIMIT: u32 = 50;
/// Listing total treated as full saturation.
const YELP_SATURATION_TOTAL: f64 = 50.0;

pub struct YelpAdapter {
    client: Option<Arc<YelpClient>>,
}

impl YelpAdapter {
    #[must_use]
    pub fn new(client: Option<Arc<YelpClient>>) -> Self {
        Self { client }
    }

    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn normalize(total: u64) -> SignalSample {
        let intensity = (total as f64 / YELP_SATURATION_TOTAL * 100.0)
            .min(100.0)
            .round();
        SignalSample {
            platform: Platform::Yelp,
            current_intensity: intensity,
            velocity: 0.0,
            history: Vec::new(),
        }
    }
}

#[async_trait]
impl PlatformAdapter for YelpAdapter {
    fn platform(&self) -> Platform {
        Platform::Yelp
    }

    fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    async fn fetch_raw(&self, term: &str, region: &str) -> Result<SignalSample, SignalError> {
        let Some(client) = &self.client else {
            return Ok(SignalSample::zero(Platform::Yelp));
        };
        let search = client.search(term, region, YELP_SEARCH_LIMIT).await?;
        Ok(Self::normalize(search.total))
    }
}

pub struct GooglePlacesAdapter {
    client: Option<Arc<PlacesClient>>,
}

impl GooglePlacesAdapter {
    #[must_use]
    pub fn new(client: Option<Arc<PlacesClient>>) -> Self {
        Self { client }
    }

    pub(crate) fn normalize(places: usize) -> SignalSample {
        SignalSample {
            platform: Platform::GooglePlaces,
            current_intensity: count_intensity(places, 5.0),
            velocity: 0.0,
            history: Vec::new(),
        }
    }
}

#[async_trait]
impl PlatformAdapter for GooglePlacesAdapter {
    fn platform(&self) -> Platform {
        Platform::GooglePlaces
    }

    fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    async fn fetch_raw(&self, term: &str, region: &str) -> Result<SignalSample, SignalError> {
        let Some(client) = &self.client else {
            return Ok(SignalSample::zero(Platform::GooglePlaces));
        };
        let count = client
            .count_text_matches(&format!("{term} in {region}"))
            .await?;
        Ok(Self::normalize(count))
    }
}
