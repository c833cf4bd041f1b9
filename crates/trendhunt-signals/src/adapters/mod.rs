//! Platform Adapters: one per external source, each normalizing its raw
//! response into a [`SignalSample`] on the common 0–100 scale.

mod directory;
mod forum;
mod search_interest;

use std::sync::Arc;

use async_trait::async_trait;
use trendhunt_core::{Platform, SignalSample};

use crate::clients::SourceClients;
use crate::error::SignalError;

pub use directory::{GooglePlacesAdapter, YelpAdapter};
pub use forum::{PinterestAdapter, RedditAdapter, TikTokAdapter};
pub use search_interest::{DoorDashAdapter, GoogleSearchAdapter};

/// One external source, normalized.
///
/// Implementors provide [`PlatformAdapter::fetch_raw`]; callers use
/// [`PlatformAdapter::fetch`], which never fails.
#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    fn platform(&self) -> Platform;

    /// `false` when the source's credential is missing.
    fn is_configured(&self) -> bool {
        true
    }

    /// Fetch and normalize; `region` is the location string for sources that
    /// search by place.
    async fn fetch_raw(&self, term: &str, region: &str) -> Result<SignalSample, SignalError>;

    /// Like [`fetch_raw`](Self::fetch_raw), but any failure becomes the zero
    /// sample. Unconfigured adapters return the zero sample without a call.
    async fn fetch(&self, term: &str, region: &str) -> SignalSample {
        let platform = self.platform();
        if !self.is_configured() {
            return SignalSample::zero(platform);
        }
        match self.fetch_raw(term, region).await {
            Ok(sample) => sample,
            Err(e) => {
                tracing::warn!(
                    platform = %platform,
                    term,
                    error = %e,
                    "adapter fetch failed; using zero sample"
                );
                SignalSample::zero(platform)
            }
        }
    }
}

/// One adapter per [`Platform`], in [`Platform::ALL`] order.
#[must_use]
pub fn build_adapters(clients: &SourceClients) -> Vec<Arc<dyn PlatformAdapter>> {
    Platform::ALL
        .iter()
        .map(|platform| -> Arc<dyn PlatformAdapter> {
            match platform {
                Platform::TikTok => Arc::new(TikTokAdapter::new(Arc::clone(&clients.reddit))),
                Platform::Reddit => Arc::new(RedditAdapter::new(Arc::clone(&clients.reddit))),
                Platform::Pinterest => {
                    Arc::new(PinterestAdapter::new(Arc::clone(&clients.reddit)))
                }
                Platform::GoogleSearch => {
                    Arc::new(GoogleSearchAdapter::new(clients.serpapi.clone()))
                }
                Platform::DoorDash => Arc::new(DoorDashAdapter::new(clients.serpapi.clone())),
                Platform::Yelp => Arc::new(YelpAdapter::new(clients.yelp.clone())),
                Platform::GooglePlaces => {
                    Arc::new(GooglePlacesAdapter::new(clients.places.clone()))
                }
            }
        })
        .collect()
}

/// `min(100, count × per_item)`, rounded.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn count_intensity(count: usize, per_item: f64) -> f64 {
    (count as f64 * per_item).min(100.0).round()
}
