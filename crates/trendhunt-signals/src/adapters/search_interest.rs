//! Search-interest index adapters. DoorDash reads delivery intent as the
//! index for `"<term> delivery"`.

use std::sync::Arc;

use async_trait::async_trait;
use trendhunt_core::{HistoryPoint, Platform, SignalSample, HISTORY_WINDOW};

use super::PlatformAdapter;
use crate::clients::SerpApiClient;
use crate::error::SignalError;

/// Last [`HISTORY_WINDOW`] values, numbered `week = 1..n`.
fn history_tail(values: &[f64]) -> Vec<HistoryPoint> {
    let start = values.len().saturating_sub(HISTORY_WINDOW);
    values[start..]
        .iter()
        .zip(1u32..)
        .map(|(value, week)| HistoryPoint {
            week,
            value: *value,
        })
        .collect()
}

pub struct GoogleSearchAdapter {
    client: Option<Arc<SerpApiClient>>,
}

impl GoogleSearchAdapter {
    #[must_use]
    pub fn new(client: Option<Arc<SerpApiClient>>) -> Self {
        Self { client }
    }

    /// Intensity is the latest value; velocity is the change from the
    /// previous point (a missing previous point counts as 0).
    pub(crate) fn normalize(values: &[f64]) -> SignalSample {
        let Some((latest, earlier)) = values.split_last() else {
            return SignalSample::zero(Platform::GoogleSearch);
        };
        let previous = earlier.last().copied().unwrap_or(0.0);
        SignalSample {
            platform: Platform::GoogleSearch,
            current_intensity: *latest,
            velocity: latest - previous,
            history: history_tail(values),
        }
    }
}

#[async_trait]
impl PlatformAdapter for GoogleSearchAdapter {
    fn platform(&self) -> Platform {
        Platform::GoogleSearch
    }

    fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    async fn fetch_raw(&self, term: &str, _region: &str) -> Result<SignalSample, SignalError> {
        let Some(client) = &self.client else {
            return Ok(SignalSample::zero(Platform::GoogleSearch));
        };
        let values = client.interest_over_time(term).await?;
        Ok(Self::normalize(&values))
    }
}

pub struct DoorDashAdapter {
    client: Option<Arc<SerpApiClient>>,
}

impl DoorDashAdapter {
    #[must_use]
    pub fn new(client: Option<Arc<SerpApiClient>>) -> Self {
        Self { client }
    }

    pub(crate) fn normalize(values: &[f64]) -> SignalSample {
        let Some(latest) = values.last() else {
            return SignalSample::zero(Platform::DoorDash);
        };
        SignalSample {
            platform: Platform::DoorDash,
            current_intensity: *latest,
            velocity: 0.0,
            history: history_tail(values),
        }
    }
}

#[async_trait]
impl PlatformAdapter for DoorDashAdapter {
    fn platform(&self) -> Platform {
        Platform::DoorDash
    }

    fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    async fn fetch_raw(&self, term: &str, _region: &str) -> Result<SignalSample, SignalError> {
        let Some(client) = &self.client else {
            return Ok(SignalSample::zero(Platform::DoorDash));
        };
        let values = client.interest_over_time(&format!("{term} delivery")).await?;
        Ok(Self::normalize(&values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn google_search_uses_latest_and_delta() {
        let sample = GoogleSearchAdapter::normalize(&[40.0, 62.0, 70.0]);
        assert_eq!(sample.current_intensity, 70.0);
        assert_eq!(sample.velocity, 8.0);
        assert_eq!(sample.history.len(), 3);
        assert_eq!(sample.history[0], HistoryPoint { week: 1, value: 40.0 });
    }

    #[test]
    fn single_point_velocity_uses_zero_baseline() {
        let sample = GoogleSearchAdapter::normalize(&[35.0]);
        assert_eq!(sample.velocity, 35.0);
    }

    #[test]
    fn empty_timeline_is_zero_sample() {
        assert!(GoogleSearchAdapter::normalize(&[]).is_zero());
        assert!(DoorDashAdapter::normalize(&[]).is_zero());
    }

    #[test]
    fn history_keeps_last_twelve_points_renumbered() {
        let values: Vec<f64> = (1..=20).map(f64::from).collect();
        let sample = DoorDashAdapter::normalize(&values);
        assert_eq!(sample.history.len(), HISTORY_WINDOW);
        assert_eq!(sample.history[0], HistoryPoint { week: 1, value: 9.0 });
        assert_eq!(sample.history[11], HistoryPoint { week: 12, value: 20.0 });
        assert_eq!(sample.current_intensity, 20.0);
        assert_eq!(sample.velocity, 0.0);
    }
}
