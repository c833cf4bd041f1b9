//! Forum-search adapters. TikTok and Pinterest are measured by cross-posts of
//! their links on the forum, Reddit by plain term matches.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use trendhunt_core::{Platform, SignalSample};

use super::{count_intensity, PlatformAdapter};
use crate::clients::{RedditClient, RedditPost};
use crate::error::SignalError;

const HOURS_24: f64 = 24.0 * 3600.0;
const HOURS_48: f64 = 48.0 * 3600.0;

/// Posts created within `window_secs` of `now`.
fn recent_count(posts: &[RedditPost], now: f64, window_secs: f64) -> usize {
    posts
        .iter()
        .filter(|post| now - post.created_utc < window_secs)
        .count()
}

#[allow(clippy::cast_precision_loss)]
fn forum_sample(
    platform: Platform,
    posts: &[RedditPost],
    per_post: f64,
    velocity_window: Option<(f64, f64)>,
    now: f64,
) -> SignalSample {
    let velocity = velocity_window.map_or(0.0, |(window_secs, per_recent)| {
        (recent_count(posts, now, window_secs) as f64 * per_recent).round()
    });
    SignalSample {
        platform,
        current_intensity: count_intensity(posts.len(), per_post),
        velocity,
        history: Vec::new(),
    }
}

#[allow(clippy::cast_precision_loss)]
fn now_secs() -> f64 {
    Utc::now().timestamp() as f64
}

pub struct TikTokAdapter {
    client: Arc<RedditClient>,
}

impl TikTokAdapter {
    #[must_use]
    pub fn new(client: Arc<RedditClient>) -> Self {
        Self { client }
    }

    pub(crate) fn normalize(posts: &[RedditPost], now: f64) -> SignalSample {
        forum_sample(Platform::TikTok, posts, 5.0, Some((HOURS_48, 10.0)), now)
    }
}

#[async_trait]
impl PlatformAdapter for TikTokAdapter {
    fn platform(&self) -> Platform {
        Platform::TikTok
    }

    async fn fetch_raw(&self, term: &str, _region: &str) -> Result<SignalSample, SignalError> {
        let posts = self
            .client
            .search_new(&format!("\"{term}\" site:tiktok.com"), 50)
            .await?;
        Ok(Self::normalize(&posts, now_secs()))
    }
}

pub struct RedditAdapter {
    client: Arc<RedditClient>,
}

impl RedditAdapter {
    #[must_use]
    pub fn new(client: Arc<RedditClient>) -> Self {
        Self { client }
    }

    pub(crate) fn normalize(posts: &[RedditPost], now: f64) -> SignalSample {
        forum_sample(Platform::Reddit, posts, 4.0, Some((HOURS_24, 5.0)), now)
    }
}

#[async_trait]
impl PlatformAdapter for RedditAdapter {
    fn platform(&self) -> Platform {
        Platform::Reddit
    }

    async fn fetch_raw(&self, term: &str, _region: &str) -> Result<SignalSample, SignalError> {
        let posts = self.client.search_new(term, 25).await?;
        Ok(Self::normalize(&posts, now_secs()))
    }
}

pub struct PinterestAdapter {
    client: Arc<RedditClient>,
}

impl PinterestAdapter {
    #[must_use]
    pub fn new(client: Arc<RedditClient>) -> Self {
        Self { client }
    }

    pub(crate) fn normalize(posts: &[RedditPost]) -> SignalSample {
        forum_sample(Platform::Pinterest, posts, 10.0, None, 0.0)
    }
}

#[async_trait]
impl PlatformAdapter for PinterestAdapter {
    fn platform(&self) -> Platform {
        Platform::Pinterest
    }

    async fn fetch_raw(&self, term: &str, _region: &str) -> Result<SignalSample, SignalError> {
        let posts = self
            .client
            .search_new(&format!("\"{term}\" site:pinterest.com"), 25)
            .await?;
        Ok(Self::normalize(&posts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: f64 = 1_700_000_000.0;

    fn posts_aged(ages_hours: &[f64]) -> Vec<RedditPost> {
        ages_hours
            .iter()
            .map(|hours| RedditPost {
                title: "post".to_string(),
                created_utc: NOW - hours * 3600.0,
                score: 1,
            })
            .collect()
    }

    #[test]
    fn tiktok_counts_posts_in_last_48h() {
        let posts = posts_aged(&[1.0, 30.0, 47.0, 49.0, 200.0]);
        let sample = TikTokAdapter::normalize(&posts, NOW);
        assert_eq!(sample.current_intensity, 25.0);
        assert_eq!(sample.velocity, 30.0);
        assert!(sample.history.is_empty());
    }

    #[test]
    fn reddit_counts_posts_in_last_24h() {
        let posts = posts_aged(&[1.0, 23.0, 25.0]);
        let sample = RedditAdapter::normalize(&posts, NOW);
        assert_eq!(sample.current_intensity, 12.0);
        assert_eq!(sample.velocity, 10.0);
    }

    #[test]
    fn reddit_intensity_saturates_at_25_posts() {
        let posts = posts_aged(&[500.0; 25]);
        let sample = RedditAdapter::normalize(&posts, NOW);
        assert_eq!(sample.current_intensity, 100.0);
        assert_eq!(sample.velocity, 0.0);
    }

    #[test]
    fn pinterest_has_no_velocity() {
        let posts = posts_aged(&[1.0, 2.0, 3.0]);
        let sample = PinterestAdapter::normalize(&posts);
        assert_eq!(sample.current_intensity, 30.0);
        assert_eq!(sample.velocity, 0.0);
    }
}
