//! Public forum JSON client (no OAuth; only a User-Agent).

use reqwest::Client;
use serde::Deserialize;

use super::{fetch_json, normalize_base_url, HttpSettings};
use crate::error::SignalError;

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: RedditPost,
}

/// The subset of a listing post the adapters and discovery read.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RedditPost {
    #[serde(default)]
    pub title: String,
    /// Unix seconds.
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub score: i64,
}

pub struct RedditClient {
    client: Client,
    settings: HttpSettings,
    base_url: String,
}

impl RedditClient {
    /// # Errors
    ///
    /// Returns [`SignalError`] if the HTTP client cannot be built or the URL is blank.
    pub fn with_base_url(settings: &HttpSettings, base_url: &str) -> Result<Self, SignalError> {
        Ok(Self {
            client: settings.build_client()?,
            settings: settings.clone(),
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// Site-wide search sorted by newest first.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError`] on transport failure, non-2xx status, or a
    /// malformed listing.
    pub async fn search_new(&self, query: &str, limit: u32) -> Result<Vec<RedditPost>, SignalError> {
        let url = format!("{}/search.json", self.base_url);
        let limit = limit.to_string();
        let listing: Listing = fetch_json(&self.settings, "reddit search", || {
            self.client
                .get(&url)
                .query(&[("q", query), ("sort", "new"), ("limit", limit.as_str())])
        })
        .await?;
        Ok(into_posts(listing))
    }

    /// The `hot` listing of one community.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError`] on transport failure, non-2xx status, or a
    /// malformed listing.
    pub async fn subreddit_hot(
        &self,
        subreddit: &str,
        limit: u32,
    ) -> Result<Vec<RedditPost>, SignalError> {
        let url = format!("{}/r/{subreddit}/hot.json", self.base_url);
        let limit = limit.to_string();
        let context = format!("r/{subreddit} hot listing");
        let listing: Listing = fetch_json(&self.settings, &context, || {
            self.client.get(&url).query(&[("limit", limit.as_str())])
        })
        .await?;
        Ok(into_posts(listing))
    }
}

fn into_posts(listing: Listing) -> Vec<RedditPost> {
    listing
        .data
        .children
        .into_iter()
        .map(|child| child.data)
        .collect()
}
