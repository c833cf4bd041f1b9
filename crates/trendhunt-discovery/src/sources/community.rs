use std::sync::Arc;

use async_trait::async_trait;
use trendhunt_core::DiscoveryCandidate;
use trendhunt_signals::clients::{RedditClient, RedditPost};

use super::DiscoverySource;
use crate::error::DiscoveryError;

const HOT_LIMIT: u32 = 10;
const MAX_TITLE_CHARS: usize = 100;
const TRUNCATED_CHARS: usize = 97;

const FOOD_KEYWORDS: &[&str] = &[
    "food",
    "eat",
    "restaurant",
    "drink",
    "coffee",
    "pizza",
    "taco",
    "burger",
    "sushi",
    "bakery",
    "tried",
    "best",
    "opening",
    "new",
];

/// Food-related post titles from regional communities.
pub struct CommunityTitles {
    client: Arc<RedditClient>,
    subreddits: Vec<String>,
}

impl CommunityTitles {
    #[must_use]
    pub fn new(client: Arc<RedditClient>, subreddits: Vec<String>) -> Self {
        Self { client, subreddits }
    }

    pub(crate) fn is_food_related(title: &str) -> bool {
        let lower = title.to_lowercase();
        FOOD_KEYWORDS.iter().any(|k| lower.contains(k))
    }

    pub(crate) fn truncate_title(title: &str) -> String {
        if title.chars().count() > MAX_TITLE_CHARS {
            let head: String = title.chars().take(TRUNCATED_CHARS).collect();
            format!("{head}...")
        } else {
            title.to_string()
        }
    }

    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn candidates(subreddit: &str, posts: &[RedditPost]) -> Vec<DiscoveryCandidate> {
        let source = format!("Reddit r/{subreddit}");
        posts
            .iter()
            .filter(|post| Self::is_food_related(&post.title))
            .map(|post| {
                DiscoveryCandidate::pending(
                    Self::truncate_title(&post.title),
                    source.clone(),
                    post.score as f64,
                )
            })
            .collect()
    }
}

#[async_trait]
impl DiscoverySource for CommunityTitles {
    fn name(&self) -> &'static str {
        "community_titles"
    }

    /// A failing community is logged and skipped.
    async fn propose(&self) -> Result<Vec<DiscoveryCandidate>, DiscoveryError> {
        let mut candidates = Vec::new();
        for subreddit in &self.subreddits {
            match self.client.subreddit_hot(subreddit, HOT_LIMIT).await {
                Ok(posts) => candidates.extend(Self::candidates(subreddit, &posts)),
                Err(e) => {
                    tracing::warn!(subreddit = %subreddit, error = %e, "community listing failed");
                }
            }
        }
        Ok(candidates)
    }
}
