//! Per-platform signal readings and the per-term signal set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Maximum number of history points an adapter keeps from a timeline.
pub const HISTORY_WINDOW: usize = 12;

/// External source category a [`SignalSample`] was read from.
///
/// Variant names are the wire names (`"TikTok"`, `"GoogleSearch"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Platform {
    /// Short-video virality, measured by forum cross-posts of video links.
    TikTok,
    /// Community forum search.
    Reddit,
    /// Search-interest index.
    GoogleSearch,
    /// Business directory listings.
    Yelp,
    /// Delivery intent, measured by search interest in "<term> delivery".
    DoorDash,
    /// Planning / visual discovery, measured by forum cross-posts of pin links.
    Pinterest,
    /// Places text search, a second directory-class supply signal.
    GooglePlaces,
}

impl Platform {
    pub const ALL: [Platform; 7] = [
        Platform::TikTok,
        Platform::Reddit,
        Platform::GoogleSearch,
        Platform::Yelp,
        Platform::DoorDash,
        Platform::Pinterest,
        Platform::GooglePlaces,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::TikTok => "TikTok",
            Platform::Reddit => "Reddit",
            Platform::GoogleSearch => "GoogleSearch",
            Platform::Yelp => "Yelp",
            Platform::DoorDash => "DoorDash",
            Platform::Pinterest => "Pinterest",
            Platform::GooglePlaces => "GooglePlaces",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One point of a platform's recent timeline, on the 0–100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub week: u32,
    pub value: f64,
}

/// One platform's normalized reading for a term in one collection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalSample {
    pub platform: Platform,
    /// Activity on the common 0–100 scale.
    pub current_intensity: f64,
    /// Short-window growth; unbounded and may be negative.
    pub velocity: f64,
    #[serde(default)]
    pub history: Vec<HistoryPoint>,
}

impl SignalSample {
    /// The degraded reading used for disabled, failed, or timed-out sources.
    #[must_use]
    pub fn zero(platform: Platform) -> Self {
        Self {
            platform,
            current_intensity: 0.0,
            velocity: 0.0,
            history: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.current_intensity == 0.0 && self.velocity == 0.0 && self.history.is_empty()
    }
}

/// The samples collected for one term, at most one per platform.
///
/// Iteration order is by [`Platform`], so the set is independent of the order
/// in which adapters completed. Serializes as a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SignalSample>", into = "Vec<SignalSample>")]
pub struct SignalSet {
    samples: BTreeMap<Platform, SignalSample>,
}

impl SignalSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `sample` unless its platform is already present.
    ///
    /// Returns `false` (and drops the sample) on a duplicate platform.
    pub fn insert(&mut self, sample: SignalSample) -> bool {
        if self.samples.contains_key(&sample.platform) {
            return false;
        }
        self.samples.insert(sample.platform, sample);
        true
    }

    /// Inserts a zero-value sample for every listed platform that is missing.
    pub fn fill_missing(&mut self, platforms: &[Platform]) {
        for platform in platforms {
            self.samples
                .entry(*platform)
                .or_insert_with(|| SignalSample::zero(*platform));
        }
    }

    #[must_use]
    pub fn get(&self, platform: Platform) -> Option<&SignalSample> {
        self.samples.get(&platform)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SignalSample> {
        self.samples.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl FromIterator<SignalSample> for SignalSet {
    /// Keeps the first sample seen for each platform.
    fn from_iter<I: IntoIterator<Item = SignalSample>>(iter: I) -> Self {
        let mut set = SignalSet::new();
        for sample in iter {
            set.insert(sample);
        }
        set
    }
}

impl TryFrom<Vec<SignalSample>> for SignalSet {
    type Error = String;

    fn try_from(samples: Vec<SignalSample>) -> Result<Self, Self::Error> {
        let mut set = SignalSet::new();
        for sample in samples {
            let platform = sample.platform;
            if !set.insert(sample) {
                return Err(format!("duplicate signal for platform {platform}"));
            }
        }
        Ok(set)
    }
}

impl From<SignalSet> for Vec<SignalSample> {
    fn from(set: SignalSet) -> Self {
        set.samples.into_values().collect()
    }
}
