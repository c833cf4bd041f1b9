//! Scoring Engine: maps a signal set to the four 0–100 scores.
//!
//! Pure and deterministic. The weight and role tables are exhaustive matches
//! over [`Platform`], so a new platform does not compile until it is given a
//! weight and a role.

use trendhunt_core::{Platform, Scores, SignalSet};

const SUPPLY_BASELINE: f64 = 10.0;
const SUPPLY_DISCOUNT: f64 = 0.8;
const BREAKOUT_BASE: f64 = 20.0;
const BREAKOUT_VELOCITY_FACTOR: f64 = 4.0;

/// Aggregation weight for demand and breakout means.
#[must_use]
pub fn weight(platform: Platform) -> f64 {
    match platform {
        Platform::TikTok => 2.0,
        Platform::Reddit => 1.5,
        Platform::Pinterest => 1.2,
        Platform::GoogleSearch => 1.0,
        Platform::Yelp | Platform::DoorDash | Platform::GooglePlaces => 0.5,
    }
}

#[must_use]
pub fn is_demand(platform: Platform) -> bool {
    match platform {
        Platform::TikTok | Platform::Reddit | Platform::Pinterest | Platform::GoogleSearch => true,
        Platform::Yelp | Platform::DoorDash | Platform::GooglePlaces => false,
    }
}

/// Search interest doubles as a proxy for existing listings.
#[must_use]
pub fn is_supply(platform: Platform) -> bool {
    match platform {
        Platform::GoogleSearch | Platform::Yelp | Platform::DoorDash | Platform::GooglePlaces => {
            true
        }
        Platform::TikTok | Platform::Reddit | Platform::Pinterest => false,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_score(value: f64) -> u8 {
    value.clamp(0.0, 100.0).round() as u8
}

fn weighted_mean(values: impl Iterator<Item = (Platform, f64)>) -> Option<f64> {
    let (sum, total_weight) = values.fold((0.0, 0.0), |(sum, total), (platform, value)| {
        let w = weight(platform);
        (sum + value * w, total + w)
    });
    (total_weight > 0.0).then(|| sum / total_weight)
}

#[must_use]
pub fn demand_score(signals: &SignalSet) -> u8 {
    let mean = weighted_mean(
        signals
            .iter()
            .filter(|s| is_demand(s.platform))
            .map(|s| (s.platform, s.current_intensity)),
    );
    to_score(mean.unwrap_or(0.0))
}

/// Zero-value samples (disabled or failed sources) count as absent here, so a
/// run where every supply source failed falls back to the baseline.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn supply_score(signals: &SignalSet) -> u8 {
    let intensities: Vec<f64> = signals
        .iter()
        .filter(|s| is_supply(s.platform) && !s.is_zero())
        .map(|s| s.current_intensity)
        .collect();
    if intensities.is_empty() {
        return to_score(SUPPLY_BASELINE);
    }
    to_score(intensities.iter().sum::<f64>() / intensities.len() as f64)
}

#[must_use]
pub fn unmet_demand_score(demand: u8, supply: u8) -> u8 {
    to_score(f64::from(demand) - SUPPLY_DISCOUNT * f64::from(supply))
}

#[must_use]
pub fn breakout_probability(signals: &SignalSet) -> u8 {
    let velocity = weighted_mean(signals.iter().map(|s| (s.platform, s.velocity))).unwrap_or(0.0);
    to_score(BREAKOUT_BASE + BREAKOUT_VELOCITY_FACTOR * velocity)
}

/// All four scores for one signal set.
///
/// An empty set and a set of all-zero samples both score `(0, 10, 0, 20)`.
#[must_use]
pub fn score(signals: &SignalSet) -> Scores {
    let demand = demand_score(signals);
    let supply = supply_score(signals);
    Scores {
        demand_score: demand,
        supply_score: supply,
        unmet_demand_score: unmet_demand_score(demand, supply),
        breakout_probability: breakout_probability(signals),
    }
}

/// Weeks until breakout: 0 when already breaking out, 10 at zero probability.
#[must_use]
pub fn predicted_breakout_week(breakout_probability: u8) -> u8 {
    to_score((100.0 - f64::from(breakout_probability.min(100))) / 10.0)
}

#[cfg(test)]
#[path = "scorer_test.rs"]
mod tests;
