//! Scored trend records and discovery-queue candidates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::signals::SignalSet;
use crate::terms::TrackedTerm;

/// The four standardized scores, each in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scores {
    pub demand_score: u8,
    pub supply_score: u8,
    pub unmet_demand_score: u8,
    pub breakout_probability: u8,
}

/// One term's scored reading for a collection cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendRecord {
    pub id: String,
    pub term: String,
    pub category: String,
    pub region: String,
    pub neighborhood: String,
    pub signals: SignalSet,
    #[serde(flatten)]
    pub scores: Scores,
    pub predicted_breakout_week: u8,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl TrendRecord {
    #[must_use]
    pub fn new(
        id: String,
        term: &TrackedTerm,
        signals: SignalSet,
        scores: Scores,
        predicted_breakout_week: u8,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            term: term.term.clone(),
            category: term.category.clone(),
            region: term.region.clone(),
            neighborhood: term.neighborhood.clone(),
            signals,
            scores,
            predicted_breakout_week,
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateStatus {
    Pending,
    Approved,
    Rejected,
}

impl CandidateStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CandidateStatus::Pending => "pending",
            CandidateStatus::Approved => "approved",
            CandidateStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A not-yet-tracked term proposed by a discovery source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryCandidate {
    pub term: String,
    pub source: String,
    pub initial_score: f64,
    pub status: CandidateStatus,
}

impl DiscoveryCandidate {
    #[must_use]
    pub fn pending(term: impl Into<String>, source: impl Into<String>, initial_score: f64) -> Self {
        Self {
            term: term.into(),
            source: source.into(),
            initial_score,
            status: CandidateStatus::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::{Platform, SignalSample};

    fn record() -> TrendRecord {
        let term = TrackedTerm {
            term: "Mochi Donuts".to_string(),
            category: "Bakery".to_string(),
            region: "Minneapolis–St Paul".to_string(),
            neighborhood: "North Loop".to_string(),
        };
        let signals: SignalSet = [SignalSample::zero(Platform::TikTok)].into_iter().collect();
        TrendRecord::new(
            "1".to_string(),
            &term,
            signals,
            Scores {
                demand_score: 88,
                supply_score: 15,
                unmet_demand_score: 73,
                breakout_probability: 92,
            },
            1,
            Utc::now(),
        )
    }

    #[test]
    fn trend_record_serializes_flat_camel_case() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["term"], "Mochi Donuts");
        assert_eq!(json["demandScore"], 88);
        assert_eq!(json["unmetDemandScore"], 73);
        assert_eq!(json["breakoutProbability"], 92);
        assert_eq!(json["predictedBreakoutWeek"], 1);
        assert_eq!(json["signals"][0]["platform"], "TikTok");
        assert!(json.get("scores").is_none());
    }

    #[test]
    fn trend_record_deserializes_without_timestamp() {
        let mut json = serde_json::to_value(record()).unwrap();
        json.as_object_mut().unwrap().remove("timestamp");
        let parsed: TrendRecord = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.scores.supply_score, 15);
    }

    #[test]
    fn candidate_status_wire_names() {
        assert_eq!(CandidateStatus::Pending.to_string(), "pending");
        assert_eq!(
            serde_json::to_value(CandidateStatus::Rejected).unwrap(),
            "rejected"
        );
    }

    #[test]
    fn pending_constructor_sets_status() {
        let candidate = DiscoveryCandidate::pending("Hand Roll Bar", "Yelp Hot & New (Category)", 50.0);
        assert_eq!(candidate.status, CandidateStatus::Pending);
        assert_eq!(candidate.initial_score, 50.0);
    }
}
