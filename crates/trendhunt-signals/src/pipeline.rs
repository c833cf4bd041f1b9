//! Collection pipeline: collect, score, persist, for every tracked term.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use trendhunt_core::{Scores, SignalSet, TrackedTerm, TrendRecord};
use trendhunt_db::PersistenceGateway;

use crate::collector::Collector;
use crate::error::SignalError;
use crate::scorer::{predicted_breakout_week, score};

/// Score every term and append the result to its history.
///
/// Terms run concurrently, at most `max_concurrent_terms` at a time. Records
/// come back in the order of `terms`. A record's `id` is the gateway's trend
/// id when persistence succeeded, otherwise the term's 1-based position.
///
/// Persistence is best-effort: a failed write is logged and the record is
/// still returned.
///
/// # Errors
///
/// Returns [`SignalError::Join`] if a per-term task panics.
pub async fn run_collection(
    collector: Arc<Collector>,
    gateway: Arc<dyn PersistenceGateway>,
    terms: &[TrackedTerm],
    max_concurrent_terms: usize,
) -> Result<Vec<TrendRecord>, SignalError> {
    let positioned: Vec<(usize, TrackedTerm)> = terms
        .iter()
        .cloned()
        .enumerate()
        .map(|(index, term)| (index + 1, term))
        .collect();
    run_collection_positioned(collector, gateway, &positioned, max_concurrent_terms).await
}

/// Like [`run_collection`], for a subset of the tracked terms. Each term
/// carries its 1-based position in the full list, which becomes the record's
/// `id` when nothing was persisted.
///
/// # Errors
///
/// Returns [`SignalError::Join`] if a per-term task panics.
pub async fn run_collection_positioned(
    collector: Arc<Collector>,
    gateway: Arc<dyn PersistenceGateway>,
    terms: &[(usize, TrackedTerm)],
    max_concurrent_terms: usize,
) -> Result<Vec<TrendRecord>, SignalError> {
    let tasks = terms.iter().cloned().enumerate().map(|(index, (position, term))| {
        let collector = Arc::clone(&collector);
        let gateway = Arc::clone(&gateway);
        tokio::spawn(async move {
            let record = collect_one(&collector, gateway.as_ref(), &term, position).await;
            (index, record)
        })
    });

    let joined: Vec<_> = stream::iter(tasks)
        .buffer_unordered(max_concurrent_terms.max(1))
        .collect()
        .await;

    let mut indexed = Vec::with_capacity(joined.len());
    for result in joined {
        indexed.push(result?);
    }
    indexed.sort_by_key(|(index, _)| *index);

    let records: Vec<TrendRecord> = indexed.into_iter().map(|(_, record)| record).collect();
    tracing::info!(terms = records.len(), "collection run complete");
    Ok(records)
}

async fn collect_one(
    collector: &Collector,
    gateway: &dyn PersistenceGateway,
    term: &TrackedTerm,
    position: usize,
) -> TrendRecord {
    let signals = collector.collect_term(&term.term).await;
    let scores = score(&signals);
    let timestamp = Utc::now();

    let trend_id = persist(gateway, term, &scores, &signals, timestamp).await;
    let id = trend_id.map_or_else(|| position.to_string(), |id| id.to_string());

    tracing::debug!(
        term = %term.term,
        demand = scores.demand_score,
        supply = scores.supply_score,
        unmet = scores.unmet_demand_score,
        breakout = scores.breakout_probability,
        "scored term"
    );

    TrendRecord::new(
        id,
        term,
        signals,
        scores,
        predicted_breakout_week(scores.breakout_probability),
        timestamp,
    )
}

/// Upsert the trend and append one history row. Returns the trend id only if
/// both writes succeeded.
async fn persist(
    gateway: &dyn PersistenceGateway,
    term: &TrackedTerm,
    scores: &Scores,
    signals: &SignalSet,
    captured_at: DateTime<Utc>,
) -> Option<i64> {
    if !gateway.is_enabled() {
        return None;
    }

    let trend_id = match gateway.upsert_trend(term).await {
        Ok(Some(id)) => id,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(term = %term.term, error = %e, "trend upsert failed");
            return None;
        }
    };

    match gateway
        .append_history(trend_id, scores, signals, captured_at)
        .await
    {
        Ok(()) => Some(trend_id),
        Err(e) => {
            tracing::warn!(
                term = %term.term,
                trend_id,
                error = %e,
                "history append failed"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use trendhunt_core::{Platform, SignalSample};
    use trendhunt_db::{DbError, MemoryGateway, NoopGateway};

    use super::*;
    use crate::adapters::PlatformAdapter;

    struct Fixed(Platform, f64, f64);

    #[async_trait]
    impl PlatformAdapter for Fixed {
        fn platform(&self) -> Platform {
            self.0
        }

        async fn fetch_raw(&self, _term: &str, _region: &str) -> Result<SignalSample, SignalError> {
            Ok(SignalSample {
                platform: self.0,
                current_intensity: self.1,
                velocity: self.2,
                history: Vec::new(),
            })
        }
    }

    struct Panicking(Platform);

    #[async_trait]
    impl PlatformAdapter for Panicking {
        fn platform(&self) -> Platform {
            self.0
        }

        async fn fetch_raw(&self, _term: &str, _region: &str) -> Result<SignalSample, SignalError> {
            panic!("adapter bug");
        }
    }

    fn terms() -> Vec<TrackedTerm> {
        ["Birria Tacos", "Mochi Donuts", "Ube Lattes"]
            .iter()
            .map(|term| TrackedTerm {
                term: (*term).to_string(),
                category: "Food".to_string(),
                region: "Minneapolis–St Paul".to_string(),
                neighborhood: "Northeast".to_string(),
            })
            .collect()
    }

    fn demand_skewed_collector() -> Arc<Collector> {
        Arc::new(Collector::new(
            vec![
                Arc::new(Fixed(Platform::TikTok, 95.0, 12.0)),
                Arc::new(Fixed(Platform::GoogleSearch, 70.0, 8.0)),
                Arc::new(Fixed(Platform::Reddit, 65.0, 5.0)),
                Arc::new(Fixed(Platform::Yelp, 10.0, 1.0)),
            ],
            Duration::from_secs(1),
            "Minneapolis",
        ))
    }

    #[tokio::test]
    async fn records_keep_term_order_and_positional_ids_without_persistence() {
        let records = run_collection(
            demand_skewed_collector(),
            Arc::new(NoopGateway),
            &terms(),
            2,
        )
        .await
        .unwrap();

        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(records[1].term, "Mochi Donuts");
        assert_eq!(records[0].scores.demand_score, 79);
        assert_eq!(records[0].scores.breakout_probability, 52);
        assert_eq!(records[0].predicted_breakout_week, 5);
        assert_eq!(records[0].signals.len(), 4);
    }

    #[tokio::test]
    async fn positioned_terms_keep_their_file_position_as_id() {
        let all = terms();
        let subset = vec![(3, all[2].clone())];

        let records =
            run_collection_positioned(demand_skewed_collector(), Arc::new(NoopGateway), &subset, 1)
                .await
                .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "3");
        assert_eq!(records[0].term, "Ube Lattes");
    }

    #[tokio::test]
    async fn adapter_panic_degrades_only_that_platform() {
        let collector = Arc::new(Collector::new(
            vec![
                Arc::new(Fixed(Platform::TikTok, 90.0, 5.0)),
                Arc::new(Panicking(Platform::Pinterest)),
            ],
            Duration::from_secs(1),
            "Minneapolis",
        ));

        let records = run_collection(collector, Arc::new(NoopGateway), &terms()[..2], 2)
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        for record in &records {
            assert_eq!(
                record.signals.get(Platform::TikTok).unwrap().current_intensity,
                90.0
            );
            assert!(record.signals.get(Platform::Pinterest).unwrap().is_zero());
        }
    }

    #[tokio::test]
    async fn persisted_records_use_gateway_ids_and_append_history() {
        let gateway = Arc::new(MemoryGateway::new());
        let records = run_collection(
            demand_skewed_collector(),
            Arc::clone(&gateway) as Arc<dyn PersistenceGateway>,
            &terms(),
            5,
        )
        .await
        .unwrap();

        let history = gateway.history().await;
        assert_eq!(history.len(), 3);
        for record in &records {
            let id: i64 = record.id.parse().unwrap();
            let entry = history.iter().find(|h| h.trend_id == id).unwrap();
            assert_eq!(entry.scores, record.scores);
            assert_eq!(entry.raw_signals, record.signals);
        }
    }

    struct FailingWrites;

    #[async_trait]
    impl PersistenceGateway for FailingWrites {
        async fn upsert_trend(&self, _term: &TrackedTerm) -> Result<Option<i64>, DbError> {
            Ok(Some(41))
        }

        async fn append_history(
            &self,
            _trend_id: i64,
            _scores: &Scores,
            _raw_signals: &SignalSet,
            _captured_at: DateTime<Utc>,
        ) -> Result<(), DbError> {
            Err(DbError::ScoreOutOfRange {
                field: "demand_score",
                value: 255,
            })
        }

        async fn candidate_exists(&self, _term: &str) -> Result<bool, DbError> {
            Ok(false)
        }

        async fn trend_exists(&self, _term: &str) -> Result<bool, DbError> {
            Ok(false)
        }

        async fn insert_candidate_if_absent(
            &self,
            _term: &str,
            _source: &str,
            _initial_score: f64,
        ) -> Result<bool, DbError> {
            Ok(false)
        }

        async fn health_check(&self) -> Result<(), DbError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn write_failures_do_not_drop_records() {
        let records = run_collection(
            demand_skewed_collector(),
            Arc::new(FailingWrites),
            &terms(),
            3,
        )
        .await
        .unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[2].id, "3");
        assert_eq!(records[2].scores.supply_score, 40);
    }
}
