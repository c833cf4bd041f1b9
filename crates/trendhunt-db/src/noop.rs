use async_trait::async_trait;
use chrono::{DateTime, Utc};
use trendhunt_core::{Scores, SignalSet, TrackedTerm};

use crate::{DbError, PersistenceGateway};

/// Gateway used when no database is configured. Writes nothing, finds nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopGateway;

#[async_trait]
impl PersistenceGateway for NoopGateway {
    fn is_enabled(&self) -> bool {
        false
    }

    async fn upsert_trend(&self, _term: &TrackedTerm) -> Result<Option<i64>, DbError> {
        Ok(None)
    }

    async fn append_history(
        &self,
        _trend_id: i64,
        _scores: &Scores,
        _raw_signals: &SignalSet,
        _captured_at: DateTime<Utc>,
    ) -> Result<(), DbError> {
        Ok(())
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

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_gateway_has_no_side_effects() {
        let gateway = NoopGateway;
        let term = TrackedTerm {
            term: "Ube Lattes".to_string(),
            category: "Cafe".to_string(),
            region: "Minneapolis–St Paul".to_string(),
            neighborhood: "Powderhorn".to_string(),
        };
        assert!(!gateway.is_enabled());
        assert_eq!(gateway.upsert_trend(&term).await.unwrap(), None);
        assert!(!gateway
            .insert_candidate_if_absent("Ube Lattes", "test", 1.0)
            .await
            .unwrap());
        assert!(!gateway.trend_exists("Ube Lattes").await.unwrap());
        assert!(!gateway.candidate_exists("Ube Lattes").await.unwrap());
    }
}
