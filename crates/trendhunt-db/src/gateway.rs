use async_trait::async_trait;
use chrono::{DateTime, Utc};
use trendhunt_core::{Scores, SignalSet, TrackedTerm};

use crate::DbError;

/// Storage boundary shared by the collection and discovery pipelines.
///
/// Every method must be safe to call concurrently from overlapping runs.
/// Terms are matched by their normalized form (see
/// [`trendhunt_core::normalize_term`]).
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// `false` for the no-op gateway.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Insert or refresh a tracked term; idempotent by normalized term.
    ///
    /// Returns the trend id, or `None` when the gateway does not persist.
    async fn upsert_trend(&self, term: &TrackedTerm) -> Result<Option<i64>, DbError>;

    /// Append one scored reading to a trend's history.
    async fn append_history(
        &self,
        trend_id: i64,
        scores: &Scores,
        raw_signals: &SignalSet,
        captured_at: DateTime<Utc>,
    ) -> Result<(), DbError>;

    /// Whether a `pending` candidate exists for the term.
    async fn candidate_exists(&self, term: &str) -> Result<bool, DbError>;

    /// Whether the term is already tracked.
    async fn trend_exists(&self, term: &str) -> Result<bool, DbError>;

    /// Queue a `pending` candidate unless the term is tracked or already pending.
    ///
    /// The check and the insert are one atomic operation. Returns `true` only
    /// when a row was written.
    async fn insert_candidate_if_absent(
        &self,
        term: &str,
        source: &str,
        initial_score: f64,
    ) -> Result<bool, DbError>;

    async fn health_check(&self) -> Result<(), DbError>;
}
