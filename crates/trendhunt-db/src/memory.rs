//! In-process [`PersistenceGateway`] for tests and database-less runs.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use trendhunt_core::{normalize_term, CandidateStatus, Scores, SignalSet, TrackedTerm};

use crate::{DbError, PersistenceGateway};

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub trend_id: i64,
    pub scores: Scores,
    pub raw_signals: SignalSet,
    pub captured_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct QueuedCandidate {
    pub term: String,
    pub term_key: String,
    pub source: String,
    pub initial_score: f64,
    pub status: CandidateStatus,
}

#[derive(Debug, Default)]
struct State {
    next_trend_id: i64,
    trends: HashMap<String, (i64, TrackedTerm)>,
    history: Vec<HistoryEntry>,
    queue: Vec<QueuedCandidate>,
}

/// Mutex-guarded store with the same conflict semantics as the Postgres schema.
///
/// Every operation holds the lock for its whole check-and-write, which gives
/// the same atomicity the unique index provides in Postgres.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    state: Mutex<State>,
}

impl MemoryGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn history(&self) -> Vec<HistoryEntry> {
        self.state.lock().await.history.clone()
    }

    pub async fn queue(&self) -> Vec<QueuedCandidate> {
        self.state.lock().await.queue.clone()
    }

    /// Move every pending candidate for `term` to `status`.
    pub async fn set_candidate_status(&self, term: &str, status: CandidateStatus) {
        let key = normalize_term(term);
        let mut state = self.state.lock().await;
        for candidate in state
            .queue
            .iter_mut()
            .filter(|c| c.term_key == key && c.status == CandidateStatus::Pending)
        {
            candidate.status = status;
        }
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn upsert_trend(&self, term: &TrackedTerm) -> Result<Option<i64>, DbError> {
        let key = term.key();
        let mut state = self.state.lock().await;
        for candidate in state
            .queue
            .iter_mut()
            .filter(|c| c.term_key == key && c.status == CandidateStatus::Pending)
        {
            candidate.status = CandidateStatus::Approved;
        }
        if let Some((id, existing)) = state.trends.get_mut(&key) {
            *existing = term.clone();
            return Ok(Some(*id));
        }
        state.next_trend_id += 1;
        let id = state.next_trend_id;
        state.trends.insert(key, (id, term.clone()));
        Ok(Some(id))
    }

    async fn append_history(
        &self,
        trend_id: i64,
        scores: &Scores,
        raw_signals: &SignalSet,
        captured_at: DateTime<Utc>,
    ) -> Result<(), DbError> {
        self.state.lock().await.history.push(HistoryEntry {
            trend_id,
            scores: *scores,
            raw_signals: raw_signals.clone(),
            captured_at,
        });
        Ok(())
    }

    async fn candidate_exists(&self, term: &str) -> Result<bool, DbError> {
        let key = normalize_term(term);
        let state = self.state.lock().await;
        Ok(state
            .queue
            .iter()
            .any(|c| c.term_key == key && c.status == CandidateStatus::Pending))
    }

    async fn trend_exists(&self, term: &str) -> Result<bool, DbError> {
        let key = normalize_term(term);
        Ok(self.state.lock().await.trends.contains_key(&key))
    }

    async fn insert_candidate_if_absent(
        &self,
        term: &str,
        source: &str,
        initial_score: f64,
    ) -> Result<bool, DbError> {
        let key = normalize_term(term);
        let mut state = self.state.lock().await;

        let tracked = state.trends.contains_key(&key);
        let pending = state
            .queue
            .iter()
            .any(|c| c.term_key == key && c.status == CandidateStatus::Pending);
        if tracked || pending {
            return Ok(false);
        }

        state.queue.push(QueuedCandidate {
            term: term.trim().to_string(),
            term_key: key,
            source: source.to_string(),
            initial_score,
            status: CandidateStatus::Pending,
        });
        Ok(true)
    }

    async fn health_check(&self) -> Result<(), DbError> {
        Ok(())
    }
}
