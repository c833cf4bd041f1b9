//! Postgres-backed [`PersistenceGateway`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use trendhunt_core::{normalize_term, Scores, SignalSet, TrackedTerm};

use crate::{DbError, PersistenceGateway};

#[derive(Debug, Clone)]
pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn score_column(field: &'static str, value: u8) -> Result<i16, DbError> {
    if value > 100 {
        return Err(DbError::ScoreOutOfRange { field, value });
    }
    Ok(i16::from(value))
}

#[async_trait]
impl PersistenceGateway for PgGateway {
    /// Upsert keyed on `term_key`; the display term and metadata are refreshed.
    /// A pending candidate for the same term is approved in the same statement.
    async fn upsert_trend(&self, term: &TrackedTerm) -> Result<Option<i64>, DbError> {
        let id = sqlx::query_scalar::<_, i64>(
            "WITH promoted AS ( \
               UPDATE discovery_queue SET status = 'approved', updated_at = NOW() \
               WHERE term_key = $2 AND status = 'pending' \
             ) \
             INSERT INTO trends (term, term_key, category, region, neighborhood, last_updated) \
             VALUES ($1, $2, $3, $4, $5, NOW()) \
             ON CONFLICT (term_key) DO UPDATE SET \
               term = EXCLUDED.term, \
               category = EXCLUDED.category, \
               region = EXCLUDED.region, \
               neighborhood = EXCLUDED.neighborhood, \
               last_updated = NOW() \
             RETURNING id",
        )
        .bind(&term.term)
        .bind(term.key())
        .bind(&term.category)
        .bind(&term.region)
        .bind(&term.neighborhood)
        .fetch_one(&self.pool)
        .await?;

        Ok(Some(id))
    }

    async fn append_history(
        &self,
        trend_id: i64,
        scores: &Scores,
        raw_signals: &SignalSet,
        captured_at: DateTime<Utc>,
    ) -> Result<(), DbError> {
        let raw = serde_json::to_value(raw_signals)?;

        sqlx::query(
            "INSERT INTO trend_history \
               (trend_id, captured_at, demand_score, supply_score, \
                unmet_demand_score, breakout_probability, raw_signals) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(trend_id)
        .bind(captured_at)
        .bind(score_column("demand_score", scores.demand_score)?)
        .bind(score_column("supply_score", scores.supply_score)?)
        .bind(score_column(
            "unmet_demand_score",
            scores.unmet_demand_score,
        )?)
        .bind(score_column(
            "breakout_probability",
            scores.breakout_probability,
        )?)
        .bind(raw)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn candidate_exists(&self, term: &str) -> Result<bool, DbError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS ( \
               SELECT 1 FROM discovery_queue WHERE term_key = $1 AND status = 'pending' \
             )",
        )
        .bind(normalize_term(term))
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn trend_exists(&self, term: &str) -> Result<bool, DbError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM trends WHERE term_key = $1)",
        )
        .bind(normalize_term(term))
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Single statement: the `NOT EXISTS` guard excludes tracked terms and the
    /// partial unique index on pending `term_key` turns a concurrent duplicate
    /// into a no-op instead of a second row.
    async fn insert_candidate_if_absent(
        &self,
        term: &str,
        source: &str,
        initial_score: f64,
    ) -> Result<bool, DbError> {
        let inserted = sqlx::query_scalar::<_, i64>(
            "INSERT INTO discovery_queue (term, term_key, source, initial_score, status) \
             SELECT $1, $2, $3, $4, 'pending' \
             WHERE NOT EXISTS (SELECT 1 FROM trends WHERE term_key = $2) \
             ON CONFLICT (term_key) WHERE status = 'pending' DO NOTHING \
             RETURNING id",
        )
        .bind(term.trim())
        .bind(normalize_term(term))
        .bind(source)
        .bind(initial_score)
        .fetch_optional(&self.pool)
        .await?;

        Ok(inserted.is_some())
    }

    async fn health_check(&self) -> Result<(), DbError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_column_accepts_bounds() {
        assert_eq!(score_column("demand_score", 0).unwrap(), 0);
        assert_eq!(score_column("demand_score", 100).unwrap(), 100);
    }

    #[test]
    fn score_column_rejects_out_of_range() {
        let err = score_column("supply_score", 101).unwrap_err();
        assert!(matches!(
            err,
            DbError::ScoreOutOfRange {
                field: "supply_score",
                value: 101
            }
        ));
    }
}
