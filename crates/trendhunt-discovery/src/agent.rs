//! Discovery runs: gather proposals from every source, de-duplicate, submit.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use trendhunt_core::{normalize_term, DiscoveryCandidate};
use trendhunt_db::{DbError, PersistenceGateway};

use crate::sources::DiscoverySource;

const SUBMIT_CONCURRENCY: usize = 8;

/// Outcome counts for one discovery run.
///
/// `proposed` counts distinct normalized terms. In a dry run `inserted` is
/// what would have been queued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryReport {
    pub proposed: usize,
    pub inserted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub dry_run: bool,
}

enum Submission {
    Inserted,
    Skipped,
    Failed,
}

pub struct DiscoveryAgent {
    sources: Vec<Arc<dyn DiscoverySource>>,
    gateway: Arc<dyn PersistenceGateway>,
    source_timeout: Duration,
}

impl DiscoveryAgent {
    #[must_use]
    pub fn new(
        sources: Vec<Arc<dyn DiscoverySource>>,
        gateway: Arc<dyn PersistenceGateway>,
        source_timeout: Duration,
    ) -> Self {
        Self {
            sources,
            gateway,
            source_timeout,
        }
    }

    /// One full pass over every source.
    ///
    /// Sources run concurrently, each under the source timeout; a failed or
    /// timed-out source contributes nothing. Gateway errors are counted as
    /// `failed` and do not stop the run.
    pub async fn run(&self, dry_run: bool) -> DiscoveryReport {
        let proposals = dedup(self.gather().await);

        let outcomes: Vec<Submission> = stream::iter(0..proposals.len())
            .map(|i| self.submit(&proposals[i], dry_run))
            .buffer_unordered(SUBMIT_CONCURRENCY)
            .collect()
            .await;

        let mut report = DiscoveryReport {
            proposed: proposals.len(),
            dry_run,
            ..DiscoveryReport::default()
        };
        for outcome in outcomes {
            match outcome {
                Submission::Inserted => report.inserted += 1,
                Submission::Skipped => report.skipped += 1,
                Submission::Failed => report.failed += 1,
            }
        }

        tracing::info!(
            proposed = report.proposed,
            inserted = report.inserted,
            skipped = report.skipped,
            failed = report.failed,
            dry_run,
            "discovery run complete"
        );
        report
    }

    async fn gather(&self) -> Vec<DiscoveryCandidate> {
        let runs = self.sources.iter().map(|source| async move {
            match tokio::time::timeout(self.source_timeout, source.propose()).await {
                Ok(Ok(candidates)) => {
                    tracing::debug!(
                        source = source.name(),
                        count = candidates.len(),
                        "discovery source finished"
                    );
                    candidates
                }
                Ok(Err(e)) => {
                    tracing::warn!(source = source.name(), error = %e, "discovery source failed");
                    Vec::new()
                }
                Err(_) => {
                    tracing::warn!(
                        source = source.name(),
                        timeout_secs = self.source_timeout.as_secs(),
                        "discovery source timed out"
                    );
                    Vec::new()
                }
            }
        });

        join_all(runs).await.into_iter().flatten().collect()
    }

    async fn submit(&self, candidate: &DiscoveryCandidate, dry_run: bool) -> Submission {
        let result = if dry_run {
            self.would_insert(&candidate.term).await
        } else {
            self.gateway
                .insert_candidate_if_absent(
                    &candidate.term,
                    &candidate.source,
                    candidate.initial_score,
                )
                .await
        };

        match result {
            Ok(true) => {
                tracing::info!(
                    term = %candidate.term,
                    source = %candidate.source,
                    dry_run,
                    "queued discovery candidate"
                );
                Submission::Inserted
            }
            Ok(false) => Submission::Skipped,
            Err(e) => {
                tracing::warn!(term = %candidate.term, error = %e, "candidate submit failed");
                Submission::Failed
            }
        }
    }

    /// Read-only preview; never used to decide a real insert.
    async fn would_insert(&self, term: &str) -> Result<bool, DbError> {
        if self.gateway.trend_exists(term).await? {
            return Ok(false);
        }
        Ok(!self.gateway.candidate_exists(term).await?)
    }
}

/// Drop blank terms and keep the first proposal per normalized term.
fn dedup(candidates: Vec<DiscoveryCandidate>) -> Vec<DiscoveryCandidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| {
            let key = normalize_term(&c.term);
            !key.is_empty() && seen.insert(key)
        })
        .collect()
}

#[cfg(test)]
#[path = "agent_test.rs"]
mod tests;
