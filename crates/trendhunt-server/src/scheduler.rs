//! Background job scheduler.
//!
//! Registers the recurring discovery and collection jobs. Both run outside
//! the request path and only when persistence is configured.

use std::sync::Arc;
use std::time::Duration;

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use trendhunt_core::AppConfig;
use trendhunt_discovery::DiscoveryAgent;

use crate::api::AppState;

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process. Dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a cron expression is invalid, or the scheduler fails to start.
pub async fn build_scheduler(
    config: &AppConfig,
    state: AppState,
    agent: Arc<DiscoveryAgent>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_discovery_job(
        &scheduler,
        &config.discovery_cron,
        Duration::from_secs(config.discovery_timeout_secs),
        agent,
    )
    .await?;
    register_collection_job(&scheduler, &config.collection_cron, state).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// One discovery pass per tick, abandoned once it exceeds `budget`.
async fn register_discovery_job(
    scheduler: &JobScheduler,
    cron: &str,
    budget: Duration,
    agent: Arc<DiscoveryAgent>,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(cron, move |_uuid, _lock| {
        let agent = Arc::clone(&agent);

        Box::pin(async move {
            tracing::info!("scheduler: starting discovery run");
            match tokio::time::timeout(budget, agent.run(false)).await {
                Ok(report) => tracing::info!(
                    proposed = report.proposed,
                    inserted = report.inserted,
                    skipped = report.skipped,
                    failed = report.failed,
                    "scheduler: discovery run complete"
                ),
                Err(_) => tracing::error!(
                    timeout_secs = budget.as_secs(),
                    "scheduler: discovery run timed out"
                ),
            }
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

/// Collect, score, and persist every tracked term so history accrues
/// without HTTP traffic.
async fn register_collection_job(
    scheduler: &JobScheduler,
    cron: &str,
    state: AppState,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(cron, move |_uuid, _lock| {
        let state = state.clone();

        Box::pin(async move {
            tracing::info!(terms = state.terms.len(), "scheduler: starting collection run");
            if let Err(e) = trendhunt_signals::run_collection(
                Arc::clone(&state.collector),
                Arc::clone(&state.gateway),
                &state.terms,
                state.max_concurrent_terms,
            )
            .await
            {
                tracing::error!(error = %e, "scheduler: collection run failed");
            }
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}
