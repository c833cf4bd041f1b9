//! Command handlers for the CLI.
//!
//! Both commands build the same components the server does, run one pass,
//! and print the result to stdout as pretty JSON.

use std::sync::Arc;
use std::time::Duration;

use trendhunt_core::{normalize_term, AppConfig, TrackedTerm};
use trendhunt_discovery::{build_sources, DiscoveryAgent};
use trendhunt_signals::{build_collector, run_collection_positioned, SourceClients};

/// Narrow the tracked terms to `filter`, matched by normalized form. Each
/// selected term keeps its 1-based position in the terms file.
///
/// # Errors
///
/// Returns an error if `filter` matches no tracked term.
pub(crate) fn select_terms(
    terms: Vec<TrackedTerm>,
    filter: Option<&str>,
) -> anyhow::Result<Vec<(usize, TrackedTerm)>> {
    let key = filter.map(normalize_term);
    let selected: Vec<(usize, TrackedTerm)> = terms
        .into_iter()
        .enumerate()
        .map(|(index, term)| (index + 1, term))
        .filter(|(_, term)| key.as_ref().is_none_or(|k| term.key() == *k))
        .collect();
    if let Some(filter) = filter {
        if selected.is_empty() {
            anyhow::bail!("term '{filter}' is not tracked");
        }
    }
    Ok(selected)
}

/// Score the tracked terms once and print the records.
///
/// # Errors
///
/// Returns an error if the terms file cannot be loaded, the filter matches
/// nothing, the gateway cannot connect, or a collection task panics.
/// Individual adapter failures degrade to zero samples and are not errors.
pub(crate) async fn run_collect(config: &AppConfig, term_filter: Option<&str>) -> anyhow::Result<()> {
    let terms = trendhunt_core::load_terms(&config.terms_path, &config.region)?;
    let terms = select_terms(terms, term_filter)?;

    let gateway = trendhunt_db::connect_gateway(config).await?;
    let clients = SourceClients::from_app_config(config)?;
    let collector = Arc::new(build_collector(config, &clients));

    let records =
        run_collection_positioned(collector, gateway, &terms, config.max_concurrent_terms).await?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

/// Run one discovery pass and print the report.
///
/// # Errors
///
/// Returns an error if the terms file cannot be loaded or the gateway cannot
/// connect. Source and per-candidate failures are counted in the report.
pub(crate) async fn run_discover(config: &AppConfig, dry_run: bool) -> anyhow::Result<()> {
    if !dry_run && !config.persistence_enabled() {
        tracing::warn!("DATABASE_URL not set; candidates cannot be queued (use --dry-run to preview)");
    }

    let terms = trendhunt_core::load_terms(&config.terms_path, &config.region)?;
    let gateway = trendhunt_db::connect_gateway(config).await?;
    let clients = SourceClients::from_app_config(config)?;

    let agent = DiscoveryAgent::new(
        build_sources(config, &clients, &terms),
        gateway,
        Duration::from_secs(config.adapter_timeout_secs),
    );
    let report = tokio::time::timeout(
        Duration::from_secs(config.discovery_timeout_secs),
        agent.run(dry_run),
    )
    .await
    .map_err(|_| {
        anyhow::anyhow!(
            "discovery run exceeded {}s budget",
            config.discovery_timeout_secs
        )
    })?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
