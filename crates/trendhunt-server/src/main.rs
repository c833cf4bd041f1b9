mod api;
mod middleware;
mod scheduler;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use trendhunt_discovery::{build_sources, DiscoveryAgent};
use trendhunt_signals::{build_collector, SourceClients, Summarizer};

use crate::{
    api::{build_app, AppState},
    middleware::RateLimitState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = trendhunt_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let terms = trendhunt_core::load_terms(&config.terms_path, &config.region)?;
    tracing::info!(terms = terms.len(), path = %config.terms_path.display(), "loaded tracked terms");

    let gateway = trendhunt_db::connect_gateway(&config).await?;
    let clients = SourceClients::from_app_config(&config)?;

    let state = AppState {
        collector: Arc::new(build_collector(&config, &clients)),
        gateway: Arc::clone(&gateway),
        terms: Arc::new(terms),
        summarizer: Arc::new(Summarizer::from_app_config(&config)?),
        max_concurrent_terms: config.max_concurrent_terms,
    };

    let _scheduler = if config.persistence_enabled() {
        let agent = Arc::new(DiscoveryAgent::new(
            build_sources(&config, &clients, &state.terms),
            gateway,
            Duration::from_secs(config.adapter_timeout_secs),
        ));
        Some(scheduler::build_scheduler(&config, state.clone(), agent).await?)
    } else {
        tracing::info!("persistence disabled; scheduled discovery and collection not registered");
        None
    };

    let app = build_app(state, RateLimitState::per_minute(config.rate_limit_per_minute));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
