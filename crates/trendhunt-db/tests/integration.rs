//! Offline tests for pool configuration and gateway selection.
//! These tests do not require a live database connection.

use trendhunt_core::build_app_config;
use trendhunt_db::{connect_gateway, PoolConfig};

fn config_without_env() -> trendhunt_core::AppConfig {
    build_app_config(|_| Err(std::env::VarError::NotPresent)).expect("defaults are valid")
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let mut app_config = config_without_env();
    app_config.db_max_connections = 42;
    app_config.db_min_connections = 7;
    app_config.db_acquire_timeout_secs = 9;

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[tokio::test]
async fn connect_gateway_without_database_url_is_disabled() {
    let gateway = connect_gateway(&config_without_env())
        .await
        .expect("no-op gateway never fails");

    assert!(!gateway.is_enabled());
    assert_eq!(
        gateway
            .upsert_trend(&trendhunt_core::TrackedTerm {
                term: "Mochi Donuts".to_string(),
                category: "Bakery".to_string(),
                region: "Minneapolis–St Paul".to_string(),
                neighborhood: "North Loop".to_string(),
            })
            .await
            .unwrap(),
        None
    );
}
