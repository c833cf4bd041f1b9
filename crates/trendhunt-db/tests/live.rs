//! Live integration tests for the Postgres gateway using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/trendhunt-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use std::sync::Arc;

use chrono::Utc;
use trendhunt_core::{Platform, Scores, SignalSample, SignalSet, TrackedTerm};
use trendhunt_db::{PersistenceGateway, PgGateway};

fn tracked(term: &str) -> TrackedTerm {
    TrackedTerm {
        term: term.to_string(),
        category: "Mexican".to_string(),
        region: "Minneapolis–St Paul".to_string(),
        neighborhood: "Northeast".to_string(),
    }
}

fn scores() -> Scores {
    Scores {
        demand_score: 80,
        supply_score: 40,
        unmet_demand_score: 48,
        breakout_probability: 52,
    }
}

async fn pending_rows(pool: &sqlx::PgPool, term_key: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM discovery_queue WHERE term_key = $1 AND status = 'pending'",
    )
    .bind(term_key)
    .fetch_one(pool)
    .await
    .expect("count pending rows")
}

#[sqlx::test(migrations = "../../migrations")]
async fn upsert_trend_returns_same_id_for_normalized_term(pool: sqlx::PgPool) {
    let gateway = PgGateway::new(pool);

    let first = gateway
        .upsert_trend(&tracked("Birria Tacos"))
        .await
        .expect("first upsert");
    let second = gateway
        .upsert_trend(&tracked("  birria   TACOS "))
        .await
        .expect("second upsert");

    assert!(first.is_some());
    assert_eq!(first, second);
    assert!(gateway.trend_exists("BIRRIA TACOS").await.unwrap());
}

#[sqlx::test(migrations = "../../migrations")]
async fn append_history_stores_scores_and_raw_signals(pool: sqlx::PgPool) {
    let gateway = PgGateway::new(pool.clone());
    let id = gateway
        .upsert_trend(&tracked("Birria Tacos"))
        .await
        .unwrap()
        .expect("pg gateway returns an id");

    let signals: SignalSet = [SignalSample {
        platform: Platform::TikTok,
        current_intensity: 90.0,
        velocity: 10.0,
        history: Vec::new(),
    }]
    .into_iter()
    .collect();

    gateway
        .append_history(id, &scores(), &signals, Utc::now())
        .await
        .expect("append history");

    let (demand, raw): (i16, serde_json::Value) = sqlx::query_as(
        "SELECT demand_score, raw_signals FROM trend_history WHERE trend_id = $1",
    )
    .bind(id)
    .fetch_one(&pool)
    .await
    .unwrap();

    assert_eq!(demand, 80);
    assert_eq!(raw[0]["platform"], "TikTok");
    assert_eq!(raw[0]["currentIntensity"], 90.0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn candidate_for_tracked_term_is_skipped(pool: sqlx::PgPool) {
    let gateway = PgGateway::new(pool.clone());
    gateway.upsert_trend(&tracked("Ube Lattes")).await.unwrap();

    let inserted = gateway
        .insert_candidate_if_absent("ube lattes", "Reddit r/Minneapolis", 14.0)
        .await
        .unwrap();

    assert!(!inserted);
    assert_eq!(pending_rows(&pool, "ube lattes").await, 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn tracking_a_queued_term_approves_its_candidate(pool: sqlx::PgPool) {
    let gateway = PgGateway::new(pool.clone());
    assert!(gateway
        .insert_candidate_if_absent("Hand Roll Bar", "Yelp Hot & New (Category)", 50.0)
        .await
        .unwrap());

    gateway.upsert_trend(&tracked("hand roll bar")).await.unwrap();

    assert!(gateway.trend_exists("Hand Roll Bar").await.unwrap());
    assert!(!gateway.candidate_exists("Hand Roll Bar").await.unwrap());
    assert_eq!(pending_rows(&pool, "hand roll bar").await, 0);

    let status: String =
        sqlx::query_scalar("SELECT status FROM discovery_queue WHERE term_key = $1")
            .bind("hand roll bar")
            .fetch_one(&pool)
            .await
            .expect("queued row");
    assert_eq!(status, "approved");
}

#[sqlx::test(migrations = "../../migrations")]
async fn concurrent_candidate_inserts_leave_one_pending_row(pool: sqlx::PgPool) {
    let gateway = Arc::new(PgGateway::new(pool.clone()));

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let gateway = Arc::clone(&gateway);
            tokio::spawn(async move {
                gateway
                    .insert_candidate_if_absent("Hot Honey Pizza", &format!("run-{i}"), 10.0)
                    .await
                    .expect("insert candidate")
            })
        })
        .collect();

    let inserted = futures::future::join_all(tasks)
        .await
        .into_iter()
        .filter(|r| *r.as_ref().expect("task panicked"))
        .count();

    assert_eq!(inserted, 1);
    assert_eq!(pending_rows(&pool, "hot honey pizza").await, 1);
    assert!(gateway.candidate_exists("hot honey pizza").await.unwrap());
}

#[sqlx::test(migrations = "../../migrations")]
async fn rejected_candidate_does_not_block_new_pending_row(pool: sqlx::PgPool) {
    let gateway = PgGateway::new(pool.clone());
    assert!(gateway
        .insert_candidate_if_absent("Smash Burgers", "test", 1.0)
        .await
        .unwrap());

    sqlx::query("UPDATE discovery_queue SET status = 'rejected' WHERE term_key = $1")
        .bind("smash burgers")
        .execute(&pool)
        .await
        .unwrap();

    assert!(!gateway.candidate_exists("Smash Burgers").await.unwrap());
    assert!(gateway
        .insert_candidate_if_absent("Smash Burgers", "test", 2.0)
        .await
        .unwrap());
}

#[sqlx::test(migrations = "../../migrations")]
async fn health_check_succeeds_on_live_pool(pool: sqlx::PgPool) {
    PgGateway::new(pool).health_check().await.expect("health");
}
