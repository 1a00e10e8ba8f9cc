mod utils;

use axum::http::StatusCode;
use serde_json::json;
use std::time::Duration;

use coachlens::{DistributionRepository, MetricDistribution, PlayerFeedback};
use utils::{full_match, squad_match, PipelineSetupBuilder};

fn leaderboard_setup() -> utils::PipelineSetup {
    PipelineSetupBuilder::new()
        .with_match("pro.a", squad_match("a1"), full_match("pro.a", 1))
        .with_match("pro.b", squad_match("b1"), full_match("pro.b", 2))
        .with_match("pro.c", squad_match("c1"), full_match("pro.c", 3))
        .with_player("eve", "account.eve")
        .with_match("account.eve", squad_match("e1"), full_match("account.eve", 2))
        .with_leaderboard("squad", vec!["pro.a", "pro.b", "pro.c"])
        .build()
}

#[tokio::test]
async fn refresh_creates_then_updates_rows_in_place() {
    let setup = leaderboard_setup();

    let (status, body) = setup
        .post_json("/v1/benchmarks/refresh", json!({"mode": "squad"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    let first: Vec<MetricDistribution> = serde_json::from_value(body).unwrap();
    let rows_after_first = setup.distributions.distribution_count().await;
    assert_eq!(rows_after_first, first.len());

    let frag = setup
        .distributions
        .find_by_key("frag_per_10m")
        .await
        .unwrap()
        .unwrap();
    assert_eq!((frag.p25, frag.p50, frag.p75), (1.0, 2.0, 3.0));

    tokio::time::sleep(Duration::from_millis(10)).await;
    let (status, _) = setup
        .post_json("/v1/benchmarks/refresh", json!({"mode": "squad"}))
        .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(setup.distributions.distribution_count().await, rows_after_first);
    let refreshed = setup
        .distributions
        .find_by_key("frag_per_10m")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(refreshed.metric_key, frag.metric_key);
    assert_eq!(refreshed.p50, frag.p50);
    assert!(refreshed.updated_at > frag.updated_at);
}

#[tokio::test]
async fn listing_returns_summaries_sorted_by_key() {
    let setup = leaderboard_setup();
    setup
        .post_json("/v1/benchmarks/refresh", json!({"mode": "squad"}))
        .await;

    let (status, body) = setup.get_json("/v1/benchmarks").await;
    assert_eq!(status, StatusCode::OK);

    let listed: Vec<MetricDistribution> = serde_json::from_value(body).unwrap();
    let keys: Vec<&str> = listed.iter().map(|d| d.metric_key.as_str()).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    assert!(keys.contains(&"dtk_conv_rate"));
    assert!(keys.contains(&"phase1.enter_delay_s"));
}

#[tokio::test]
async fn feedback_scores_against_refreshed_distributions() {
    let setup = leaderboard_setup();
    setup
        .post_json("/v1/benchmarks/refresh", json!({"mode": "squad"}))
        .await;
    setup
        .post_json("/v1/ingest", json!({"nickname": "eve"}))
        .await;

    let (status, body) = setup.get_json("/v1/players/account.eve/feedback").await;
    assert_eq!(status, StatusCode::OK);
    let feedback: PlayerFeedback = serde_json::from_value(body).unwrap();

    // Every pro converted their only down, exactly like eve.
    let combat = feedback
        .cards
        .iter()
        .find(|card| card.metric_key == "dtk_conv_rate")
        .unwrap();
    assert_eq!(combat.value, 1.0);
    assert_eq!(combat.percentile, 25.0);
    assert_eq!(combat.z_score, 0.0);
}

#[tokio::test]
async fn refresh_rejects_oversized_leaderboard() {
    let setup = leaderboard_setup();

    let (status, _) = setup
        .post_json(
            "/v1/benchmarks/refresh",
            json!({"mode": "squad", "leaderboardSize": 500}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(setup.distributions.distribution_count().await, 0);
}
