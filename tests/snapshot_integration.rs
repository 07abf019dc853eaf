// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Snapshot persistence tests: state written through the API survives a
//! restart of the service.

use axum::http::StatusCode;
use extraction_planner::config::Config;
use extraction_planner::db::Store;
use extraction_planner::routes::create_router;
use extraction_planner::services::DesignService;
use extraction_planner::AppState;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

mod common;

fn create_test_app_with_snapshot(path: PathBuf) -> axum::Router {
    let config = Config::test_default();
    let store = Store::open(Some(path)).expect("Failed to open store");
    let state = Arc::new(AppState {
        config,
        store,
        designer: DesignService::new(),
    });
    create_router(state)
}

fn temp_snapshot_path() -> PathBuf {
    std::env::temp_dir().join(format!("planner-api-snapshot-{}.json", uuid::Uuid::new_v4()))
}

#[tokio::test]
async fn test_experiments_survive_restart() {
    let path = temp_snapshot_path();

    // First service instance: create an experiment and run some trials
    let experiment_id = {
        let app = create_test_app_with_snapshot(path.clone());
        let experiment = common::create_experiment(
            &app,
            json!({"name": "persisted campaign", "seed": 21, "exploration_trials": 4}),
        )
        .await;
        let id = experiment["id"].as_str().unwrap().to_string();

        let (status, _) = common::send_json(
            &app,
            "POST",
            &format!("/api/experiments/{id}/autorun"),
            Some(json!({"trials": 5})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        id
    };

    // Second instance against the same snapshot file
    let app = create_test_app_with_snapshot(path.clone());

    let (status, experiment) = common::send_json(
        &app,
        "GET",
        &format!("/api/experiments/{experiment_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(experiment["name"], "persisted campaign");
    assert_eq!(experiment["seed"], 21);

    let (_, trials) = common::send_json(
        &app,
        "GET",
        &format!("/api/experiments/{experiment_id}/trials"),
        None,
    )
    .await;
    assert_eq!(trials["trials"].as_array().unwrap().len(), 5);

    // New suggestions continue the index sequence after the restart
    let (_, suggested) = common::send_json(
        &app,
        "POST",
        &format!("/api/experiments/{experiment_id}/suggestions"),
        Some(json!({"count": 1})),
    )
    .await;
    assert_eq!(suggested["trials"][0]["index"], 5);

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_deletion_persists() {
    let path = temp_snapshot_path();

    let experiment_id = {
        let app = create_test_app_with_snapshot(path.clone());
        let experiment =
            common::create_experiment(&app, json!({"name": "short-lived"})).await;
        let id = experiment["id"].as_str().unwrap().to_string();

        let (status, _) =
            common::send_json(&app, "DELETE", &format!("/api/experiments/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        id
    };

    let app = create_test_app_with_snapshot(path.clone());
    let (status, _) = common::send_json(
        &app,
        "GET",
        &format!("/api/experiments/{experiment_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let _ = std::fs::remove_file(&path);
}
