// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Suggestion endpoint tests: batch behavior, bounds, and reproducibility.

use axum::http::StatusCode;
use serde_json::json;

mod common;

#[tokio::test]
async fn test_single_suggestion_by_default() {
    let (app, _) = common::create_test_app();

    let experiment = common::create_experiment(&app, json!({"name": "screen", "seed": 1})).await;
    let id = experiment["id"].as_str().unwrap();

    let (status, body) = common::send_json(
        &app,
        "POST",
        &format!("/api/experiments/{id}/suggestions"),
        Some(json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let trials = body["trials"].as_array().unwrap();
    assert_eq!(trials.len(), 1);
    assert_eq!(trials[0]["index"], 0);
    assert_eq!(trials[0]["status"], "pending");
    assert_eq!(trials[0]["origin"], "space_filling");
    assert_eq!(trials[0]["measurements"], json!(null));
}

#[tokio::test]
async fn test_batch_gets_consecutive_indices() {
    let (app, _) = common::create_test_app();

    let experiment = common::create_experiment(&app, json!({"name": "screen", "seed": 2})).await;
    let id = experiment["id"].as_str().unwrap();

    let (_, first) = common::send_json(
        &app,
        "POST",
        &format!("/api/experiments/{id}/suggestions"),
        Some(json!({"count": 3})),
    )
    .await;
    let (_, second) = common::send_json(
        &app,
        "POST",
        &format!("/api/experiments/{id}/suggestions"),
        Some(json!({"count": 2})),
    )
    .await;

    let indices: Vec<u64> = first["trials"]
        .as_array()
        .unwrap()
        .iter()
        .chain(second["trials"].as_array().unwrap())
        .map(|t| t["index"].as_u64().unwrap())
        .collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn test_suggestions_respect_bounds_and_composition() {
    let (app, _) = common::create_test_app();

    let experiment = common::create_experiment(
        &app,
        json!({
            "name": "narrow",
            "seed": 3,
            "exploration_trials": 8,
            "space": {
                "aqueous_fraction": {"min": 0.3, "max": 0.7},
                "stirring_speed_rpm": {"min": 200.0, "max": 300.0},
                "stirring_time_s": {"min": 20.0, "max": 60.0},
                "temperature_c": {"min": 10.0, "max": 30.0}
            }
        }),
    )
    .await;
    let id = experiment["id"].as_str().unwrap();

    let (_, body) = common::send_json(
        &app,
        "POST",
        &format!("/api/experiments/{id}/suggestions"),
        Some(json!({"count": 8})),
    )
    .await;

    for trial in body["trials"].as_array().unwrap() {
        let c = &trial["conditions"];
        let aqueous = c["aqueous_fraction"].as_f64().unwrap();
        let organic = c["organic_fraction"].as_f64().unwrap();
        let speed = c["stirring_speed_rpm"].as_f64().unwrap();
        let time = c["stirring_time_s"].as_f64().unwrap();
        let temp = c["temperature_c"].as_f64().unwrap();

        assert!((0.3..=0.7).contains(&aqueous));
        assert!((200.0..=300.0).contains(&speed));
        assert!((20.0..=60.0).contains(&time));
        assert!((10.0..=30.0).contains(&temp));
        assert!((aqueous + organic - 1.0).abs() < 1e-9);
    }
}

#[tokio::test]
async fn test_same_seed_reproduces_sequence() {
    let (app, _) = common::create_test_app();

    let mut sequences = Vec::new();
    for name in ["first run", "second run"] {
        let experiment = common::create_experiment(
            &app,
            json!({"name": name, "seed": 1234, "exploration_trials": 8}),
        )
        .await;
        let id = experiment["id"].as_str().unwrap();

        let (_, body) = common::send_json(
            &app,
            "POST",
            &format!("/api/experiments/{id}/suggestions"),
            Some(json!({"count": 8})),
        )
        .await;
        let conditions: Vec<serde_json::Value> = body["trials"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["conditions"].clone())
            .collect();
        sequences.push(conditions);
    }

    assert_eq!(sequences[0], sequences[1]);
}

#[tokio::test]
async fn test_count_zero_is_rejected() {
    let (app, _) = common::create_test_app();

    let experiment = common::create_experiment(&app, json!({"name": "screen"})).await;
    let id = experiment["id"].as_str().unwrap();

    let (status, _) = common::send_json(
        &app,
        "POST",
        &format!("/api/experiments/{id}/suggestions"),
        Some(json!({"count": 0})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_count_above_batch_cap_is_rejected() {
    let (app, state) = common::create_test_app();

    let experiment = common::create_experiment(&app, json!({"name": "screen"})).await;
    let id = experiment["id"].as_str().unwrap();

    let (status, body) = common::send_json(
        &app,
        "POST",
        &format!("/api/experiments/{id}/suggestions"),
        Some(json!({"count": state.config.max_suggestion_batch + 1})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_suggestions_for_unknown_experiment_is_404() {
    let (app, _) = common::create_test_app();

    let (status, _) = common::send_json(
        &app,
        "POST",
        "/api/experiments/00000000-0000-0000-0000-000000000000/suggestions",
        Some(json!({"count": 1})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
