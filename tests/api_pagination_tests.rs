// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trial listing pagination tests.
//!
//! These tests verify that:
//! 1. Pagination parameters are validated correctly
//! 2. Cursor pages cover the full trial list without overlap

use axum::http::StatusCode;
use serde_json::json;

mod common;

async fn experiment_with_trials(app: &axum::Router, count: usize) -> String {
    let experiment =
        common::create_experiment(app, json!({"name": "paginated", "seed": 77})).await;
    let id = experiment["id"].as_str().unwrap().to_string();

    let (status, _) = common::send_json(
        app,
        "POST",
        &format!("/api/experiments/{id}/suggestions"),
        Some(json!({"count": count})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    id
}

#[tokio::test]
async fn test_per_page_zero_is_rejected() {
    let (app, _) = common::create_test_app();
    let id = experiment_with_trials(&app, 3).await;

    let (status, _) = common::send_json(
        &app,
        "GET",
        &format!("/api/experiments/{id}/trials?per_page=0"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_cursor_is_rejected() {
    let (app, _) = common::create_test_app();
    let id = experiment_with_trials(&app, 3).await;

    let (status, body) = common::send_json(
        &app,
        "GET",
        &format!("/api/experiments/{id}/trials?cursor=!!!"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_cursor_walk_covers_all_trials() {
    let (app, _) = common::create_test_app();
    let id = experiment_with_trials(&app, 5).await;

    let mut seen = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let uri = match &cursor {
            Some(c) => format!("/api/experiments/{id}/trials?per_page=2&cursor={c}"),
            None => format!("/api/experiments/{id}/trials?per_page=2"),
        };
        let (status, body) = common::send_json(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);

        let trials = body["trials"].as_array().unwrap();
        assert!(trials.len() <= 2);
        for trial in trials {
            seen.push(trial["index"].as_u64().unwrap());
        }

        match body["next_cursor"].as_str() {
            Some(next) => {
                // Total is unknown while more pages remain
                assert_eq!(body["total"], 0);
                cursor = Some(next.to_string());
            }
            None => {
                assert_eq!(body["total"], trials.len() as u64);
                break;
            }
        }
    }

    assert_eq!(seen, vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn test_exact_page_boundary_has_no_cursor() {
    let (app, _) = common::create_test_app();
    let id = experiment_with_trials(&app, 4).await;

    let (_, body) = common::send_json(
        &app,
        "GET",
        &format!("/api/experiments/{id}/trials?per_page=4"),
        None,
    )
    .await;

    assert_eq!(body["trials"].as_array().unwrap().len(), 4);
    assert_eq!(body["next_cursor"], json!(null));
    assert_eq!(body["total"], 4);
}

#[tokio::test]
async fn test_per_page_is_capped() {
    let (app, _) = common::create_test_app();
    let id = experiment_with_trials(&app, 2).await;

    let (status, body) = common::send_json(
        &app,
        "GET",
        &format!("/api/experiments/{id}/trials?per_page=10000"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["per_page"], 100);
}

#[tokio::test]
async fn test_status_filter() {
    let (app, _) = common::create_test_app();
    let id = experiment_with_trials(&app, 3).await;

    // Complete the first trial, abandon the second
    let (_, body) = common::send_json(
        &app,
        "GET",
        &format!("/api/experiments/{id}/trials"),
        None,
    )
    .await;
    let trials = body["trials"].as_array().unwrap();
    let first = trials[0]["id"].as_str().unwrap();
    let second = trials[1]["id"].as_str().unwrap();

    common::send_json(
        &app,
        "POST",
        &format!("/api/trials/{first}/complete"),
        Some(json!({"measurements": {
            "recovery_pct": 70.0,
            "purity_pct": 92.0,
            "separation_pct": 80.0,
            "emulsion_pct": 30.0,
            "total_time_s": 700.0
        }})),
    )
    .await;
    common::send_json(
        &app,
        "POST",
        &format!("/api/trials/{second}/abandon"),
        Some(json!({})),
    )
    .await;

    let (_, completed) = common::send_json(
        &app,
        "GET",
        &format!("/api/experiments/{id}/trials?status=completed"),
        None,
    )
    .await;
    assert_eq!(completed["trials"].as_array().unwrap().len(), 1);
    assert_eq!(completed["trials"][0]["status"], "completed");

    let (_, pending) = common::send_json(
        &app,
        "GET",
        &format!("/api/experiments/{id}/trials?status=pending"),
        None,
    )
    .await;
    assert_eq!(pending["trials"].as_array().unwrap().len(), 1);
    assert_eq!(pending["trials"][0]["index"], 2);
}

#[tokio::test]
async fn test_unknown_status_is_rejected() {
    let (app, _) = common::create_test_app();
    let id = experiment_with_trials(&app, 1).await;

    let (status, _) = common::send_json(
        &app,
        "GET",
        &format!("/api/experiments/{id}/trials?status=bogus"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_trials_for_unknown_experiment_is_404() {
    let (app, _) = common::create_test_app();

    let (status, _) = common::send_json(
        &app,
        "GET",
        "/api/experiments/00000000-0000-0000-0000-000000000000/trials",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
