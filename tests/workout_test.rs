mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_create_workout() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "alice", "password123").await;
    let cookie = common::create_session_cookie(&pool, &user).await;
    let app = common::create_test_app(pool);

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/workouts",
            Some(&cookie),
            json!({ "date": "2026-08-01", "name": "Push day", "notes": "felt good" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = common::body_json(response).await;
    assert_eq!(body["date"], "2026-08-01");
    assert_eq!(body["name"], "Push day");
    assert_eq!(body["user_id"], user.id);
}

#[tokio::test]
async fn test_list_is_paginated_newest_first() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "alice", "password123").await;
    for day in 1..=12 {
        let date = format!("2026-07-{:02}", day).parse().unwrap();
        common::create_test_workout(&pool, &user.id, date).await;
    }
    let cookie = common::create_session_cookie(&pool, &user).await;
    let app = common::create_test_app(pool);

    let response = app
        .clone()
        .oneshot(common::plain_request("GET", "/api/workouts", Some(&cookie)))
        .await
        .unwrap();
    let body = common::body_json(response).await;

    assert_eq!(body["total"], 12);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["page"], 1);
    let workouts = body["workouts"].as_array().unwrap();
    assert_eq!(workouts.len(), 10);
    assert_eq!(workouts[0]["date"], "2026-07-12");

    let response = app
        .oneshot(common::plain_request(
            "GET",
            "/api/workouts?page=2",
            Some(&cookie),
        ))
        .await
        .unwrap();
    let body = common::body_json(response).await;
    assert_eq!(body["workouts"].as_array().unwrap().len(), 2);
    assert_eq!(body["page"], 2);
}

#[tokio::test]
async fn test_show_assembles_entries_and_sets() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "alice", "password123").await;
    let exercise = common::create_test_exercise(&pool, &user.id, "Paused Bench", "chest").await;
    let workout =
        common::create_test_workout(&pool, &user.id, "2026-08-01".parse().unwrap()).await;
    let entry = common::add_test_entry(&pool, &workout.id, &exercise.id).await;
    common::add_test_set(&pool, &entry.id, 5, 100.0).await;
    common::add_test_set(&pool, &entry.id, 5, 102.5).await;
    let cookie = common::create_session_cookie(&pool, &user).await;
    let app = common::create_test_app(pool);

    let response = app
        .oneshot(common::plain_request(
            "GET",
            &format!("/api/workouts/{}", workout.id),
            Some(&cookie),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    let exercises = body["exercises"].as_array().unwrap();
    assert_eq!(exercises.len(), 1);
    assert_eq!(exercises[0]["exercise_name"], "Paused Bench");

    let sets = exercises[0]["sets"].as_array().unwrap();
    assert_eq!(sets.len(), 2);
    assert_eq!(sets[0]["set_number"], 1);
    assert_eq!(sets[1]["weight"], 102.5);
}

#[tokio::test]
async fn test_other_users_workout_reads_as_missing() {
    let pool = common::setup_test_db();
    let alice = common::create_test_user(&pool, "alice", "password123").await;
    let bob = common::create_test_user(&pool, "bob", "password123").await;
    let workout =
        common::create_test_workout(&pool, &alice.id, "2026-08-01".parse().unwrap()).await;
    let cookie = common::create_session_cookie(&pool, &bob).await;
    let app = common::create_test_app(pool);

    let response = app
        .oneshot(common::plain_request(
            "GET",
            &format!("/api/workouts/{}", workout.id),
            Some(&cookie),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_exercise_entry() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "alice", "password123").await;
    let exercise = common::create_test_exercise(&pool, &user.id, "Paused Bench", "chest").await;
    let workout =
        common::create_test_workout(&pool, &user.id, "2026-08-01".parse().unwrap()).await;
    let cookie = common::create_session_cookie(&pool, &user).await;
    let app = common::create_test_app(pool);

    let response = app
        .oneshot(common::json_request(
            "POST",
            &format!("/api/workouts/{}/exercises", workout.id),
            Some(&cookie),
            json!({ "exercise_id": exercise.id }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = common::body_json(response).await;
    assert_eq!(body["position"], 1);
    assert_eq!(body["exercise_id"], exercise.id);
}

#[tokio::test]
async fn test_add_set_validates_input() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "alice", "password123").await;
    let exercise = common::create_test_exercise(&pool, &user.id, "Paused Bench", "chest").await;
    let workout =
        common::create_test_workout(&pool, &user.id, "2026-08-01".parse().unwrap()).await;
    let entry = common::add_test_entry(&pool, &workout.id, &exercise.id).await;
    let cookie = common::create_session_cookie(&pool, &user).await;
    let app = common::create_test_app(pool);

    let uri = format!("/api/workouts/{}/exercises/{}/sets", workout.id, entry.id);

    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            &uri,
            Some(&cookie),
            json!({ "reps": 0, "weight": 100.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            &uri,
            Some(&cookie),
            json!({ "reps": 5, "weight": -1.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(common::json_request(
            "POST",
            &uri,
            Some(&cookie),
            json!({ "reps": 5, "weight": 100.0, "rpe": 11 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_update_delete_set() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "alice", "password123").await;
    let exercise = common::create_test_exercise(&pool, &user.id, "Paused Bench", "chest").await;
    let workout =
        common::create_test_workout(&pool, &user.id, "2026-08-01".parse().unwrap()).await;
    let entry = common::add_test_entry(&pool, &workout.id, &exercise.id).await;
    let cookie = common::create_session_cookie(&pool, &user).await;
    let app = common::create_test_app(pool);

    let sets_uri = format!("/api/workouts/{}/exercises/{}/sets", workout.id, entry.id);

    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            &sets_uri,
            Some(&cookie),
            json!({ "reps": 5, "weight": 100.0, "rpe": 8 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = common::body_json(response).await;
    assert_eq!(body["set_number"], 1);
    let set_id = body["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(common::json_request(
            "PUT",
            &format!("{}/{}", sets_uri, set_id),
            Some(&cookie),
            json!({ "reps": 6, "weight": 100.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["reps"], 6);

    let response = app
        .oneshot(common::plain_request(
            "DELETE",
            &format!("{}/{}", sets_uri, set_id),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_entry_must_belong_to_workout() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "alice", "password123").await;
    let exercise = common::create_test_exercise(&pool, &user.id, "Paused Bench", "chest").await;
    let first =
        common::create_test_workout(&pool, &user.id, "2026-08-01".parse().unwrap()).await;
    let second =
        common::create_test_workout(&pool, &user.id, "2026-08-02".parse().unwrap()).await;
    let entry = common::add_test_entry(&pool, &first.id, &exercise.id).await;
    let cookie = common::create_session_cookie(&pool, &user).await;
    let app = common::create_test_app(pool);

    // Entry from workout A addressed through workout B
    let response = app
        .oneshot(common::json_request(
            "POST",
            &format!("/api/workouts/{}/exercises/{}/sets", second.id, entry.id),
            Some(&cookie),
            json!({ "reps": 5, "weight": 100.0 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_workout() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "alice", "password123").await;
    let workout =
        common::create_test_workout(&pool, &user.id, "2026-08-01".parse().unwrap()).await;
    let cookie = common::create_session_cookie(&pool, &user).await;
    let app = common::create_test_app(pool);

    let response = app
        .clone()
        .oneshot(common::plain_request(
            "DELETE",
            &format!("/api/workouts/{}", workout.id),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(common::plain_request(
            "GET",
            &format!("/api/workouts/{}", workout.id),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
