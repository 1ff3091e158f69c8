mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

async fn setup_logged_set(
    pool: &gymtrack::db::DbPool,
    user_id: &str,
    exercise_id: &str,
    cookie: &str,
    app: &axum::Router,
    reps: i32,
    weight: f64,
) -> serde_json::Value {
    let workout = common::create_test_workout(pool, user_id, "2026-08-01".parse().unwrap()).await;
    let entry = common::add_test_entry(pool, &workout.id, exercise_id).await;

    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            &format!("/api/workouts/{}/exercises/{}/sets", workout.id, entry.id),
            Some(cookie),
            json!({ "reps": reps, "weight": weight }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    common::body_json(response).await
}

#[tokio::test]
async fn test_first_set_establishes_all_records() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "alice", "password123").await;
    let exercise = common::create_test_exercise(&pool, &user.id, "Paused Bench", "chest").await;
    let cookie = common::create_session_cookie(&pool, &user).await;
    let app = common::create_test_app(pool.clone());

    let body = setup_logged_set(&pool, &user.id, &exercise.id, &cookie, &app, 5, 100.0).await;

    let new_records = body["new_records"].as_array().unwrap();
    assert!(new_records.contains(&json!("max_weight")));
    assert!(new_records.contains(&json!("one_rep_max")));
    assert!(new_records.contains(&json!("max_reps")));

    let response = app
        .oneshot(common::plain_request("GET", "/api/records", Some(&cookie)))
        .await
        .unwrap();
    let records = common::body_json(response).await;
    assert_eq!(records.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_heavier_set_breaks_weight_records_only() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "alice", "password123").await;
    let exercise = common::create_test_exercise(&pool, &user.id, "Paused Bench", "chest").await;
    let cookie = common::create_session_cookie(&pool, &user).await;
    let app = common::create_test_app(pool.clone());

    setup_logged_set(&pool, &user.id, &exercise.id, &cookie, &app, 5, 100.0).await;
    let body = setup_logged_set(&pool, &user.id, &exercise.id, &cookie, &app, 5, 110.0).await;

    let new_records = body["new_records"].as_array().unwrap();
    assert!(new_records.contains(&json!("max_weight")));
    assert!(new_records.contains(&json!("one_rep_max")));
    // Same reps as before, so no rep record
    assert!(!new_records.contains(&json!("max_reps")));
}

#[tokio::test]
async fn test_lighter_set_breaks_nothing() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "alice", "password123").await;
    let exercise = common::create_test_exercise(&pool, &user.id, "Paused Bench", "chest").await;
    let cookie = common::create_session_cookie(&pool, &user).await;
    let app = common::create_test_app(pool.clone());

    setup_logged_set(&pool, &user.id, &exercise.id, &cookie, &app, 5, 100.0).await;
    let body = setup_logged_set(&pool, &user.id, &exercise.id, &cookie, &app, 3, 80.0).await;

    assert!(body["new_records"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_exercise_records_include_percentage_table() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "alice", "password123").await;
    let exercise = common::create_test_exercise(&pool, &user.id, "Paused Bench", "chest").await;
    let cookie = common::create_session_cookie(&pool, &user).await;
    let app = common::create_test_app(pool.clone());

    // 100x5 -> Epley estimate 117.5
    setup_logged_set(&pool, &user.id, &exercise.id, &cookie, &app, 5, 100.0).await;

    let response = app
        .oneshot(common::plain_request(
            "GET",
            &format!("/api/records/{}", exercise.id),
            Some(&cookie),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["exercise"]["name"], "Paused Bench");
    assert_eq!(body["records"].as_array().unwrap().len(), 3);

    let percentages = body["percentages"].as_array().unwrap();
    assert_eq!(percentages.len(), 10);
    assert_eq!(percentages[0]["percentage"], 95);
    // 117.5 * 0.95 = 111.625 -> 112.5
    assert_eq!(percentages[0]["weight"], 112.5);
    assert_eq!(percentages[9]["percentage"], 50);
}

#[tokio::test]
async fn test_records_without_one_rep_max_have_no_percentages() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "alice", "password123").await;
    let exercise = common::create_test_exercise(&pool, &user.id, "Paused Bench", "chest").await;
    let cookie = common::create_session_cookie(&pool, &user).await;
    let app = common::create_test_app(pool);

    let response = app
        .oneshot(common::plain_request(
            "GET",
            &format!("/api/records/{}", exercise.id),
            Some(&cookie),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert!(body["records"].as_array().unwrap().is_empty());
    assert!(body["percentages"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_records_list_joins_exercise_names() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "alice", "password123").await;
    let exercise = common::create_test_exercise(&pool, &user.id, "Paused Bench", "chest").await;
    let cookie = common::create_session_cookie(&pool, &user).await;
    let app = common::create_test_app(pool.clone());

    setup_logged_set(&pool, &user.id, &exercise.id, &cookie, &app, 5, 100.0).await;

    let response = app
        .oneshot(common::plain_request("GET", "/api/records", Some(&cookie)))
        .await
        .unwrap();
    let records = common::body_json(response).await;

    for record in records.as_array().unwrap() {
        assert_eq!(record["exercise_name"], "Paused Bench");
    }
}
