#![allow(dead_code)] // Not every test file uses every helper

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;

use gymtrack::db::{create_memory_pool, DbPool};
use gymtrack::handlers::{auth, exercises, progress, records, templates, workouts};
use gymtrack::middleware::AuthContext;
use gymtrack::migrations::run_migrations_for_tests;
use gymtrack::models::User;
use gymtrack::repositories::{
    ExerciseRepository, SessionRepository, TemplateRepository, UserRepository, WorkoutRepository,
};

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

pub fn create_test_app(pool: DbPool) -> Router {
    // Create repositories
    let user_repo = UserRepository::new(pool.clone());
    let session_repo = SessionRepository::new(pool.clone());
    let exercise_repo = ExerciseRepository::new(pool.clone());
    let workout_repo = WorkoutRepository::new(pool.clone());
    let template_repo = TemplateRepository::new(pool.clone());

    // Create handler states
    let auth_state = auth::AuthState {
        user_repo: user_repo.clone(),
        session_repo: session_repo.clone(),
    };
    let exercises_state = exercises::ExercisesState {
        exercise_repo: exercise_repo.clone(),
    };
    let workouts_state = workouts::WorkoutsState {
        workout_repo: workout_repo.clone(),
        exercise_repo: exercise_repo.clone(),
    };
    let records_state = records::RecordsState {
        workout_repo: workout_repo.clone(),
        exercise_repo: exercise_repo.clone(),
    };
    let templates_state = templates::TemplatesState {
        template_repo: template_repo.clone(),
        workout_repo: workout_repo.clone(),
        exercise_repo: exercise_repo.clone(),
    };
    let progress_state = progress::ProgressState {
        workout_repo: workout_repo.clone(),
        exercise_repo: exercise_repo.clone(),
    };

    let auth_context = AuthContext {
        user_repo,
        session_repo,
    };

    gymtrack::routes::create_router(
        auth_state,
        exercises_state,
        workouts_state,
        records_state,
        templates_state,
        progress_state,
        auth_context,
    )
}

pub async fn create_test_user(pool: &DbPool, username: &str, password: &str) -> User {
    let user_repo = UserRepository::new(pool.clone());
    user_repo.create(username, password).await.unwrap()
}

pub async fn create_session_cookie(pool: &DbPool, user: &User) -> String {
    let session_repo = SessionRepository::new(pool.clone());
    let token = session_repo.create(&user.id).await.unwrap();
    format!("session={}", token)
}

pub fn extract_cookie_header(set_cookie: &str) -> String {
    // Extract just the cookie name=value part for use in Cookie header
    set_cookie.split(';').next().unwrap_or("").to_string()
}

/// Build a JSON request, optionally with a session cookie.
pub fn json_request(
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Build a bodyless request, optionally with a session cookie.
pub fn plain_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        panic!(
            "Response body was not JSON ({}): {}",
            e,
            String::from_utf8_lossy(&bytes)
        )
    })
}

// Test data creation helpers

pub async fn create_test_exercise(
    pool: &DbPool,
    user_id: &str,
    name: &str,
    muscle_group: &str,
) -> gymtrack::models::Exercise {
    let exercise_repo = ExerciseRepository::new(pool.clone());
    exercise_repo
        .create(user_id, name, muscle_group, None)
        .await
        .unwrap()
}

pub async fn create_test_workout(
    pool: &DbPool,
    user_id: &str,
    date: chrono::NaiveDate,
) -> gymtrack::models::Workout {
    let workout_repo = WorkoutRepository::new(pool.clone());
    workout_repo
        .create_workout(user_id, date, None, None)
        .await
        .unwrap()
}

pub async fn add_test_entry(
    pool: &DbPool,
    workout_id: &str,
    exercise_id: &str,
) -> gymtrack::models::WorkoutExercise {
    let workout_repo = WorkoutRepository::new(pool.clone());
    workout_repo
        .add_exercise(workout_id, exercise_id, None)
        .await
        .unwrap()
}

pub async fn add_test_set(
    pool: &DbPool,
    workout_exercise_id: &str,
    reps: i32,
    weight: f64,
) -> gymtrack::models::Set {
    let workout_repo = WorkoutRepository::new(pool.clone());
    workout_repo
        .create_set(workout_exercise_id, reps, weight, None)
        .await
        .unwrap()
}
