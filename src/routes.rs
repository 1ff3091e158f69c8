use axum::{
    routing::{delete, get, post, put},
    Extension, Router,
};

use crate::handlers::{auth, exercises, health, progress, records, templates, workouts};
use crate::middleware::AuthContext;

#[allow(clippy::too_many_arguments)]
pub fn create_router(
    auth_state: auth::AuthState,
    exercises_state: exercises::ExercisesState,
    workouts_state: workouts::WorkoutsState,
    records_state: records::RecordsState,
    templates_state: templates::TemplatesState,
    progress_state: progress::ProgressState,
    auth_context: AuthContext,
) -> Router {
    Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Auth routes
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .with_state(auth_state)
        // Exercise routes
        .route("/api/exercises", get(exercises::list).post(exercises::create))
        .route(
            "/api/exercises/{id}",
            get(exercises::show)
                .put(exercises::update)
                .delete(exercises::delete),
        )
        // Progress-view pins
        .route("/api/tracking", get(exercises::list_tracked))
        .route(
            "/api/tracking/{exercise_id}",
            put(exercises::track).delete(exercises::untrack),
        )
        .with_state(exercises_state)
        // Workout routes
        .route("/api/workouts", get(workouts::list).post(workouts::create))
        .route(
            "/api/workouts/{id}",
            get(workouts::show)
                .put(workouts::update)
                .delete(workouts::delete),
        )
        .route(
            "/api/workouts/{id}/exercises",
            post(workouts::add_exercise),
        )
        .route(
            "/api/workouts/{id}/exercises/{entry_id}",
            delete(workouts::delete_exercise),
        )
        .route(
            "/api/workouts/{id}/exercises/{entry_id}/sets",
            post(workouts::add_set),
        )
        .route(
            "/api/workouts/{id}/exercises/{entry_id}/sets/{set_id}",
            put(workouts::update_set).delete(workouts::delete_set),
        )
        .with_state(workouts_state)
        // Personal records
        .route("/api/records", get(records::list))
        .route("/api/records/{exercise_id}", get(records::by_exercise))
        .with_state(records_state)
        // Templates
        .route(
            "/api/templates",
            get(templates::list).post(templates::create),
        )
        .route(
            "/api/templates/{id}",
            get(templates::show)
                .put(templates::update)
                .delete(templates::delete),
        )
        .route(
            "/api/templates/{id}/instantiate",
            post(templates::instantiate),
        )
        .with_state(templates_state)
        // Progress & stats
        .route(
            "/api/progress/{exercise_id}",
            get(progress::exercise_progress),
        )
        .route("/api/stats", get(progress::stats))
        .with_state(progress_state)
        // Session lookup for the AuthUser extractor
        .layer(Extension(auth_context))
}
