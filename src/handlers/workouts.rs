use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{
    AddWorkoutExercise, CreateSet, CreateWorkout, RecordType, Set, UpdateSet, UpdateWorkout,
    Workout, WorkoutExercise, WorkoutExerciseWithName,
};
use crate::repositories::{ExerciseRepository, WorkoutRepository};
use crate::strength::{estimate_one_rep_max, Formula};

const PER_PAGE: i64 = 10;

#[derive(Clone)]
pub struct WorkoutsState {
    pub workout_repo: WorkoutRepository,
    pub exercise_repo: ExerciseRepository,
}

#[derive(Deserialize)]
pub struct ListQuery {
    page: Option<i64>,
}

#[derive(Serialize)]
struct WorkoutListResponse {
    workouts: Vec<Workout>,
    page: i64,
    total_pages: i64,
    total: i64,
}

#[derive(Serialize)]
struct WorkoutEntryDetail {
    #[serde(flatten)]
    entry: WorkoutExerciseWithName,
    sets: Vec<Set>,
}

#[derive(Serialize)]
struct WorkoutDetail {
    #[serde(flatten)]
    workout: Workout,
    exercises: Vec<WorkoutEntryDetail>,
}

#[derive(Serialize)]
struct SetResponse {
    #[serde(flatten)]
    set: Set,
    new_records: Vec<&'static str>,
}

// Handlers

pub async fn list(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Response> {
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * PER_PAGE;

    let workouts = state
        .workout_repo
        .find_workouts_paginated(&auth_user.id, PER_PAGE, offset)
        .await?;
    let total = state.workout_repo.count_workouts(&auth_user.id).await?;
    let total_pages = (total + PER_PAGE - 1) / PER_PAGE;

    Ok(Json(WorkoutListResponse {
        workouts,
        page,
        total_pages,
        total,
    })
    .into_response())
}

pub async fn create(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Json(form): Json<CreateWorkout>,
) -> Result<Response> {
    let workout = state
        .workout_repo
        .create_workout(
            &auth_user.id,
            form.date,
            form.name.as_deref(),
            form.notes.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(workout)).into_response())
}

pub async fn show(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Response> {
    let workout = find_owned_workout(&state, &id, &auth_user.id).await?;
    let detail = assemble_detail(&state, workout).await?;

    Ok(Json(detail).into_response())
}

pub async fn update(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(form): Json<UpdateWorkout>,
) -> Result<Response> {
    let updated = state
        .workout_repo
        .update_workout(
            &id,
            &auth_user.id,
            form.date,
            form.name.as_deref(),
            form.notes.as_deref(),
        )
        .await?;

    if !updated {
        return Err(AppError::NotFound("Workout not found".to_string()));
    }

    let workout = find_owned_workout(&state, &id, &auth_user.id).await?;
    Ok(Json(workout).into_response())
}

pub async fn delete(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Response> {
    let deleted = state.workout_repo.delete_workout(&id, &auth_user.id).await?;
    if !deleted {
        return Err(AppError::NotFound("Workout not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT.into_response())
}

// Workout exercise entries

pub async fn add_exercise(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Path(workout_id): Path<String>,
    Json(form): Json<AddWorkoutExercise>,
) -> Result<Response> {
    find_owned_workout(&state, &workout_id, &auth_user.id).await?;

    state
        .exercise_repo
        .find_visible_by_id(&form.exercise_id, &auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Exercise not found".to_string()))?;

    let entry = state
        .workout_repo
        .add_exercise(&workout_id, &form.exercise_id, form.notes.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(entry)).into_response())
}

pub async fn delete_exercise(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Path((workout_id, entry_id)): Path<(String, String)>,
) -> Result<Response> {
    find_owned_workout(&state, &workout_id, &auth_user.id).await?;

    let deleted = state.workout_repo.delete_entry(&entry_id, &workout_id).await?;
    if !deleted {
        return Err(AppError::NotFound("Workout exercise not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT.into_response())
}

// Sets

pub async fn add_set(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Path((workout_id, entry_id)): Path<(String, String)>,
    Json(form): Json<CreateSet>,
) -> Result<Response> {
    validate_set(form.reps, form.weight, form.rpe)?;

    find_owned_workout(&state, &workout_id, &auth_user.id).await?;
    let entry = find_entry(&state, &entry_id, &workout_id).await?;

    let set = state
        .workout_repo
        .create_set(&entry_id, form.reps, form.weight, form.rpe)
        .await?;

    let new_records =
        refresh_records(&state, &auth_user.id, &entry.exercise_id, form.reps, form.weight).await?;

    Ok((StatusCode::CREATED, Json(SetResponse { set, new_records })).into_response())
}

pub async fn update_set(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Path((workout_id, entry_id, set_id)): Path<(String, String, String)>,
    Json(form): Json<UpdateSet>,
) -> Result<Response> {
    validate_set(form.reps, form.weight, form.rpe)?;

    find_owned_workout(&state, &workout_id, &auth_user.id).await?;
    let entry = find_entry(&state, &entry_id, &workout_id).await?;

    let updated = state
        .workout_repo
        .update_set(&set_id, &entry_id, form.reps, form.weight, form.rpe)
        .await?;
    if !updated {
        return Err(AppError::NotFound("Set not found".to_string()));
    }

    let new_records =
        refresh_records(&state, &auth_user.id, &entry.exercise_id, form.reps, form.weight).await?;

    let set = state
        .workout_repo
        .find_set_by_id(&set_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Set not found".to_string()))?;

    Ok(Json(SetResponse { set, new_records }).into_response())
}

pub async fn delete_set(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Path((workout_id, entry_id, set_id)): Path<(String, String, String)>,
) -> Result<Response> {
    find_owned_workout(&state, &workout_id, &auth_user.id).await?;
    find_entry(&state, &entry_id, &workout_id).await?;

    let deleted = state.workout_repo.delete_set(&set_id, &entry_id).await?;
    if !deleted {
        return Err(AppError::NotFound("Set not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT.into_response())
}

// Helpers

/// Other users' workouts read as absent, not forbidden.
async fn find_owned_workout(
    state: &WorkoutsState,
    id: &str,
    user_id: &str,
) -> Result<Workout> {
    let workout = state
        .workout_repo
        .find_workout_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Workout not found".to_string()))?;

    if workout.user_id != user_id {
        return Err(AppError::NotFound("Workout not found".to_string()));
    }

    Ok(workout)
}

async fn find_entry(
    state: &WorkoutsState,
    entry_id: &str,
    workout_id: &str,
) -> Result<WorkoutExercise> {
    let entry = state
        .workout_repo
        .find_entry_by_id(entry_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Workout exercise not found".to_string()))?;

    if entry.workout_id != workout_id {
        return Err(AppError::NotFound("Workout exercise not found".to_string()));
    }

    Ok(entry)
}

fn validate_set(reps: i32, weight: f64, rpe: Option<i32>) -> Result<()> {
    if reps < 1 {
        return Err(AppError::Validation("Reps must be at least 1".to_string()));
    }
    if weight < 0.0 {
        return Err(AppError::Validation(
            "Weight must be non-negative".to_string(),
        ));
    }
    if let Some(rpe) = rpe {
        if !(1..=10).contains(&rpe) {
            return Err(AppError::Validation(
                "RPE must be between 1 and 10".to_string(),
            ));
        }
    }
    Ok(())
}

async fn assemble_detail(state: &WorkoutsState, workout: Workout) -> Result<WorkoutDetail> {
    let entries = state
        .workout_repo
        .find_entries_with_names(&workout.id)
        .await?;

    let mut exercises = Vec::with_capacity(entries.len());
    for entry in entries {
        let sets = state.workout_repo.find_sets_by_entry(&entry.id).await?;
        exercises.push(WorkoutEntryDetail { entry, sets });
    }

    Ok(WorkoutDetail { workout, exercises })
}

/// Compare a logged set against the stored records and upsert any it beats.
/// Returns the record types that improved.
async fn refresh_records(
    state: &WorkoutsState,
    user_id: &str,
    exercise_id: &str,
    reps: i32,
    weight: f64,
) -> Result<Vec<&'static str>> {
    let estimated = estimate_one_rep_max(weight, reps, Formula::Epley)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let mut broken = Vec::new();
    for record_type in RecordType::ALL {
        let candidate = match record_type {
            RecordType::MaxWeight => weight,
            RecordType::OneRepMax => estimated,
            RecordType::MaxReps => f64::from(reps),
        };

        let current = state
            .workout_repo
            .find_pr(user_id, exercise_id, record_type.as_str())
            .await?;

        let beats = current.map(|pr| candidate > pr.value).unwrap_or(true);
        if beats && candidate > 0.0 {
            state
                .workout_repo
                .upsert_pr(user_id, exercise_id, record_type.as_str(), candidate)
                .await?;
            broken.push(record_type.as_str());
        }
    }

    Ok(broken)
}
