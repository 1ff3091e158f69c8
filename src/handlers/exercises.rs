use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{CreateExercise, UpdateExercise, MUSCLE_GROUPS};
use crate::repositories::ExerciseRepository;

#[derive(Clone)]
pub struct ExercisesState {
    pub exercise_repo: ExerciseRepository,
}

#[derive(Deserialize)]
pub struct ListQuery {
    muscle_group: Option<String>,
}

fn validate_exercise_fields(name: &str, muscle_group: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    if !MUSCLE_GROUPS.contains(&muscle_group) {
        return Err(AppError::Validation(format!(
            "Unknown muscle group: {}",
            muscle_group
        )));
    }
    Ok(())
}

pub async fn list(
    State(state): State<ExercisesState>,
    auth_user: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Response> {
    let exercises = state
        .exercise_repo
        .find_visible(&auth_user.id, query.muscle_group.as_deref())
        .await?;

    Ok(Json(exercises).into_response())
}

pub async fn create(
    State(state): State<ExercisesState>,
    auth_user: AuthUser,
    Json(form): Json<CreateExercise>,
) -> Result<Response> {
    let name = form.name.trim();
    validate_exercise_fields(name, &form.muscle_group)?;

    if state
        .exercise_repo
        .name_taken(&auth_user.id, name, None)
        .await?
    {
        return Err(AppError::Validation(
            "An exercise with this name already exists".to_string(),
        ));
    }

    let exercise = state
        .exercise_repo
        .create(
            &auth_user.id,
            name,
            &form.muscle_group,
            form.equipment.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(exercise)).into_response())
}

pub async fn show(
    State(state): State<ExercisesState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Response> {
    let exercise = state
        .exercise_repo
        .find_visible_by_id(&id, &auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Exercise not found".to_string()))?;

    Ok(Json(exercise).into_response())
}

pub async fn update(
    State(state): State<ExercisesState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(form): Json<UpdateExercise>,
) -> Result<Response> {
    let name = form.name.trim();
    validate_exercise_fields(name, &form.muscle_group)?;

    if state
        .exercise_repo
        .name_taken(&auth_user.id, name, Some(&id))
        .await?
    {
        return Err(AppError::Validation(
            "An exercise with this name already exists".to_string(),
        ));
    }

    let updated = state
        .exercise_repo
        .update(
            &id,
            &auth_user.id,
            name,
            &form.muscle_group,
            form.equipment.as_deref(),
        )
        .await?;

    if !updated {
        return Err(AppError::NotFound("Exercise not found".to_string()));
    }

    let exercise = state
        .exercise_repo
        .find_visible_by_id(&id, &auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Exercise not found".to_string()))?;

    Ok(Json(exercise).into_response())
}

pub async fn delete(
    State(state): State<ExercisesState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Response> {
    let deleted = state.exercise_repo.delete(&id, &auth_user.id).await?;
    if !deleted {
        return Err(AppError::NotFound("Exercise not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT.into_response())
}

// Progress-view pins

pub async fn list_tracked(
    State(state): State<ExercisesState>,
    auth_user: AuthUser,
) -> Result<Response> {
    let exercises = state.exercise_repo.find_tracked(&auth_user.id).await?;
    Ok(Json(exercises).into_response())
}

pub async fn track(
    State(state): State<ExercisesState>,
    auth_user: AuthUser,
    Path(exercise_id): Path<String>,
) -> Result<Response> {
    state
        .exercise_repo
        .find_visible_by_id(&exercise_id, &auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Exercise not found".to_string()))?;

    let tracked = state.exercise_repo.track(&auth_user.id, &exercise_id).await?;

    Ok(Json(tracked).into_response())
}

pub async fn untrack(
    State(state): State<ExercisesState>,
    auth_user: AuthUser,
    Path(exercise_id): Path<String>,
) -> Result<Response> {
    state.exercise_repo.untrack(&auth_user.id, &exercise_id).await?;

    Ok(Json(serde_json::json!({ "tracked": false })).into_response())
}
