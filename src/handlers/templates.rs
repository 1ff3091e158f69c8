use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{
    CreateTemplate, CreateTemplateEntry, InstantiateTemplate, TemplateExerciseWithName,
    UpdateTemplate, Workout, WorkoutExerciseWithName, WorkoutTemplate,
};
use crate::repositories::{ExerciseRepository, TemplateRepository, WorkoutRepository};

#[derive(Clone)]
pub struct TemplatesState {
    pub template_repo: TemplateRepository,
    pub workout_repo: WorkoutRepository,
    pub exercise_repo: ExerciseRepository,
}

#[derive(Serialize)]
struct TemplateDetail {
    #[serde(flatten)]
    template: WorkoutTemplate,
    exercises: Vec<TemplateExerciseWithName>,
}

pub async fn list(State(state): State<TemplatesState>, auth_user: AuthUser) -> Result<Response> {
    let templates = state.template_repo.find_all_by_user(&auth_user.id).await?;
    Ok(Json(templates).into_response())
}

pub async fn create(
    State(state): State<TemplatesState>,
    auth_user: AuthUser,
    Json(form): Json<CreateTemplate>,
) -> Result<Response> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    validate_entries(&state, &auth_user.id, &form.exercises).await?;

    let template = state
        .template_repo
        .create(&auth_user.id, name, form.notes.as_deref(), form.exercises)
        .await?;

    let detail = assemble_detail(&state, template).await?;
    Ok((StatusCode::CREATED, Json(detail)).into_response())
}

pub async fn show(
    State(state): State<TemplatesState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Response> {
    let template = find_owned_template(&state, &id, &auth_user.id).await?;
    let detail = assemble_detail(&state, template).await?;
    Ok(Json(detail).into_response())
}

pub async fn update(
    State(state): State<TemplatesState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(form): Json<UpdateTemplate>,
) -> Result<Response> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    validate_entries(&state, &auth_user.id, &form.exercises).await?;

    let updated = state
        .template_repo
        .update(&id, &auth_user.id, name, form.notes.as_deref(), form.exercises)
        .await?;
    if !updated {
        return Err(AppError::NotFound("Template not found".to_string()));
    }

    let template = find_owned_template(&state, &id, &auth_user.id).await?;
    let detail = assemble_detail(&state, template).await?;
    Ok(Json(detail).into_response())
}

pub async fn delete(
    State(state): State<TemplatesState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Response> {
    let deleted = state.template_repo.delete(&id, &auth_user.id).await?;
    if !deleted {
        return Err(AppError::NotFound("Template not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Turn a template into a dated workout with one entry per template exercise.
pub async fn instantiate(
    State(state): State<TemplatesState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(form): Json<InstantiateTemplate>,
) -> Result<Response> {
    let template = find_owned_template(&state, &id, &auth_user.id).await?;
    let entries = state.template_repo.find_entries_with_names(&id).await?;

    let workout_name = form.name.as_deref().unwrap_or(&template.name);
    let workout = state
        .workout_repo
        .create_workout(
            &auth_user.id,
            form.date,
            Some(workout_name),
            template.notes.as_deref(),
        )
        .await?;

    // Entries come back ordered by position, so appending preserves order.
    for entry in &entries {
        state
            .workout_repo
            .add_exercise(&workout.id, &entry.exercise_id, None)
            .await?;
    }

    tracing::debug!(
        "Instantiated template {} into workout {}",
        template.id,
        workout.id
    );

    let created = workout_detail(&state, workout).await?;
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

// Helpers

async fn find_owned_template(
    state: &TemplatesState,
    id: &str,
    user_id: &str,
) -> Result<WorkoutTemplate> {
    let template = state
        .template_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Template not found".to_string()))?;

    if template.user_id != user_id {
        return Err(AppError::NotFound("Template not found".to_string()));
    }

    Ok(template)
}

async fn validate_entries(
    state: &TemplatesState,
    user_id: &str,
    entries: &[CreateTemplateEntry],
) -> Result<()> {
    for entry in entries {
        state
            .exercise_repo
            .find_visible_by_id(&entry.exercise_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Exercise not found".to_string()))?;

        if let Some(sets) = entry.target_sets {
            if sets < 1 {
                return Err(AppError::Validation(
                    "Target sets must be at least 1".to_string(),
                ));
            }
        }
        if let Some(reps) = entry.target_reps {
            if reps < 1 {
                return Err(AppError::Validation(
                    "Target reps must be at least 1".to_string(),
                ));
            }
        }
    }
    Ok(())
}

async fn assemble_detail(
    state: &TemplatesState,
    template: WorkoutTemplate,
) -> Result<TemplateDetail> {
    let exercises = state
        .template_repo
        .find_entries_with_names(&template.id)
        .await?;
    Ok(TemplateDetail {
        template,
        exercises,
    })
}

#[derive(Serialize)]
struct InstantiatedWorkout {
    #[serde(flatten)]
    workout: Workout,
    exercises: Vec<WorkoutExerciseWithName>,
}

async fn workout_detail(
    state: &TemplatesState,
    workout: Workout,
) -> Result<InstantiatedWorkout> {
    let exercises = state
        .workout_repo
        .find_entries_with_names(&workout.id)
        .await?;
    Ok(InstantiatedWorkout { workout, exercises })
}
