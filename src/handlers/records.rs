use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{Exercise, PersonalRecord, RecordType};
use crate::repositories::{ExerciseRepository, WorkoutRepository};
use crate::strength::percentage_table;

#[derive(Clone)]
pub struct RecordsState {
    pub workout_repo: WorkoutRepository,
    pub exercise_repo: ExerciseRepository,
}

#[derive(Serialize)]
struct PercentageRow {
    percentage: u32,
    weight: f64,
}

#[derive(Serialize)]
struct ExerciseRecordsResponse {
    exercise: Exercise,
    records: Vec<PersonalRecord>,
    /// Working weights off the stored one-rep max, when one exists.
    percentages: Vec<PercentageRow>,
}

pub async fn list(State(state): State<RecordsState>, auth_user: AuthUser) -> Result<Response> {
    let records = state.workout_repo.find_prs_by_user(&auth_user.id).await?;
    Ok(Json(records).into_response())
}

pub async fn by_exercise(
    State(state): State<RecordsState>,
    auth_user: AuthUser,
    Path(exercise_id): Path<String>,
) -> Result<Response> {
    let exercise = state
        .exercise_repo
        .find_visible_by_id(&exercise_id, &auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Exercise not found".to_string()))?;

    let records = state
        .workout_repo
        .find_prs_by_exercise(&auth_user.id, &exercise_id)
        .await?;

    let percentages = records
        .iter()
        .find(|r| r.record_type == RecordType::OneRepMax.as_str())
        .map(|pr| {
            percentage_table(pr.value)
                .into_iter()
                .map(|(percentage, weight)| PercentageRow { percentage, weight })
                .collect()
        })
        .unwrap_or_default();

    Ok(Json(ExerciseRecordsResponse {
        exercise,
        records,
        percentages,
    })
    .into_response())
}
