use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{Exercise, Workout};
use crate::progress::{aggregate_daily, DailyProgress};
use crate::repositories::{ExerciseRepository, WorkoutRepository};

const DEFAULT_WINDOW_DAYS: i64 = 90;
const MAX_WINDOW_DAYS: i64 = 365;

#[derive(Clone)]
pub struct ProgressState {
    pub workout_repo: WorkoutRepository,
    pub exercise_repo: ExerciseRepository,
}

#[derive(Deserialize)]
pub struct ProgressQuery {
    days: Option<i64>,
}

#[derive(Serialize)]
struct ProgressResponse {
    exercise: Exercise,
    days: i64,
    series: Vec<DailyProgress>,
}

#[derive(Serialize)]
struct StatsResponse {
    workouts_this_week: i64,
    workouts_this_month: i64,
    total_volume_this_week: f64,
    total_workouts: i64,
    recent_workouts: Vec<Workout>,
}

pub async fn exercise_progress(
    State(state): State<ProgressState>,
    auth_user: AuthUser,
    Path(exercise_id): Path<String>,
    Query(query): Query<ProgressQuery>,
) -> Result<Response> {
    let days = query.days.unwrap_or(DEFAULT_WINDOW_DAYS);
    if !(1..=MAX_WINDOW_DAYS).contains(&days) {
        return Err(AppError::Validation(format!(
            "days must be between 1 and {}",
            MAX_WINDOW_DAYS
        )));
    }

    let exercise = state
        .exercise_repo
        .find_visible_by_id(&exercise_id, &auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Exercise not found".to_string()))?;

    let samples = state
        .workout_repo
        .find_exercise_samples_since(&auth_user.id, &exercise_id, days)
        .await?;
    let series = aggregate_daily(&samples);

    Ok(Json(ProgressResponse {
        exercise,
        days,
        series,
    })
    .into_response())
}

pub async fn stats(State(state): State<ProgressState>, auth_user: AuthUser) -> Result<Response> {
    let workouts_this_week = state
        .workout_repo
        .count_workouts_since(&auth_user.id, 7)
        .await?;
    let workouts_this_month = state
        .workout_repo
        .count_workouts_since(&auth_user.id, 30)
        .await?;
    let total_volume_this_week = state
        .workout_repo
        .total_volume_since(&auth_user.id, 7)
        .await?;
    let total_workouts = state.workout_repo.count_workouts(&auth_user.id).await?;
    let recent_workouts = state
        .workout_repo
        .find_workouts_paginated(&auth_user.id, 5, 0)
        .await?;

    Ok(Json(StatsResponse {
        workouts_this_week,
        workouts_this_month,
        total_volume_this_week,
        total_workouts,
        recent_workouts,
    })
    .into_response())
}
