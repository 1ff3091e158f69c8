use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub name: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for Workout {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            date: row.get("date")?,
            name: row.get("name")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateWorkout {
    pub date: NaiveDate,
    pub name: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateWorkout {
    pub date: Option<NaiveDate>,
    pub name: Option<String>,
    pub notes: Option<String>,
}

/// One exercise slot inside a workout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutExercise {
    pub id: String,
    pub workout_id: String,
    pub exercise_id: String,
    pub position: i32,
    pub notes: Option<String>,
}

impl FromSqliteRow for WorkoutExercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            workout_id: row.get("workout_id")?,
            exercise_id: row.get("exercise_id")?,
            position: row.get("position")?,
            notes: row.get("notes")?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkoutExerciseWithName {
    pub id: String,
    pub workout_id: String,
    pub exercise_id: String,
    pub exercise_name: String,
    pub position: i32,
    pub notes: Option<String>,
}

impl FromSqliteRow for WorkoutExerciseWithName {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            workout_id: row.get("workout_id")?,
            exercise_id: row.get("exercise_id")?,
            exercise_name: row.get("exercise_name")?,
            position: row.get("position")?,
            notes: row.get("notes")?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct AddWorkoutExercise {
    pub exercise_id: String,
    pub notes: Option<String>,
}
