use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Set {
    pub id: String,
    pub workout_exercise_id: String,
    pub set_number: i32,
    pub reps: i32,
    pub weight: f64,
    pub rpe: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for Set {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            workout_exercise_id: row.get("workout_exercise_id")?,
            set_number: row.get("set_number")?,
            reps: row.get("reps")?,
            weight: row.get("weight")?,
            rpe: row.get("rpe")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateSet {
    pub reps: i32,
    pub weight: f64,
    pub rpe: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSet {
    pub reps: i32,
    pub weight: f64,
    pub rpe: Option<i32>,
}
