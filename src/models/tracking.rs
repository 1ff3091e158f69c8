use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::Serialize;

use super::FromSqliteRow;

/// An exercise the user pinned to their progress view.
#[derive(Debug, Clone, Serialize)]
pub struct TrackedExercise {
    pub id: String,
    pub user_id: String,
    pub exercise_id: String,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for TrackedExercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            exercise_id: row.get("exercise_id")?,
            created_at: row.get("created_at")?,
        })
    }
}
