use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalRecord {
    pub id: String,
    pub user_id: String,
    pub exercise_id: String,
    pub record_type: String,
    pub value: f64,
    pub achieved_at: DateTime<Utc>,
}

impl FromSqliteRow for PersonalRecord {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            exercise_id: row.get("exercise_id")?,
            record_type: row.get("record_type")?,
            value: row.get("value")?,
            achieved_at: row.get("achieved_at")?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PersonalRecordWithExercise {
    pub id: String,
    pub user_id: String,
    pub exercise_id: String,
    pub exercise_name: String,
    pub record_type: String,
    pub value: f64,
    pub achieved_at: DateTime<Utc>,
}

impl FromSqliteRow for PersonalRecordWithExercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            exercise_id: row.get("exercise_id")?,
            exercise_name: row.get("exercise_name")?,
            record_type: row.get("record_type")?,
            value: row.get("value")?,
            achieved_at: row.get("achieved_at")?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    MaxWeight,
    OneRepMax,
    MaxReps,
}

impl RecordType {
    pub const ALL: &'static [RecordType] = &[
        RecordType::MaxWeight,
        RecordType::OneRepMax,
        RecordType::MaxReps,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::MaxWeight => "max_weight",
            RecordType::OneRepMax => "one_rep_max",
            RecordType::MaxReps => "max_reps",
        }
    }
}
