use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutTemplate {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for WorkoutTemplate {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateExerciseWithName {
    pub id: String,
    pub template_id: String,
    pub exercise_id: String,
    pub exercise_name: String,
    pub position: i32,
    pub target_sets: Option<i32>,
    pub target_reps: Option<i32>,
}

impl FromSqliteRow for TemplateExerciseWithName {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            template_id: row.get("template_id")?,
            exercise_id: row.get("exercise_id")?,
            exercise_name: row.get("exercise_name")?,
            position: row.get("position")?,
            target_sets: row.get("target_sets")?,
            target_reps: row.get("target_reps")?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateTemplateEntry {
    pub exercise_id: String,
    pub target_sets: Option<i32>,
    pub target_reps: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTemplate {
    pub name: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub exercises: Vec<CreateTemplateEntry>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTemplate {
    pub name: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub exercises: Vec<CreateTemplateEntry>,
}

#[derive(Debug, Deserialize)]
pub struct InstantiateTemplate {
    pub date: NaiveDate,
    pub name: Option<String>,
}
