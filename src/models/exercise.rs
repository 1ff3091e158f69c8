use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

/// Accepted values for `muscle_group` on custom exercises.
pub const MUSCLE_GROUPS: &[&str] = &["chest", "back", "legs", "shoulders", "arms", "core"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    /// None for catalog exercises visible to everyone.
    pub user_id: Option<String>,
    pub name: String,
    pub muscle_group: String,
    pub equipment: Option<String>,
    pub is_default: bool,
}

impl FromSqliteRow for Exercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            muscle_group: row.get("muscle_group")?,
            equipment: row.get("equipment")?,
            is_default: row.get("is_default")?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateExercise {
    pub name: String,
    pub muscle_group: String,
    pub equipment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateExercise {
    pub name: String,
    pub muscle_group: String,
    pub equipment: Option<String>,
}
