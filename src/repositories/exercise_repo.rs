use chrono::Utc;
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{Exercise, FromSqliteRow, TrackedExercise};

#[derive(Clone)]
pub struct ExerciseRepository {
    pool: DbPool,
}

impl ExerciseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Catalog exercise or one of the user's own. Anything else reads as absent.
    pub async fn find_visible_by_id(&self, id: &str, user_id: &str) -> Result<Option<Exercise>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM exercises WHERE id = ? AND (user_id = ? OR user_id IS NULL)",
            )?;
            let result = stmt
                .query_row(rusqlite::params![id, user_id], Exercise::from_row)
                .optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_visible(
        &self,
        user_id: &str,
        muscle_group: Option<&str>,
    ) -> Result<Vec<Exercise>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let muscle_group = muscle_group.map(|s| s.to_string());
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let exercises = match muscle_group {
                Some(group) => {
                    let mut stmt = conn.prepare(
                        "SELECT * FROM exercises
                         WHERE (user_id = ? OR user_id IS NULL) AND muscle_group = ?
                         ORDER BY muscle_group, name",
                    )?;
                    let rows = stmt
                        .query_map(rusqlite::params![user_id, group], Exercise::from_row)?
                        .collect::<rusqlite::Result<Vec<_>>>()?;
                    rows
                }
                None => {
                    let mut stmt = conn.prepare(
                        "SELECT * FROM exercises
                         WHERE user_id = ? OR user_id IS NULL
                         ORDER BY muscle_group, name",
                    )?;
                    let rows = stmt
                        .query_map([&user_id], Exercise::from_row)?
                        .collect::<rusqlite::Result<Vec<_>>>()?;
                    rows
                }
            };
            Ok(exercises)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// A user's custom exercises may not shadow each other by name.
    pub async fn name_taken(&self, user_id: &str, name: &str, exclude_id: Option<&str>) -> Result<bool> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let name = name.to_string();
        let exclude_id = exclude_id.map(|s| s.to_string()).unwrap_or_default();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM exercises WHERE user_id = ? AND name = ? AND id != ?",
                rusqlite::params![user_id, name, exclude_id],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn create(
        &self,
        user_id: &str,
        name: &str,
        muscle_group: &str,
        equipment: Option<&str>,
    ) -> Result<Exercise> {
        let id = Uuid::new_v4().to_string();
        let exercise = Exercise {
            id,
            user_id: Some(user_id.to_string()),
            name: name.to_string(),
            muscle_group: muscle_group.to_string(),
            equipment: equipment.map(|s| s.to_string()),
            is_default: false,
        };
        let exercise_clone = exercise.clone();

        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO exercises (id, user_id, name, muscle_group, equipment, is_default)
                 VALUES (?, ?, ?, ?, ?, 0)",
                rusqlite::params![
                    exercise_clone.id,
                    exercise_clone.user_id,
                    exercise_clone.name,
                    exercise_clone.muscle_group,
                    exercise_clone.equipment
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        Ok(exercise)
    }

    /// Update a custom exercise. Catalog rows have no owner and never match.
    pub async fn update(
        &self,
        id: &str,
        user_id: &str,
        name: &str,
        muscle_group: &str,
        equipment: Option<&str>,
    ) -> Result<bool> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let user_id = user_id.to_string();
        let name = name.to_string();
        let muscle_group = muscle_group.to_string();
        let equipment = equipment.map(|s| s.to_string());
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute(
                "UPDATE exercises SET name = ?, muscle_group = ?, equipment = ?
                 WHERE id = ? AND user_id = ?",
                rusqlite::params![name, muscle_group, equipment, id, user_id],
            )?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn delete(&self, id: &str, user_id: &str) -> Result<bool> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute(
                "DELETE FROM exercises WHERE id = ? AND user_id = ?",
                rusqlite::params![id, user_id],
            )?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    // Progress-view pins

    /// Pin an exercise to the progress view. Re-pinning returns the existing row.
    pub async fn track(&self, user_id: &str, exercise_id: &str) -> Result<TrackedExercise> {
        let pool = self.pool.clone();
        let id = Uuid::new_v4().to_string();
        let user_id = user_id.to_string();
        let exercise_id = exercise_id.to_string();
        let now = Utc::now();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO user_exercise_tracking (id, user_id, exercise_id, created_at)
                 VALUES (?, ?, ?, ?)
                 ON CONFLICT(user_id, exercise_id) DO NOTHING",
                rusqlite::params![id, user_id, exercise_id, now],
            )?;
            let row = conn.query_row(
                "SELECT * FROM user_exercise_tracking WHERE user_id = ? AND exercise_id = ?",
                rusqlite::params![user_id, exercise_id],
                TrackedExercise::from_row,
            )?;
            Ok(row)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn untrack(&self, user_id: &str, exercise_id: &str) -> Result<bool> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let exercise_id = exercise_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute(
                "DELETE FROM user_exercise_tracking WHERE user_id = ? AND exercise_id = ?",
                rusqlite::params![user_id, exercise_id],
            )?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_tracked(&self, user_id: &str) -> Result<Vec<Exercise>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT e.* FROM exercises e
                 JOIN user_exercise_tracking t ON t.exercise_id = e.id
                 WHERE t.user_id = ?
                 ORDER BY t.created_at",
            )?;
            let exercises = stmt
                .query_map([&user_id], Exercise::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(exercises)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
