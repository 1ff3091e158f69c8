use chrono::{NaiveDate, Utc};
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{
    FromSqliteRow, PersonalRecord, PersonalRecordWithExercise, Set, Workout, WorkoutExercise,
    WorkoutExerciseWithName,
};
use crate::progress::SetSample;

#[derive(Clone)]
pub struct WorkoutRepository {
    pool: DbPool,
}

impl WorkoutRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    // Workouts

    pub async fn create_workout(
        &self,
        user_id: &str,
        date: NaiveDate,
        name: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Workout> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let workout = Workout {
            id,
            user_id: user_id.to_string(),
            date,
            name: name.map(|s| s.to_string()),
            notes: notes.map(|s| s.to_string()),
            created_at: now,
        };
        let workout_clone = workout.clone();

        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO workouts (id, user_id, date, name, notes, created_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    workout_clone.id,
                    workout_clone.user_id,
                    workout_clone.date,
                    workout_clone.name,
                    workout_clone.notes,
                    workout_clone.created_at
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        Ok(workout)
    }

    pub async fn find_workout_by_id(&self, id: &str) -> Result<Option<Workout>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM workouts WHERE id = ?")?;
            let result = stmt.query_row([&id], Workout::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_workouts_paginated(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Workout>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM workouts WHERE user_id = ?
                 ORDER BY date DESC, created_at DESC LIMIT ? OFFSET ?",
            )?;
            let workouts = stmt
                .query_map(rusqlite::params![user_id, limit, offset], Workout::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(workouts)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn count_workouts(&self, user_id: &str) -> Result<i64> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM workouts WHERE user_id = ?",
                [&user_id],
                |row| row.get(0),
            )?;
            Ok(count)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn update_workout(
        &self,
        id: &str,
        user_id: &str,
        date: Option<NaiveDate>,
        name: Option<&str>,
        notes: Option<&str>,
    ) -> Result<bool> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let user_id = user_id.to_string();
        let name = name.map(|s| s.to_string());
        let notes = notes.map(|s| s.to_string());
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = match date {
                Some(date) => conn.execute(
                    "UPDATE workouts SET date = ?, name = ?, notes = ? WHERE id = ? AND user_id = ?",
                    rusqlite::params![date, name, notes, id, user_id],
                )?,
                None => conn.execute(
                    "UPDATE workouts SET name = ?, notes = ? WHERE id = ? AND user_id = ?",
                    rusqlite::params![name, notes, id, user_id],
                )?,
            };
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn delete_workout(&self, id: &str, user_id: &str) -> Result<bool> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute(
                "DELETE FROM workouts WHERE id = ? AND user_id = ?",
                rusqlite::params![id, user_id],
            )?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    // Workout exercise entries

    pub async fn add_exercise(
        &self,
        workout_id: &str,
        exercise_id: &str,
        notes: Option<&str>,
    ) -> Result<WorkoutExercise> {
        let pool = self.pool.clone();
        let id = Uuid::new_v4().to_string();
        let workout_id = workout_id.to_string();
        let exercise_id = exercise_id.to_string();
        let notes = notes.map(|s| s.to_string());

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let position: i32 = conn
                .query_row(
                    "SELECT MAX(position) FROM workout_exercises WHERE workout_id = ?",
                    [&workout_id],
                    |row| row.get::<_, Option<i32>>(0),
                )?
                .map(|p| p + 1)
                .unwrap_or(1);

            conn.execute(
                "INSERT INTO workout_exercises (id, workout_id, exercise_id, position, notes)
                 VALUES (?, ?, ?, ?, ?)",
                rusqlite::params![id, workout_id, exercise_id, position, notes],
            )?;

            Ok(WorkoutExercise {
                id,
                workout_id,
                exercise_id,
                position,
                notes,
            })
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_entry_by_id(&self, id: &str) -> Result<Option<WorkoutExercise>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM workout_exercises WHERE id = ?")?;
            let result = stmt.query_row([&id], WorkoutExercise::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_entries_with_names(
        &self,
        workout_id: &str,
    ) -> Result<Vec<WorkoutExerciseWithName>> {
        let pool = self.pool.clone();
        let workout_id = workout_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT we.id, we.workout_id, we.exercise_id, e.name AS exercise_name,
                        we.position, we.notes
                 FROM workout_exercises we
                 JOIN exercises e ON we.exercise_id = e.id
                 WHERE we.workout_id = ?
                 ORDER BY we.position",
            )?;
            let entries = stmt
                .query_map([&workout_id], WorkoutExerciseWithName::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(entries)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn delete_entry(&self, id: &str, workout_id: &str) -> Result<bool> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let workout_id = workout_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute(
                "DELETE FROM workout_exercises WHERE id = ? AND workout_id = ?",
                rusqlite::params![id, workout_id],
            )?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    // Sets

    pub async fn create_set(
        &self,
        workout_exercise_id: &str,
        reps: i32,
        weight: f64,
        rpe: Option<i32>,
    ) -> Result<Set> {
        let pool = self.pool.clone();
        let id = Uuid::new_v4().to_string();
        let workout_exercise_id = workout_exercise_id.to_string();
        let now = Utc::now();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let set_number: i32 = conn
                .query_row(
                    "SELECT MAX(set_number) FROM sets WHERE workout_exercise_id = ?",
                    [&workout_exercise_id],
                    |row| row.get::<_, Option<i32>>(0),
                )?
                .map(|n| n + 1)
                .unwrap_or(1);

            conn.execute(
                "INSERT INTO sets (id, workout_exercise_id, set_number, reps, weight, rpe, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![id, workout_exercise_id, set_number, reps, weight, rpe, now],
            )?;

            Ok(Set {
                id,
                workout_exercise_id,
                set_number,
                reps,
                weight,
                rpe,
                created_at: now,
            })
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_set_by_id(&self, id: &str) -> Result<Option<Set>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM sets WHERE id = ?")?;
            let result = stmt.query_row([&id], Set::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_sets_by_entry(&self, workout_exercise_id: &str) -> Result<Vec<Set>> {
        let pool = self.pool.clone();
        let workout_exercise_id = workout_exercise_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM sets WHERE workout_exercise_id = ? ORDER BY set_number",
            )?;
            let sets = stmt
                .query_map([&workout_exercise_id], Set::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(sets)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn update_set(
        &self,
        id: &str,
        workout_exercise_id: &str,
        reps: i32,
        weight: f64,
        rpe: Option<i32>,
    ) -> Result<bool> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let workout_exercise_id = workout_exercise_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute(
                "UPDATE sets SET reps = ?, weight = ?, rpe = ?
                 WHERE id = ? AND workout_exercise_id = ?",
                rusqlite::params![reps, weight, rpe, id, workout_exercise_id],
            )?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn delete_set(&self, id: &str, workout_exercise_id: &str) -> Result<bool> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let workout_exercise_id = workout_exercise_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute(
                "DELETE FROM sets WHERE id = ? AND workout_exercise_id = ?",
                rusqlite::params![id, workout_exercise_id],
            )?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    // Personal records

    pub async fn find_pr(
        &self,
        user_id: &str,
        exercise_id: &str,
        record_type: &str,
    ) -> Result<Option<PersonalRecord>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let exercise_id = exercise_id.to_string();
        let record_type = record_type.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM personal_records
                 WHERE user_id = ? AND exercise_id = ? AND record_type = ?",
            )?;
            let result = stmt
                .query_row(
                    rusqlite::params![user_id, exercise_id, record_type],
                    PersonalRecord::from_row,
                )
                .optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn upsert_pr(
        &self,
        user_id: &str,
        exercise_id: &str,
        record_type: &str,
        value: f64,
    ) -> Result<PersonalRecord> {
        let pool = self.pool.clone();
        let id = Uuid::new_v4().to_string();
        let user_id = user_id.to_string();
        let exercise_id = exercise_id.to_string();
        let record_type = record_type.to_string();
        let now = Utc::now();

        let record = PersonalRecord {
            id,
            user_id,
            exercise_id,
            record_type,
            value,
            achieved_at: now,
        };
        let record_clone = record.clone();

        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO personal_records (id, user_id, exercise_id, record_type, value, achieved_at)
                 VALUES (?, ?, ?, ?, ?, ?)
                 ON CONFLICT(user_id, exercise_id, record_type)
                 DO UPDATE SET value = excluded.value, achieved_at = excluded.achieved_at",
                rusqlite::params![
                    record_clone.id,
                    record_clone.user_id,
                    record_clone.exercise_id,
                    record_clone.record_type,
                    record_clone.value,
                    record_clone.achieved_at
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        Ok(record)
    }

    pub async fn find_prs_by_user(&self, user_id: &str) -> Result<Vec<PersonalRecordWithExercise>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT pr.id, pr.user_id, pr.exercise_id, e.name AS exercise_name,
                        pr.record_type, pr.value, pr.achieved_at
                 FROM personal_records pr
                 JOIN exercises e ON pr.exercise_id = e.id
                 WHERE pr.user_id = ?
                 ORDER BY pr.achieved_at DESC",
            )?;
            let prs = stmt
                .query_map([&user_id], PersonalRecordWithExercise::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(prs)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_prs_by_exercise(
        &self,
        user_id: &str,
        exercise_id: &str,
    ) -> Result<Vec<PersonalRecord>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let exercise_id = exercise_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM personal_records
                 WHERE user_id = ? AND exercise_id = ?
                 ORDER BY record_type",
            )?;
            let prs = stmt
                .query_map(
                    rusqlite::params![user_id, exercise_id],
                    PersonalRecord::from_row,
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(prs)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    // Statistics

    pub async fn count_workouts_since(&self, user_id: &str, days: i64) -> Result<i64> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let window = format!("-{} days", days);
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM workouts WHERE user_id = ? AND date >= date('now', ?)",
                rusqlite::params![user_id, window],
                |row| row.get(0),
            )?;
            Ok(count)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn total_volume_since(&self, user_id: &str, days: i64) -> Result<f64> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let window = format!("-{} days", days);
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let volume: Option<f64> = conn.query_row(
                "SELECT SUM(s.weight * s.reps)
                 FROM sets s
                 JOIN workout_exercises we ON s.workout_exercise_id = we.id
                 JOIN workouts w ON we.workout_id = w.id
                 WHERE w.user_id = ? AND w.date >= date('now', ?)",
                rusqlite::params![user_id, window],
                |row| row.get(0),
            )?;
            Ok(volume.unwrap_or(0.0))
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Set rows for one exercise within the window, for chart aggregation.
    pub async fn find_exercise_samples_since(
        &self,
        user_id: &str,
        exercise_id: &str,
        days: i64,
    ) -> Result<Vec<SetSample>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let exercise_id = exercise_id.to_string();
        let window = format!("-{} days", days);
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT w.date, s.reps, s.weight
                 FROM sets s
                 JOIN workout_exercises we ON s.workout_exercise_id = we.id
                 JOIN workouts w ON we.workout_id = w.id
                 WHERE w.user_id = ? AND we.exercise_id = ? AND w.date >= date('now', ?)
                 ORDER BY w.date",
            )?;
            let samples = stmt
                .query_map(
                    rusqlite::params![user_id, exercise_id, window],
                    |row| {
                        Ok(SetSample {
                            date: row.get(0)?,
                            reps: row.get(1)?,
                            weight: row.get(2)?,
                        })
                    },
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(samples)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
