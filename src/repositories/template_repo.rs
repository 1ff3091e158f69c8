use chrono::Utc;
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{CreateTemplateEntry, FromSqliteRow, TemplateExerciseWithName, WorkoutTemplate};

#[derive(Clone)]
pub struct TemplateRepository {
    pool: DbPool,
}

impl TemplateRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a template together with its exercise entries in one transaction.
    pub async fn create(
        &self,
        user_id: &str,
        name: &str,
        notes: Option<&str>,
        entries: Vec<CreateTemplateEntry>,
    ) -> Result<WorkoutTemplate> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let template = WorkoutTemplate {
            id,
            user_id: user_id.to_string(),
            name: name.to_string(),
            notes: notes.map(|s| s.to_string()),
            created_at: now,
        };
        let template_clone = template.clone();

        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            tx.execute(
                "INSERT INTO workout_templates (id, user_id, name, notes, created_at)
                 VALUES (?, ?, ?, ?, ?)",
                rusqlite::params![
                    template_clone.id,
                    template_clone.user_id,
                    template_clone.name,
                    template_clone.notes,
                    template_clone.created_at
                ],
            )?;

            insert_entries(&tx, &template_clone.id, &entries)?;

            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        Ok(template)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<WorkoutTemplate>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM workout_templates WHERE id = ?")?;
            let result = stmt.query_row([&id], WorkoutTemplate::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_all_by_user(&self, user_id: &str) -> Result<Vec<WorkoutTemplate>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM workout_templates WHERE user_id = ? ORDER BY created_at DESC",
            )?;
            let templates = stmt
                .query_map([&user_id], WorkoutTemplate::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(templates)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_entries_with_names(
        &self,
        template_id: &str,
    ) -> Result<Vec<TemplateExerciseWithName>> {
        let pool = self.pool.clone();
        let template_id = template_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT te.id, te.template_id, te.exercise_id, e.name AS exercise_name,
                        te.position, te.target_sets, te.target_reps
                 FROM template_exercises te
                 JOIN exercises e ON te.exercise_id = e.id
                 WHERE te.template_id = ?
                 ORDER BY te.position",
            )?;
            let entries = stmt
                .query_map([&template_id], TemplateExerciseWithName::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(entries)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Replace a template's name, notes and full entry list atomically.
    pub async fn update(
        &self,
        id: &str,
        user_id: &str,
        name: &str,
        notes: Option<&str>,
        entries: Vec<CreateTemplateEntry>,
    ) -> Result<bool> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let user_id = user_id.to_string();
        let name = name.to_string();
        let notes = notes.map(|s| s.to_string());
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            let rows = tx.execute(
                "UPDATE workout_templates SET name = ?, notes = ? WHERE id = ? AND user_id = ?",
                rusqlite::params![name, notes, id, user_id],
            )?;
            if rows == 0 {
                return Ok(false);
            }

            tx.execute(
                "DELETE FROM template_exercises WHERE template_id = ?",
                [&id],
            )?;
            insert_entries(&tx, &id, &entries)?;

            tx.commit()?;
            Ok(true)
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
                "DELETE FROM workout_templates WHERE id = ? AND user_id = ?",
                rusqlite::params![id, user_id],
            )?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

fn insert_entries(
    tx: &rusqlite::Transaction<'_>,
    template_id: &str,
    entries: &[CreateTemplateEntry],
) -> Result<()> {
    for (index, entry) in entries.iter().enumerate() {
        tx.execute(
            "INSERT INTO template_exercises
             (id, template_id, exercise_id, position, target_sets, target_reps)
             VALUES (?, ?, ?, ?, ?, ?)",
            rusqlite::params![
                Uuid::new_v4().to_string(),
                template_id,
                entry.exercise_id,
                index as i32 + 1,
                entry.target_sets,
                entry.target_reps
            ],
        )?;
    }
    Ok(())
}
