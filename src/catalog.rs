// src/catalog.rs

use std::{str::FromStr, time::Duration};

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        exam::Exam,
        question::{NewQuestion, Question, QuestionRow},
    },
    utils::time::now_millis,
};

/// Durable store for exams and their questions.
#[derive(Clone, Debug)]
pub struct Catalog {
    pool: SqlitePool,
}

impl Catalog {
    /// Opens (creating if missing) the database at `database_url` and applies migrations.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to `sqlite::memory:` is its own database, so pin one.
        let in_memory = database_url.contains(":memory:");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };
        let pool = pool_options.connect_with(options).await?;

        Self::from_pool(pool).await
    }

    pub async fn in_memory() -> Result<Self, AppError> {
        Self::connect("sqlite::memory:", 1).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, AppError> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Persists an exam and all of its questions in one transaction.
    ///
    /// Questions get fresh ids and `order` equal to their input position.
    pub async fn create_exam(
        &self,
        name: &str,
        file_name: &str,
        questions: &[NewQuestion],
    ) -> Result<Exam, AppError> {
        if questions.is_empty() {
            return Err(AppError::Validation(
                "an exam needs at least one question".to_string(),
            ));
        }

        let now = now_millis();
        let exam = Exam {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            file_name: file_name.to_string(),
            created_at: now,
            updated_at: now,
            question_count: questions.len() as i64,
        };

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO exams (id, name, file_name, created_at, updated_at, question_count)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&exam.id)
        .bind(&exam.name)
        .bind(&exam.file_name)
        .bind(exam.created_at)
        .bind(exam.updated_at)
        .bind(exam.question_count)
        .execute(&mut *tx)
        .await?;

        for (position, question) in questions.iter().enumerate() {
            let options = serde_json::to_string(&question.options)
                .map_err(|e| AppError::Storage(e.to_string()))?;

            sqlx::query(
                r#"
                INSERT INTO questions (id, exam_id, position, category, drug, stem, options, answer_index)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&exam.id)
            .bind(position as i64)
            .bind(&question.category)
            .bind(&question.drug)
            .bind(&question.stem)
            .bind(options)
            .bind(i64::from(question.answer_index))
            .execute(&mut *tx)
            .await?;
        }

        // Dropping `tx` on any `?` above rolls the whole import back.
        tx.commit().await?;

        tracing::info!(
            "Imported exam {} ({}) with {} questions",
            exam.id,
            exam.name,
            exam.question_count
        );
        Ok(exam)
    }

    pub async fn get_exam(&self, id: &str) -> Result<Option<Exam>, AppError> {
        let exam = sqlx::query_as::<_, Exam>(
            r#"
            SELECT id, name, file_name, created_at, updated_at, question_count
            FROM exams
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(exam)
    }

    /// Newest first.
    pub async fn list_exams(&self) -> Result<Vec<Exam>, AppError> {
        let exams = sqlx::query_as::<_, Exam>(
            r#"
            SELECT id, name, file_name, created_at, updated_at, question_count
            FROM exams
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(exams)
    }

    /// Returns the updated exam, or `None` when no exam has that id.
    pub async fn rename_exam(&self, id: &str, name: &str) -> Result<Option<Exam>, AppError> {
        let result = sqlx::query("UPDATE exams SET name = ?, updated_at = ? WHERE id = ?")
            .bind(name)
            .bind(now_millis())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_exam(id).await
    }

    /// Removes the exam and every question it owns in one transaction.
    /// Returns `false` when the exam did not exist.
    pub async fn delete_exam(&self, id: &str) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let questions = sqlx::query("DELETE FROM questions WHERE exam_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let exams = sqlx::query("DELETE FROM exams WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        if exams > 0 {
            tracing::info!("Deleted exam {} and {} questions", id, questions);
        }
        Ok(exams > 0)
    }

    /// Questions of an exam sorted by `order`. Session indices point into this sequence.
    pub async fn get_questions(&self, exam_id: &str) -> Result<Vec<Question>, AppError> {
        let rows = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT id, exam_id, position, category, drug, stem, options, answer_index
            FROM questions
            WHERE exam_id = ?
            ORDER BY position ASC
            "#,
        )
        .bind(exam_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| Question::try_from(row).map_err(AppError::Storage))
            .collect()
    }

    pub async fn question_count(&self, exam_id: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions WHERE exam_id = ?")
            .bind(exam_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
