//! Task repository backed by Postgres.
//!
//! Every operation acquires one pooled connection for its own duration; the
//! connection goes back to the pool when it is dropped, on every exit path.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::{
    models::TaskRow,
    store::{Created, TaskStore},
    DbError,
};

/// [`TaskStore`] over the `tasks` table.
#[derive(Debug, Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    /// Insert-or-fetch.
    ///
    /// `ON CONFLICT DO NOTHING` leans on the `(repository, name)` unique
    /// constraint, so two racing creates end with one row and one `Existing`.
    async fn create_unique(
        &self,
        repository: &str,
        name: &str,
    ) -> Result<(TaskRow, Created), DbError> {
        let mut conn = self.pool.acquire().await?;

        let inserted = sqlx::query_as::<_, TaskRow>(
            r#"
            INSERT INTO tasks (id, repository, name, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (repository, name) DO NOTHING
            RETURNING id, repository, name, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(repository)
        .bind(name)
        .bind(Utc::now())
        .fetch_optional(&mut *conn)
        .await?;

        if let Some(row) = inserted {
            debug!(task_id = %row.id, "inserted task");
            return Ok((row, Created::New));
        }

        let existing = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, repository, name, created_at
            FROM tasks
            WHERE repository = $1 AND name = $2
            "#,
        )
        .bind(repository)
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| DbError::ConflictingRowMissing {
            repository: repository.to_string(),
            name: name.to_string(),
        })?;

        Ok((existing, Created::Existing))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TaskRow>, DbError> {
        let mut conn = self.pool.acquire().await?;

        let row = sqlx::query_as::<_, TaskRow>(
            r#"SELECT id, repository, name, created_at FROM tasks WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row)
    }

    async fn find_all(&self) -> Result<Vec<TaskRow>, DbError> {
        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query_as::<_, TaskRow>(
            r#"SELECT id, repository, name, created_at FROM tasks ORDER BY created_at ASC"#,
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows)
    }
}
