//! Persistence port for tasks and its PostgreSQL adapter.
//!
//! The store behaves like a document collection: it assigns ids and
//! timestamps with its own clock, and hands documents back in raw form so the
//! caller can normalize them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{types::Json, PgPool};
use thiserror::Error;
use uuid::Uuid;

use super::filter::TaskQuery;
use super::model::{NewTaskDocument, RawTimestamp, TaskDocument, TaskPatch};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task store request failed: {0}")]
    Backend(#[from] sqlx::Error),
    #[error("task {0} does not exist")]
    Missing(Uuid),
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Short name of the backing store, reported by the health endpoint.
    fn backend(&self) -> &'static str;

    /// Persist a new document with `completed = false` and return its id.
    async fn insert(&self, doc: NewTaskDocument) -> Result<Uuid, StoreError>;

    async fn fetch(&self, query: &TaskQuery) -> Result<Vec<TaskDocument>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<TaskDocument>, StoreError>;

    /// Apply the provided fields and refresh `updated_at`. Fails with
    /// [`StoreError::Missing`] when no document has this id.
    async fn update(&self, id: Uuid, patch: TaskPatch) -> Result<(), StoreError>;

    /// Hard delete. Removing an id that does not exist is not an error.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: Uuid,
    title: Option<String>,
    description: Option<String>,
    due_date: Option<Json<Value>>,
    priority: Option<String>,
    completed: Option<bool>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<TaskRow> for TaskDocument {
    fn from(row: TaskRow) -> Self {
        TaskDocument {
            id: row.id,
            title: row.title,
            description: row.description,
            due_date: row.due_date.and_then(|Json(v)| RawTimestamp::from_json(&v)),
            priority: row.priority,
            completed: row.completed,
            created_at: row.created_at.map(RawTimestamp::Native),
            updated_at: row.updated_at.map(RawTimestamp::Native),
        }
    }
}

const SELECT_TASKS: &str = "SELECT id, title, description, due_date, priority, completed, created_at, updated_at FROM tasks";

#[async_trait]
impl TaskStore for PgTaskStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn insert(&self, doc: NewTaskDocument) -> Result<Uuid, StoreError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO tasks (id, title, title_lower, title_words, description, due_date, priority, completed, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE, NOW(), NOW())
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&doc.title.display)
        .bind(&doc.title.lowercase)
        .bind(&doc.title.words)
        .bind(&doc.description)
        .bind(Json(doc.due_date))
        .bind(doc.priority.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn fetch(&self, query: &TaskQuery) -> Result<Vec<TaskDocument>, StoreError> {
        let rows = match query {
            TaskQuery::TitlePrefix { start, end } => {
                // Byte-wise collation keeps the sentinel above every other character.
                let sql = format!(
                    r#"{SELECT_TASKS} WHERE title_lower COLLATE "C" >= $1 AND title_lower COLLATE "C" < $2"#
                );
                sqlx::query_as::<_, TaskRow>(&sql)
                    .bind(start)
                    .bind(end)
                    .fetch_all(&self.pool)
                    .await?
            }
            TaskQuery::PriorityEquals(priority) => {
                let sql = format!("{SELECT_TASKS} WHERE priority = $1");
                sqlx::query_as::<_, TaskRow>(&sql)
                    .bind(priority.as_str())
                    .fetch_all(&self.pool)
                    .await?
            }
            TaskQuery::NewestFirst => {
                let sql = format!("{SELECT_TASKS} ORDER BY created_at DESC");
                sqlx::query_as::<_, TaskRow>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows.into_iter().map(TaskDocument::from).collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<TaskDocument>, StoreError> {
        let sql = format!("{SELECT_TASKS} WHERE id = $1");
        let row = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(TaskDocument::from))
    }

    // Callers see millisecond timestamps, so each update moves `updated_at`
    // forward by at least one millisecond even within the same clock tick.
    async fn update(&self, id: Uuid, patch: TaskPatch) -> Result<(), StoreError> {
        let (title, title_lower, title_words) = match patch.title {
            Some(t) => (Some(t.display), Some(t.lowercase), Some(t.words)),
            None => (None, None, None),
        };

        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET
                title = COALESCE($2, title),
                title_lower = COALESCE($3, title_lower),
                title_words = COALESCE($4, title_words),
                description = COALESCE($5, description),
                due_date = COALESCE($6, due_date),
                priority = COALESCE($7, priority),
                completed = COALESCE($8, completed),
                updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 millisecond')
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(title_lower)
        .bind(title_words)
        .bind(patch.description)
        .bind(patch.due_date.map(Json))
        .bind(patch.priority.map(|p| p.as_str()))
        .bind(patch.completed)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Missing(id));
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            DELETE FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
