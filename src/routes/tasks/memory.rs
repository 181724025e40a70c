//! In-process [`TaskStore`] for local runs and tests.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::filter::TaskQuery;
use super::model::{NewTaskDocument, RawTimestamp, TaskDocument, TaskPatch};
use super::store::{StoreError, TaskStore};

#[derive(Debug, Clone)]
struct StoredTask {
    doc: TaskDocument,
    title_lower: String,
    title_words: Vec<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Collection {
    tasks: Vec<StoredTask>,
    last_write: Option<DateTime<Utc>>,
}

impl Collection {
    // Server clock: never hands out the same instant twice.
    fn server_now(&mut self) -> DateTime<Utc> {
        let mut now = Utc::now();
        if let Some(last) = self.last_write {
            if now <= last {
                now = last + Duration::milliseconds(1);
            }
        }
        self.last_write = Some(now);
        now
    }
}

#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    inner: RwLock<Collection>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    /// Stores a document as-is, keeping whatever raw field values it carries.
    /// Search fields are derived from the raw title.
    pub(crate) async fn import(&self, doc: TaskDocument) {
        let mut inner = self.inner.write().await;
        let created_at = inner.server_now();
        let title = super::model::SearchableTitle::new(doc.title.as_deref().unwrap_or_default());

        inner.tasks.push(StoredTask {
            doc,
            title_lower: title.lowercase,
            title_words: title.words,
            created_at,
        });
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.inner.read().await.tasks.len()
    }

    #[cfg(test)]
    pub(crate) async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    #[cfg(test)]
    /// Search tokens currently stored for a task.
    pub(crate) async fn title_words(&self, id: Uuid) -> Option<Vec<String>> {
        let inner = self.inner.read().await;
        inner
            .tasks
            .iter()
            .find(|t| t.doc.id == id)
            .map(|t| t.title_words.clone())
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, doc: NewTaskDocument) -> Result<Uuid, StoreError> {
        let mut inner = self.inner.write().await;
        let now = inner.server_now();
        let id = Uuid::new_v4();

        inner.tasks.push(StoredTask {
            doc: TaskDocument {
                id,
                title: Some(doc.title.display),
                description: Some(doc.description),
                due_date: Some(RawTimestamp::Millis(doc.due_date)),
                priority: Some(doc.priority.as_str().to_string()),
                completed: Some(false),
                created_at: Some(RawTimestamp::Native(now)),
                updated_at: Some(RawTimestamp::Native(now)),
            },
            title_lower: doc.title.lowercase,
            title_words: doc.title.words,
            created_at: now,
        });

        Ok(id)
    }

    async fn fetch(&self, query: &TaskQuery) -> Result<Vec<TaskDocument>, StoreError> {
        let inner = self.inner.read().await;

        let mut matched: Vec<&StoredTask> = match query {
            TaskQuery::TitlePrefix { start, end } => inner
                .tasks
                .iter()
                .filter(|t| t.title_lower.as_str() >= start.as_str() && t.title_lower.as_str() < end.as_str())
                .collect(),
            TaskQuery::PriorityEquals(priority) => inner
                .tasks
                .iter()
                .filter(|t| t.doc.priority.as_deref() == Some(priority.as_str()))
                .collect(),
            TaskQuery::NewestFirst => inner.tasks.iter().collect(),
        };

        if matches!(query, TaskQuery::NewestFirst) {
            matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }

        Ok(matched.into_iter().map(|t| t.doc.clone()).collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<TaskDocument>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.tasks.iter().find(|t| t.doc.id == id).map(|t| t.doc.clone()))
    }

    async fn update(&self, id: Uuid, patch: TaskPatch) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let now = inner.server_now();
        let stored = inner
            .tasks
            .iter_mut()
            .find(|t| t.doc.id == id)
            .ok_or(StoreError::Missing(id))?;

        if let Some(title) = patch.title {
            stored.doc.title = Some(title.display);
            stored.title_lower = title.lowercase;
            stored.title_words = title.words;
        }
        if let Some(description) = patch.description {
            stored.doc.description = Some(description);
        }
        if let Some(due_date) = patch.due_date {
            stored.doc.due_date = Some(RawTimestamp::Millis(due_date));
        }
        if let Some(priority) = patch.priority {
            stored.doc.priority = Some(priority.as_str().to_string());
        }
        if let Some(completed) = patch.completed {
            stored.doc.completed = Some(completed);
        }
        stored.doc.updated_at = Some(RawTimestamp::Native(now));

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.tasks.retain(|t| t.doc.id != id);
        Ok(())
    }
}
