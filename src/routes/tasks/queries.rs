use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use super::dto::{CreateTask, UpdateTask};
use super::filter::{build_query, FilterParams};
use super::model::Task;
use super::normalize::normalize_document;
use super::store::{StoreError, TaskStore};

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, TaskError>;

/// Persists a new task. The returned task carries local timestamps so it can
/// be shown right away; the stored copy has the store's own.
pub async fn create_task(store: &dyn TaskStore, input: CreateTask) -> Result<Task> {
    let doc = input.into_document().map_err(TaskError::Invalid)?;
    let now = Utc::now().timestamp_millis();

    let title = doc.title.display.clone();
    let description = doc.description.clone();
    let due_date = doc.due_date;
    let priority = doc.priority;

    let id = store.insert(doc).await?;
    tracing::info!(%id, %priority, "task created");

    Ok(Task {
        id,
        title,
        description,
        due_date,
        priority,
        completed: false,
        created_at: now,
        updated_at: now,
    })
}

pub async fn list_tasks(store: &dyn TaskStore, filters: &FilterParams) -> Result<Vec<Task>> {
    let query = build_query(filters);
    tracing::debug!(?query, "listing tasks");

    let docs = store.fetch(&query).await?;
    Ok(docs.into_iter().map(normalize_document).collect())
}

pub async fn get_task(store: &dyn TaskStore, id: Uuid) -> Result<Option<Task>> {
    let doc = store.get(id).await?;
    Ok(doc.map(normalize_document))
}

pub async fn update_task(store: &dyn TaskStore, id: Uuid, input: UpdateTask) -> Result<()> {
    let patch = input.into_patch().map_err(TaskError::Invalid)?;
    store.update(id, patch).await?;
    tracing::info!(%id, "task updated");

    Ok(())
}

pub async fn delete_task(store: &dyn TaskStore, id: Uuid) -> Result<()> {
    store.delete(id).await?;
    tracing::info!(%id, "task deleted");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::tasks::filter::PriorityFilter;
    use crate::routes::tasks::memory::MemoryTaskStore;
    use crate::routes::tasks::model::{Priority, TaskDocument};

    fn create_input(title: &str, priority: Priority) -> CreateTask {
        CreateTask {
            title: title.into(),
            description: "desc".into(),
            due_date: 1_800_000_000_000,
            priority,
        }
    }

    #[tokio::test]
    async fn create_trims_title_and_stores_search_field() {
        let store = MemoryTaskStore::new();
        let before = Utc::now().timestamp_millis();

        let task = create_task(&store, create_input("  Buy milk  ", Priority::Urgent))
            .await
            .unwrap();
        assert_eq!(task.title, "Buy milk");
        assert!(!task.completed);
        assert!(task.created_at >= before);
        assert_eq!(task.created_at, task.updated_at);

        let found = list_tasks(
            &store,
            &FilterParams {
                search_query: Some("BUY M".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Buy milk");
        assert_eq!(store.title_words(task.id).await.unwrap(), vec!["buy", "milk"]);
    }

    #[tokio::test]
    async fn invalid_create_never_reaches_store() {
        let store = MemoryTaskStore::new();
        let err = create_task(&store, create_input("  ", Priority::Normal))
            .await
            .unwrap_err();
        assert!(matches!(err, TaskError::Invalid(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn update_title_recomputes_search_fields_and_bumps_updated_at() {
        let store = MemoryTaskStore::new();
        let created = create_task(&store, create_input("Old title", Priority::Normal))
            .await
            .unwrap();
        let before = get_task(&store, created.id).await.unwrap().unwrap();

        update_task(
            &store,
            created.id,
            UpdateTask {
                title: Some("New Title".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let after = get_task(&store, created.id).await.unwrap().unwrap();
        assert_eq!(after.title, "New Title");
        assert_eq!(after.description, "desc");
        assert!(after.updated_at > before.updated_at);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(store.title_words(created.id).await.unwrap(), vec!["new", "title"]);

        let hits = list_tasks(
            &store,
            &FilterParams {
                search_query: Some("new title".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn completing_a_task_patches_only_that_field() {
        let store = MemoryTaskStore::new();
        let created = create_task(&store, create_input("Water plants", Priority::Medium))
            .await
            .unwrap();

        update_task(
            &store,
            created.id,
            UpdateTask {
                completed: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let task = get_task(&store, created.id).await.unwrap().unwrap();
        assert!(task.completed);
        assert_eq!(task.title, "Water plants");
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.due_date, 1_800_000_000_000);
    }

    #[tokio::test]
    async fn updating_missing_task_surfaces_store_failure() {
        let store = MemoryTaskStore::new();
        let err = update_task(&store, Uuid::new_v4(), UpdateTask::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TaskError::Store(StoreError::Missing(_))));
    }

    #[tokio::test]
    async fn search_and_priority_cannot_be_combined() {
        let store = MemoryTaskStore::new();
        create_task(&store, create_input("Buy milk", Priority::Normal))
            .await
            .unwrap();
        create_task(&store, create_input("Buy tickets", Priority::Urgent))
            .await
            .unwrap();

        let tasks = list_tasks(
            &store,
            &FilterParams {
                priority: Some(PriorityFilter::Urgent),
                search_query: Some("buy".into()),
            },
        )
        .await
        .unwrap();

        // The priority selector is dropped once a search query is present.
        assert_eq!(tasks.len(), 2);
    }

    #[tokio::test]
    async fn list_normalizes_legacy_documents() {
        let store = MemoryTaskStore::new();
        store
            .import(TaskDocument {
                id: Uuid::new_v4(),
                title: Some("Legacy".into()),
                priority: Some(" HIGH".into()),
                due_date: None,
                ..Default::default()
            })
            .await;

        let before = Utc::now().timestamp_millis();
        let tasks = list_tasks(&store, &FilterParams::default()).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].priority, Priority::Urgent);
        assert!(tasks[0].due_date >= before);
        assert_eq!(tasks[0].description, "");
    }

    #[tokio::test]
    async fn delete_removes_task() {
        let store = MemoryTaskStore::new();
        let created = create_task(&store, create_input("Temp", Priority::Normal))
            .await
            .unwrap();

        delete_task(&store, created.id).await.unwrap();
        assert_eq!(get_task(&store, created.id).await.unwrap(), None);
    }
}
