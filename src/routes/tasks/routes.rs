use axum::{Json, extract::{State, Path, Query}, http::StatusCode, response::IntoResponse};
use uuid::Uuid;
use crate::state::AppState;
use super::dto::{CreateTask, UpdateTask};
use super::filter::FilterParams;
use super::queries::{self, TaskError};
use super::store::StoreError;

fn reject(action: &str, err: TaskError) -> (StatusCode, String) {
    match err {
        TaskError::Invalid(message) => (StatusCode::BAD_REQUEST, message),
        TaskError::Store(StoreError::Missing(_)) => {
            (StatusCode::NOT_FOUND, "Task not found".to_string())
        }
        TaskError::Store(e) => {
            tracing::error!(error = %e, "failed to {action} task");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to {action} task"))
        }
    }
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateTask>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let task = queries::create_task(state.tasks.as_ref(), body)
        .await
        .map_err(|e| reject("create", e))?;

    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn list(
    State(state): State<AppState>,
    Query(filters): Query<FilterParams>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let tasks = queries::list_tasks(state.tasks.as_ref(), &filters)
        .await
        .map_err(|e| reject("list", e))?;

    Ok(Json(tasks))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    match queries::get_task(state.tasks.as_ref(), id).await {
        Ok(Some(task)) => Ok(Json(task)),
        Ok(None) => Err((StatusCode::NOT_FOUND, "Task not found".to_string())),
        Err(e) => Err(reject("fetch", e)),
    }
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateTask>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    queries::update_task(state.tasks.as_ref(), id, body)
        .await
        .map_err(|e| reject("update", e))?;

    Ok(Json(serde_json::json!({"updated": true})))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    queries::delete_task(state.tasks.as_ref(), id)
        .await
        .map_err(|e| reject("delete", e))?;

    Ok(Json(serde_json::json!({"deleted": true})))
}
