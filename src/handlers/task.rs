use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::NoContent,
    Json,
};
use uuid::Uuid;

use crate::{
    errors::AppError,
    http_server::AppState,
    models::task::{Task, TaskId, TaskInput, UpdateTaskInput},
};

pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = state.db.tasks.get_all_tasks().await?;

    Ok(Json(tasks))
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<TaskInput>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let new_task = Task::new(payload)?;
    let task = state.db.tasks.create(&new_task).await?;

    tracing::info!("Created task {}", task.task_id.0);
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<Task>, AppError> {
    let task = state.db.tasks.get_task(TaskId(task_id)).await?;

    match task {
        Some(task) => Ok(Json(task)),
        None => Err(AppError::NotFound(format!("Task not found: {}", task_id))),
    }
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<UpdateTaskInput>,
) -> Result<Json<Task>, AppError> {
    // Validated before the store is touched, so a rejected title leaves the
    // stored task unchanged.
    let title = payload.validated_title()?;
    let task = state
        .db
        .tasks
        .update_task(TaskId(task_id), title, payload.completed)
        .await?;

    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> Result<NoContent, AppError> {
    state.db.tasks.delete_task(TaskId(task_id)).await?;

    tracing::info!("Deleted task {}", task_id);
    Ok(NoContent)
}

pub async fn toggle_complete(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<Task>, AppError> {
    let task = state.db.tasks.toggle_complete(TaskId(task_id)).await?;

    tracing::info!("Task {} completed={}", task.task_id.0, task.completed);
    Ok(Json(task))
}
