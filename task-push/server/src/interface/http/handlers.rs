//! 路由处理函数

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde_json::json;

use super::{ApiError, ApiState};
use crate::application::commands::{AddTaskCommand, RemoveTaskCommand, SubscribeCommand};
use crate::application::queries::{ListTasksQuery, PlanScheduleQuery};
use crate::domain::model::{PushSubscription, Task};

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn list_tasks(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let tasks = state.query_handler.handle_list_tasks(ListTasksQuery).await?;
    Ok((StatusCode::OK, Json(json!({ "tasks": tasks }))))
}

pub async fn add_task(
    State(state): State<ApiState>,
    Json(task): Json<Task>,
) -> Result<impl IntoResponse, ApiError> {
    let broadcast = state
        .command_handler
        .handle_add_task(AddTaskCommand { task })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "added", "broadcast": broadcast })),
    ))
}

/// 下标越界返回 404，不修改任务列表
pub async fn remove_task(
    State(state): State<ApiState>,
    Path(index): Path<usize>,
) -> Result<impl IntoResponse, ApiError> {
    let removed = state
        .command_handler
        .handle_remove_task(RemoveTaskCommand { index })
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No task at index {}", index)))?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "status": "removed",
            "task": removed.task,
            "broadcast": removed.broadcast,
        })),
    ))
}

/// 重复订阅同样返回 201
pub async fn subscribe(
    State(state): State<ApiState>,
    Json(subscription): Json<PushSubscription>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .command_handler
        .handle_subscribe(SubscribeCommand { subscription })
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "status": "subscribed" }))))
}

pub async fn vapid_public_key(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let key = state
        .vapid_public_key
        .ok_or_else(|| ApiError::NotFound("VAPID public key is not configured".to_string()))?;
    Ok((StatusCode::OK, Json(json!({ "public_key": key }))))
}

pub async fn plan_schedule(
    State(state): State<ApiState>,
    Query(query): Query<PlanScheduleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let plan = state.query_handler.handle_plan_schedule(query).await?;
    Ok((StatusCode::OK, Json(plan)))
}
