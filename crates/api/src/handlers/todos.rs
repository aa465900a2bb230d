//! Handlers for the `/todos` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use minfo_core::error::CoreError;
use minfo_core::todo::{validate_description, validate_title};
use minfo_core::types::DbId;
use minfo_db::models::todo::{CreateTodo, Todo, UpdateTodo};
use minfo_db::repositories::TodoRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters for listing todos.
#[derive(Debug, Deserialize)]
pub struct ListTodosParams {
    pub done: Option<bool>,
}

/// Response body for a successful delete.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
    pub id: DbId,
}

/// POST /todos
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateTodo>,
) -> AppResult<(StatusCode, Json<Todo>)> {
    validate_title(&input.title).map_err(CoreError::Validation)?;
    if let Some(description) = &input.description {
        validate_description(description).map_err(CoreError::Validation)?;
    }

    let todo = TodoRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// GET /todos?done=bool
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListTodosParams>,
) -> AppResult<Json<Vec<Todo>>> {
    let todos = TodoRepo::list(&state.pool, params.done).await?;
    Ok(Json(todos))
}

/// GET /todos/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Todo>> {
    let todo = TodoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Todo", id }))?;
    Ok(Json(todo))
}

/// PATCH /todos/{id}
///
/// Supplied fields are validated like on create; an empty body is a
/// plain read of the current row.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTodo>,
) -> AppResult<Json<Todo>> {
    if let Some(title) = &input.title {
        validate_title(title).map_err(CoreError::Validation)?;
    }
    if let Some(description) = &input.description {
        validate_description(description).map_err(CoreError::Validation)?;
    }

    let todo = TodoRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Todo", id }))?;
    Ok(Json(todo))
}

/// DELETE /todos/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DeleteResponse>> {
    let deleted = TodoRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(Json(DeleteResponse {
            message: "Todo deleted",
            id,
        }))
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Todo", id }))
    }
}
