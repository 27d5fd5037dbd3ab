//! /todos のリクエストハンドラ
//!
//! 入力の形式チェックはすべてここで行い、通過したものだけをサービスへ渡します。
//! 応答は 1 つの `Response` 値として組み立てるため、ステータスは必ず 1 回だけ書かれます。

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use domain::{
    CreateTodoRequest, CreateTodoResponse, DeleteTodoRequest, DeleteTodoResponse, ReadTodoRequest,
    ReadTodoResponse, TodoError, UpdateTodoRequest, UpdateTodoResponse,
};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, AppState};

/// GET /todos のクエリ文字列（空文字は未指定と同じ扱い）
#[derive(Debug, Default, Deserialize)]
pub struct ReadTodoQuery {
    prev_id: Option<String>,
    size: Option<String>,
}

impl ReadTodoQuery {
    fn parse(&self) -> Result<ReadTodoRequest, TodoError> {
        Ok(ReadTodoRequest {
            prev_id: parse_non_negative("prev_id", self.prev_id.as_deref())?,
            size: parse_non_negative("size", self.size.as_deref())?,
        })
    }
}

#[derive(Debug, Serialize)]
struct HealthBody {
    message: &'static str,
}

pub async fn health() -> Result<Response, ApiError> {
    json_response(&HealthBody { message: "OK" })
}

pub async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload.map_err(invalid_body)?;
    req.validate()?;

    let todo = state.todos.create_todo(&req.subject, &req.description).await?;
    json_response(&CreateTodoResponse { todo })
}

pub async fn read_todos(
    State(state): State<AppState>,
    query: Result<Query<ReadTodoQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query
        .map_err(|e| TodoError::Validation(format!("invalid query: {e}")))?;
    let req = query.parse()?;

    let todos = state.todos.read_todos(req.prev_id, req.size).await?;
    json_response(&ReadTodoResponse { todos })
}

pub async fn update_todo(
    State(state): State<AppState>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload.map_err(invalid_body)?;
    req.validate()?;

    let todo = state
        .todos
        .update_todo(req.id, &req.subject, &req.description)
        .await?;
    json_response(&UpdateTodoResponse { todo })
}

pub async fn delete_todos(
    State(state): State<AppState>,
    payload: Result<Json<DeleteTodoRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload.map_err(invalid_body)?;
    req.validate()?;

    state.todos.delete_todos(&req.ids).await?;
    json_response(&DeleteTodoResponse {})
}

pub async fn method_not_supported() -> ApiError {
    ApiError::MethodNotSupported
}

fn json_response<T: Serialize>(body: &T) -> Result<Response, ApiError> {
    let json = serde_json::to_vec(body)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], json).into_response())
}

fn invalid_body(rejection: JsonRejection) -> TodoError {
    TodoError::Validation(format!("invalid body: {}", rejection.body_text()))
}

fn parse_non_negative(name: &str, raw: Option<&str>) -> Result<i64, TodoError> {
    match raw {
        None | Some("") => Ok(0),
        Some(s) => s
            .parse::<i64>()
            .ok()
            .filter(|n| *n >= 0)
            .ok_or_else(|| TodoError::Validation(format!("{name} must be a non-negative integer: {s}"))),
    }
}
