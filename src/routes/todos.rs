use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use chrono::NaiveDate;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::{
        dao::TodoFields,
        entities::todo::{self, TodoPriority, TodoStatus},
    },
    deserializers::{blank_as_none, blank_or_date},
    error::AppError,
    response::{ApiResponse, ApiResult, MessageBody},
    services::ServiceContext,
    state::AppState,
};

/// Body of both create and update. Updates replace every field.
#[derive(Debug, Deserialize)]
pub struct TodoRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "blank_or_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub category_id: Option<Uuid>,
}

impl TodoRequest {
    fn into_fields(self) -> Result<TodoFields, AppError> {
        Ok(TodoFields {
            title: normalize_title(&self.title)?,
            description: self.description,
            due_date: self.due_date,
            priority: parse_choice(self.priority.as_deref(), "priority", &TodoPriority::ALL)?,
            status: parse_choice(self.status.as_deref(), "status", &TodoStatus::ALL)?,
            category_id: self.category_id,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: String,
    pub status: String,
    pub category_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<todo::Model> for TodoResponse {
    fn from(model: todo::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            due_date: model.due_date,
            priority: model.priority,
            status: model.status,
            category_id: model.category_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .with_state(state)
}

async fn list_todos(State(state): State<Arc<AppState>>) -> ApiResult<Vec<TodoResponse>> {
    let todos = ServiceContext::from_state(&state).todo().list().await?;
    ApiResponse::ok(todos.into_iter().map(TodoResponse::from).collect())
}

async fn get_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<TodoResponse> {
    let todo = ServiceContext::from_state(&state).todo().get(id).await?;
    ApiResponse::ok(todo.into())
}

async fn create_todo(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TodoRequest>,
) -> ApiResult<TodoResponse> {
    let fields = body.into_fields()?;
    let todo = ServiceContext::from_state(&state).todo().create(fields).await?;
    ApiResponse::created(todo.into())
}

async fn update_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<TodoRequest>,
) -> ApiResult<TodoResponse> {
    let fields = body.into_fields()?;
    let todo = ServiceContext::from_state(&state)
        .todo()
        .replace(id, fields)
        .await?;
    ApiResponse::ok(todo.into())
}

async fn delete_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<MessageBody> {
    ServiceContext::from_state(&state).todo().delete(id).await?;
    ApiResponse::ok(MessageBody::new("Todo deleted successfully"))
}

fn normalize_title(title: &str) -> Result<String, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::bad_request("Title is required"));
    }
    Ok(title.to_string())
}

// absent or blank picks the default, anything else must name a variant
fn parse_choice<T>(raw: Option<&str>, field: &str, allowed: &[T]) -> Result<T, AppError>
where
    T: Copy + Default + std::fmt::Display + for<'a> TryFrom<&'a str>,
{
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Ok(T::default());
    }
    T::try_from(raw).map_err(|_| {
        let expected = allowed
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        AppError::bad_request(format!("Invalid {field} '{raw}'. Expected one of: {expected}"))
    })
}
