use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get},
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::entities::category,
    deserializers::blank_as_none,
    error::AppError,
    response::{ApiResponse, ApiResult},
    services::ServiceContext,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub user_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<category::Model> for CategoryResponse {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            user_id: model.user_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/{id}", delete(delete_category))
        .with_state(state)
}

async fn list_categories(State(state): State<Arc<AppState>>) -> ApiResult<Vec<CategoryResponse>> {
    let categories = ServiceContext::from_state(&state).category().list().await?;
    ApiResponse::ok(categories.into_iter().map(CategoryResponse::from).collect())
}

async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateCategoryRequest>,
) -> ApiResult<CategoryResponse> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Name is required"));
    }
    let category = ServiceContext::from_state(&state)
        .category()
        .create(name, body.user_id)
        .await?;
    ApiResponse::created(category.into())
}

async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    ServiceContext::from_state(&state).category().delete(id).await?;
    ApiResponse::no_content()
}
