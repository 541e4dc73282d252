use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::entities::user,
    deserializers::blank_as_none,
    error::AppError,
    response::{ApiResponse, ApiResult},
    services::{ServiceContext, user_service::UserProfile},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Same profile fields as registration. A blank or missing password keeps
/// the stored one.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub city: String,
    pub zip_code: String,
    pub username: String,
    pub is_admin: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            city: model.city,
            zip_code: model.zip_code,
            username: model.username,
            is_admin: model.is_admin,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub user: UserResponse,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/users", get(list_users).post(register))
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .with_state(state)
}

async fn list_users(State(state): State<Arc<AppState>>) -> ApiResult<Vec<UserResponse>> {
    let users = ServiceContext::from_state(&state).user().list().await?;
    ApiResponse::ok(users.into_iter().map(UserResponse::from).collect())
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<UserResponse> {
    let user = ServiceContext::from_state(&state).user().get(id).await?;
    ApiResponse::ok(user.into())
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<RegisterResponse> {
    let profile = UserProfile {
        first_name: body.first_name,
        last_name: body.last_name,
        email: body.email,
        city: body.city,
        zip_code: body.zip_code,
        username: body.username,
        is_admin: body.is_admin,
    };
    let user = ServiceContext::from_state(&state)
        .user()
        .register(profile, &body.password)
        .await?;
    ApiResponse::created(RegisterResponse {
        message: "User created successfully",
        user_id: user.id,
    })
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    if body.username.trim().is_empty() || body.password.is_empty() {
        return Err(AppError::bad_request("Username and password are required"));
    }
    let user = ServiceContext::from_state(&state)
        .user()
        .login(&body.username, &body.password)
        .await?;
    ApiResponse::ok(LoginResponse {
        message: "Login successful",
        user: user.into(),
    })
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUserRequest>,
) -> ApiResult<UserResponse> {
    let profile = UserProfile {
        first_name: body.first_name,
        last_name: body.last_name,
        email: body.email,
        city: body.city,
        zip_code: body.zip_code,
        username: body.username,
        is_admin: body.is_admin,
    };
    let user = ServiceContext::from_state(&state)
        .user()
        .update(id, profile, body.password.as_deref())
        .await?;
    ApiResponse::ok(user.into())
}

async fn delete_user(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> ApiResult<()> {
    ServiceContext::from_state(&state).user().delete(id).await?;
    ApiResponse::no_content()
}
