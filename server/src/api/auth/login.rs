use crate::api::error::ApiError;
use crate::api::extract::ApiJson;
use crate::api::ErrorResponse;
use crate::auth::{create_session, verify_password};
use crate::db::DbPool;
use crate::models::User;
use crate::schema::users;
use axum::{extract::State, Json};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

const BAD_CREDENTIALS: &str = "Unable to log in with provided credentials";

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub auth_token: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/token/login",
    tag = "auth",
    request_body(content = LoginRequest, example = json!({"email": "cook@example.com", "password": "correct-horse"})),
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(pool): State<Arc<DbPool>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let mut conn = pool.get()?;

    let user: Option<User> = users::table
        .filter(users::email.eq(req.email.trim().to_lowercase()))
        .select(User::as_select())
        .first(&mut conn)
        .optional()?;

    let Some(user) = user.filter(|u| verify_password(&req.password, &u.password_hash)) else {
        return Err(ApiError::Conflict(BAD_CREDENTIALS.to_string()));
    };

    let auth_token = create_session(&mut conn, user.id)?;
    tracing::info!(user_id = %user.id, "token issued");

    Ok(Json(LoginResponse { auth_token }))
}
