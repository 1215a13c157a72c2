use crate::api::error::{ApiError, ValidationErrorResponse};
use crate::api::extract::ApiJson;
use crate::api::ErrorResponse;
use crate::auth::{hash_password, verify_password, AuthUser};
use crate::db::DbPool;
use crate::schema::users;
use axum::{extract::State, http::StatusCode};
use diesel::prelude::*;
use foodgram_core::{validate_password, FieldErrors};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetPasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[utoipa::path(
    post,
    path = "/api/users/set_password",
    tag = "users",
    request_body = SetPasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Wrong current password or weak new one", body = ValidationErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn set_password(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiJson(req): ApiJson<SetPasswordRequest>,
) -> Result<StatusCode, ApiError> {
    if !verify_password(&req.current_password, &user.password_hash) {
        return Err(ApiError::field("current_password", "Incorrect password"));
    }

    if let Err(errors) = validate_password(&req.new_password) {
        let mut renamed = FieldErrors::new();
        for message in errors.get("password").unwrap_or_default() {
            renamed.add("new_password", message.clone());
        }
        return Err(renamed.into());
    }

    let password_hash = hash_password(&req.new_password)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))?;

    let mut conn = pool.get()?;
    diesel::update(users::table.find(user.id))
        .set(users::password_hash.eq(&password_hash))
        .execute(&mut conn)?;

    tracing::info!(user_id = %user.id, "password changed");
    Ok(StatusCode::NO_CONTENT)
}
