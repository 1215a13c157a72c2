use crate::api::error::ApiError;
use crate::api::extract::ApiPath;
use crate::api::ErrorResponse;
use crate::auth::{AuthUser, MaybeAuthUser};
use crate::config::Config;
use crate::db::DbPool;
use axum::{extract::State, Json};
use std::sync::Arc;
use uuid::Uuid;

use super::view::{find_user, user_response, UserResponse};

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user(
    viewer: MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let mut conn = pool.get()?;
    let user = find_user(&mut conn, id)?;
    Ok(Json(user_response(&mut conn, &config, viewer.id(), user)?))
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "users",
    responses(
        (status = 200, description = "The requester's profile", body = UserResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(
    AuthUser(user): AuthUser,
    State(config): State<Arc<Config>>,
) -> Json<UserResponse> {
    Json(UserResponse::new(&config, user, false))
}
