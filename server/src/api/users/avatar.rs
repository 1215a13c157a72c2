use crate::api::error::{ApiError, ValidationErrorResponse};
use crate::api::extract::ApiJson;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::config::Config;
use crate::db::DbPool;
use crate::photos::{decode_field, delete_photo, insert_photo};
use crate::schema::users;
use axum::{extract::State, http::StatusCode, Json};
use diesel::prelude::*;
use foodgram_core::validation::REQUIRED;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AvatarRequest {
    /// Image as a `data:<mime>;base64,<payload>` URI
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AvatarResponse {
    pub avatar: String,
}

#[utoipa::path(
    put,
    path = "/api/users/me/avatar",
    tag = "users",
    request_body = AvatarRequest,
    responses(
        (status = 200, description = "Avatar replaced", body = AvatarResponse),
        (status = 400, description = "Missing or invalid image", body = ValidationErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn put_avatar(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    ApiJson(req): ApiJson<AvatarRequest>,
) -> Result<Json<AvatarResponse>, ApiError> {
    let raw = req
        .avatar
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ApiError::field("avatar", REQUIRED))?;
    let image = decode_field("avatar", raw)?;

    let mut conn = pool.get()?;
    let photo_id = conn.transaction::<Uuid, ApiError, _>(|conn| {
        let photo_id = insert_photo(conn, user.id, &image)?;
        set_avatar(conn, user.id, Some(photo_id))?;
        if let Some(old) = user.avatar_id {
            delete_photo(conn, old)?;
        }
        Ok(photo_id)
    })?;

    Ok(Json(AvatarResponse {
        avatar: config.photo_url(photo_id),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/users/me/avatar",
    tag = "users",
    responses(
        (status = 204, description = "Avatar removed"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_avatar(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Result<StatusCode, ApiError> {
    let mut conn = pool.get()?;
    conn.transaction::<(), ApiError, _>(|conn| {
        set_avatar(conn, user.id, None)?;
        if let Some(old) = user.avatar_id {
            delete_photo(conn, old)?;
        }
        Ok(())
    })?;

    Ok(StatusCode::NO_CONTENT)
}

fn set_avatar(
    conn: &mut PgConnection,
    user_id: Uuid,
    photo_id: Option<Uuid>,
) -> QueryResult<usize> {
    diesel::update(users::table.find(user_id))
        .set(users::avatar_id.eq(photo_id))
        .execute(conn)
}
