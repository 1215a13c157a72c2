use crate::api::error::ApiError;
use crate::api::ErrorResponse;
use crate::auth::{delete_session, token_from_headers, AuthUser};
use crate::db::DbPool;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/auth/token/logout",
    tag = "auth",
    responses(
        (status = 204, description = "Token revoked"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn logout(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    // AuthUser already accepted this header, so a token is present.
    let Ok(Some(token)) = token_from_headers(&headers) else {
        return Err(ApiError::Unauthorized);
    };

    let mut conn = pool.get()?;
    delete_session(&mut conn, token)?;

    tracing::info!(user_id = %user.id, "token revoked");
    Ok(StatusCode::NO_CONTENT)
}
