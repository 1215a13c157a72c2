use crate::api::error::ApiError;
use crate::api::extract::ApiPath;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::config::Config;
use crate::db::DbPool;
use crate::membership::{self, Subscription};
use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use foodgram_core::parse_recipes_limit;
use foodgram_core::query::query_pairs;
use std::sync::Arc;
use uuid::Uuid;

use super::view::{find_user, subscription_responses, SubscriptionResponse};

/// `recipes_limit` from a raw query string.
pub(super) fn recipes_limit(query: Option<&str>) -> Option<usize> {
    let raw = query_pairs(query.unwrap_or(""))
        .into_iter()
        .find(|(key, _)| key == "recipes_limit")
        .map(|(_, value)| value);
    parse_recipes_limit(raw.as_deref())
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/subscribe",
    tag = "users",
    params(
        ("id" = Uuid, Path, description = "Author to follow"),
        ("recipes_limit" = Option<usize>, Query, description = "Maximum recipes to include")
    ),
    responses(
        (status = 201, description = "Subscribed", body = SubscriptionResponse),
        (status = 400, description = "Already subscribed or self-subscription", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn subscribe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    ApiPath(id): ApiPath<Uuid>,
    RawQuery(query): RawQuery,
) -> Result<impl IntoResponse, ApiError> {
    membership::ensure_distinct::<Subscription>(user.id, id)?;

    let mut conn = pool.get()?;
    let author = find_user(&mut conn, id)?;
    membership::add::<Subscription>(&mut conn, user.id, author.id)?;

    tracing::info!(user_id = %user.id, author_id = %author.id, "subscribed");

    let response = subscription_responses(
        &mut conn,
        &config,
        user.id,
        vec![author],
        recipes_limit(query.as_deref()),
    )?
    .pop()
    .ok_or_else(|| ApiError::Internal("subscription vanished while rendering".to_string()))?;

    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}/subscribe",
    tag = "users",
    params(
        ("id" = Uuid, Path, description = "Author to unfollow")
    ),
    responses(
        (status = 204, description = "Unsubscribed"),
        (status = 400, description = "Not subscribed or self-subscription", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn unsubscribe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    membership::ensure_distinct::<Subscription>(user.id, id)?;

    let mut conn = pool.get()?;
    let author = find_user(&mut conn, id)?;
    membership::remove::<Subscription>(&mut conn, user.id, author.id)?;

    tracing::info!(user_id = %user.id, author_id = %author.id, "unsubscribed");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipes_limit_from_query() {
        assert_eq!(recipes_limit(Some("page=2&recipes_limit=3")), Some(3));
        assert_eq!(recipes_limit(Some("recipes_limit=-1")), None);
        assert_eq!(recipes_limit(None), None);
    }
}
