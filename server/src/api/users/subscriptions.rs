use crate::api::error::ApiError;
use crate::api::pagination::Page;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::config::Config;
use crate::db::DbPool;
use crate::models::User;
use crate::schema::{subscriptions, users};
use axum::{
    extract::{OriginalUri, RawQuery, State},
    Json,
};
use diesel::prelude::*;
use foodgram_core::PageRequest;
use std::sync::Arc;

use super::subscribe::recipes_limit;
use super::view::{subscription_responses, SubscriptionResponse};

#[utoipa::path(
    get,
    path = "/api/users/subscriptions",
    tag = "users",
    params(
        ("page" = Option<i64>, Query, description = "1-based page number"),
        ("limit" = Option<i64>, Query, description = "Page size (default 6, max 100)"),
        ("recipes_limit" = Option<usize>, Query, description = "Maximum recipes per author")
    ),
    responses(
        (status = 200, description = "Followed authors, newest subscription first", body = Page<SubscriptionResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_subscriptions(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    OriginalUri(uri): OriginalUri,
    RawQuery(query): RawQuery,
) -> Result<Json<Page<SubscriptionResponse>>, ApiError> {
    let request = PageRequest::from_query(query.as_deref());
    let mut conn = pool.get()?;

    let count: i64 = subscriptions::table
        .filter(subscriptions::user_id.eq(user.id))
        .count()
        .get_result(&mut conn)?;

    let authors: Vec<User> = subscriptions::table
        .inner_join(users::table)
        .filter(subscriptions::user_id.eq(user.id))
        .order(subscriptions::created_at.desc())
        .limit(request.limit)
        .offset(request.offset())
        .select(User::as_select())
        .load(&mut conn)?;

    let results = subscription_responses(
        &mut conn,
        &config,
        user.id,
        authors,
        recipes_limit(query.as_deref()),
    )?;

    Ok(Json(Page::new(&config, &uri, request, count, results)))
}
