use crate::api::error::ApiError;
use crate::api::pagination::Page;
use crate::auth::MaybeAuthUser;
use crate::config::Config;
use crate::db::DbPool;
use crate::models::User;
use crate::schema::users;
use axum::{
    extract::{OriginalUri, RawQuery, State},
    Json,
};
use diesel::prelude::*;
use foodgram_core::PageRequest;
use std::sync::Arc;

use super::view::{user_responses, UserResponse};

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    params(
        ("page" = Option<i64>, Query, description = "1-based page number"),
        ("limit" = Option<i64>, Query, description = "Page size (default 6, max 100)")
    ),
    responses(
        (status = 200, description = "Users ordered by username", body = Page<UserResponse>)
    )
)]
pub async fn list_users(
    viewer: MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    OriginalUri(uri): OriginalUri,
    RawQuery(query): RawQuery,
) -> Result<Json<Page<UserResponse>>, ApiError> {
    let request = PageRequest::from_query(query.as_deref());
    let mut conn = pool.get()?;

    let count: i64 = users::table.count().get_result(&mut conn)?;
    let page: Vec<User> = users::table
        .order(users::username.asc())
        .limit(request.limit)
        .offset(request.offset())
        .select(User::as_select())
        .load(&mut conn)?;

    let results = user_responses(&mut conn, &config, viewer.id(), page)?;
    Ok(Json(Page::new(&config, &uri, request, count, results)))
}
