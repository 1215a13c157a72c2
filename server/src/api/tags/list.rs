use crate::api::error::ApiError;
use crate::db::DbPool;
use crate::models::Tag;
use crate::schema::tags;
use axum::{extract::State, Json};
use diesel::prelude::*;
use std::sync::Arc;

use super::TagResponse;

#[utoipa::path(
    get,
    path = "/api/tags",
    tag = "tags",
    responses(
        (status = 200, description = "All tags ordered by name", body = Vec<TagResponse>)
    )
)]
pub async fn list_tags(
    State(pool): State<Arc<DbPool>>,
) -> Result<Json<Vec<TagResponse>>, ApiError> {
    let mut conn = pool.get()?;

    let tags: Vec<Tag> = tags::table
        .order(tags::name.asc())
        .select(Tag::as_select())
        .load(&mut conn)?;

    Ok(Json(tags.into_iter().map(TagResponse::from).collect()))
}
