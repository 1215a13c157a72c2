use crate::api::error::ApiError;
use crate::api::extract::ApiPath;
use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::models::Tag;
use crate::schema::tags;
use axum::{extract::State, Json};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use super::TagResponse;

#[utoipa::path(
    get,
    path = "/api/tags/{id}",
    tag = "tags",
    params(
        ("id" = Uuid, Path, description = "Tag ID")
    ),
    responses(
        (status = 200, description = "Tag", body = TagResponse),
        (status = 404, description = "Tag not found", body = ErrorResponse)
    )
)]
pub async fn get_tag(
    State(pool): State<Arc<DbPool>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<TagResponse>, ApiError> {
    let mut conn = pool.get()?;

    let tag: Tag = tags::table
        .find(id)
        .select(Tag::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Tag"))?;

    Ok(Json(tag.into()))
}
