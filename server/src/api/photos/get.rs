use crate::api::error::ApiError;
use crate::api::extract::ApiPath;
use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::schema::photos;
use axum::{extract::State, http::header, response::IntoResponse};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/photos/{id}",
    tag = "photos",
    params(
        ("id" = Uuid, Path, description = "Photo ID")
    ),
    responses(
        (status = 200, description = "Image bytes with their stored content type"),
        (status = 404, description = "Photo not found", body = ErrorResponse)
    )
)]
pub async fn get_photo(
    State(pool): State<Arc<DbPool>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let (content_type, data): (String, Vec<u8>) = photos::table
        .find(id)
        .select((photos::content_type, photos::data))
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Photo"))?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (
                header::CACHE_CONTROL,
                "public, max-age=31536000, immutable".to_string(),
            ),
        ],
        data,
    ))
}
