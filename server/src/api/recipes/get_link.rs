use crate::api::error::ApiError;
use crate::api::extract::ApiPath;
use crate::api::ErrorResponse;
use crate::config::Config;
use crate::db::DbPool;
use axum::{extract::State, Json};
use foodgram_core::short_link;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::view::find_recipe;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShortLinkResponse {
    #[serde(rename = "short-link")]
    pub short_link: String,
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/get-link",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Short link to the recipe", body = ShortLinkResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_link(
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ShortLinkResponse>, ApiError> {
    let mut conn = pool.get()?;
    let recipe = find_recipe(&mut conn, id)?;

    Ok(Json(ShortLinkResponse {
        short_link: config.absolute_url(&format!("/s/{}", short_link::encode(recipe.id))),
    }))
}
