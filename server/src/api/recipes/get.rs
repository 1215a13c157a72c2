use crate::api::error::ApiError;
use crate::api::extract::ApiPath;
use crate::api::ErrorResponse;
use crate::auth::MaybeAuthUser;
use crate::config::Config;
use crate::db::DbPool;
use axum::{extract::State, Json};
use std::sync::Arc;
use uuid::Uuid;

use super::view::{find_recipe, recipe_response, RecipeResponse};

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe details", body = RecipeResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    viewer: MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let mut conn = pool.get()?;
    let recipe = find_recipe(&mut conn, id)?;
    Ok(Json(recipe_response(&mut conn, &config, viewer.id(), recipe)?))
}
