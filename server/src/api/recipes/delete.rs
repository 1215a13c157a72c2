use crate::api::error::ApiError;
use crate::api::extract::ApiPath;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::photos::delete_photo;
use crate::schema::recipes;
use axum::{extract::State, http::StatusCode};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use super::view::find_own_recipe;

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut conn = pool.get()?;
    let recipe = find_own_recipe(&mut conn, id, user.id)?;

    // Lines, tag links, favorites and cart rows go with the recipe (ON DELETE CASCADE).
    conn.transaction::<(), ApiError, _>(|conn| {
        diesel::delete(recipes::table.find(recipe.id)).execute(conn)?;
        delete_photo(conn, recipe.image_id)?;
        Ok(())
    })?;

    tracing::info!(recipe_id = %recipe.id, "recipe deleted");
    Ok(StatusCode::NO_CONTENT)
}
