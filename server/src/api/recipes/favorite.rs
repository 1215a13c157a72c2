use crate::api::error::ApiError;
use crate::api::extract::ApiPath;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::config::Config;
use crate::db::DbPool;
use crate::membership::{self, Favorite};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use uuid::Uuid;

use super::view::{find_recipe, RecipeSummary};

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/favorite",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 201, description = "Added to favorites", body = RecipeSummary),
        (status = 400, description = "Already in favorites", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn add_favorite(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;
    let recipe = find_recipe(&mut conn, id)?;
    membership::add::<Favorite>(&mut conn, user.id, recipe.id)?;

    Ok((StatusCode::CREATED, Json(RecipeSummary::new(&config, &recipe))))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/favorite",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Removed from favorites"),
        (status = 400, description = "Not in favorites", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn remove_favorite(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut conn = pool.get()?;
    let recipe = find_recipe(&mut conn, id)?;
    membership::remove::<Favorite>(&mut conn, user.id, recipe.id)?;

    Ok(StatusCode::NO_CONTENT)
}
