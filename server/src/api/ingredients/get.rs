use crate::api::error::ApiError;
use crate::api::extract::ApiPath;
use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::models::Ingredient;
use crate::schema::ingredients;
use axum::{extract::State, Json};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use super::IngredientResponse;

#[utoipa::path(
    get,
    path = "/api/ingredients/{id}",
    tag = "ingredients",
    params(
        ("id" = Uuid, Path, description = "Ingredient ID")
    ),
    responses(
        (status = 200, description = "Ingredient", body = IngredientResponse),
        (status = 404, description = "Ingredient not found", body = ErrorResponse)
    )
)]
pub async fn get_ingredient(
    State(pool): State<Arc<DbPool>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<IngredientResponse>, ApiError> {
    let mut conn = pool.get()?;

    let ingredient: Ingredient = ingredients::table
        .find(id)
        .select(Ingredient::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Ingredient"))?;

    Ok(Json(ingredient.into()))
}
