use crate::api::error::{ApiError, ValidationErrorResponse};
use crate::api::extract::ApiJson;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::config::Config;
use crate::db::DbPool;
use crate::models::{NewRecipe, Recipe};
use crate::photos::{decode_field, insert_photo};
use crate::schema::recipes;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use foodgram_core::validation::REQUIRED;
use foodgram_core::{validate_recipe, WriteMode};
use std::sync::Arc;

use super::view::{recipe_response, RecipeResponse};
use super::write::{check_references, replace_ingredient_lines, replace_tags, RecipeWriteRequest};

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = RecipeWriteRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Invalid recipe", body = ValidationErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    ApiJson(req): ApiJson<RecipeWriteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let lines = req.lines();
    validate_recipe(&req.draft(lines.as_deref()), WriteMode::Create)?;

    let lines = lines.unwrap_or_default();
    let image = decode_field("image", req.image.as_deref().unwrap_or_default())?;
    let cooking_time = req
        .cooking_time_i16()?
        .ok_or_else(|| ApiError::field("cooking_time", REQUIRED))?;
    let name = req.name.as_deref().unwrap_or_default().trim();
    let text = req.text.as_deref().unwrap_or_default();

    let mut conn = pool.get()?;
    let recipe = conn.transaction::<Recipe, ApiError, _>(|conn| {
        check_references(conn, &lines, req.tags.as_deref())?;

        let image_id = insert_photo(conn, user.id, &image)?;

        let recipe: Recipe = diesel::insert_into(recipes::table)
            .values(&NewRecipe {
                author_id: user.id,
                name,
                text,
                image_id,
                cooking_time,
            })
            .returning(Recipe::as_returning())
            .get_result(conn)?;

        replace_ingredient_lines(conn, recipe.id, &lines)?;
        if let Some(tag_ids) = req.tags.as_deref() {
            replace_tags(conn, recipe.id, tag_ids)?;
        }

        Ok(recipe)
    })?;

    tracing::info!(recipe_id = %recipe.id, author_id = %user.id, "recipe created");

    let response = recipe_response(&mut conn, &config, Some(user.id), recipe)?;
    Ok((StatusCode::CREATED, Json(response)))
}
