use crate::api::error::{ApiError, ValidationErrorResponse};
use crate::api::extract::{ApiJson, ApiPath};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::config::Config;
use crate::db::DbPool;
use crate::models::{Recipe, RecipeChanges};
use crate::photos::{decode_field, delete_photo, insert_photo};
use crate::schema::recipes;
use axum::{extract::State, Json};
use diesel::prelude::*;
use foodgram_core::{validate_recipe, WriteMode};
use std::sync::Arc;
use uuid::Uuid;

use super::view::{find_own_recipe, recipe_response, RecipeResponse};
use super::write::{check_references, replace_ingredient_lines, replace_tags, RecipeWriteRequest};

#[utoipa::path(
    patch,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = RecipeWriteRequest,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Invalid recipe", body = ValidationErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<RecipeWriteRequest>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let mut conn = pool.get()?;
    let existing = find_own_recipe(&mut conn, id, user.id)?;

    let lines = req.lines();
    validate_recipe(&req.draft(lines.as_deref()), WriteMode::Update)?;
    let lines = lines.unwrap_or_default();

    let image = req
        .image
        .as_deref()
        .map(|raw| decode_field("image", raw))
        .transpose()?;
    let cooking_time = req.cooking_time_i16()?;

    let recipe = conn.transaction::<Recipe, ApiError, _>(|conn| {
        check_references(conn, &lines, req.tags.as_deref())?;

        let image_id = image
            .as_ref()
            .map(|image| insert_photo(conn, user.id, image))
            .transpose()?;

        let changes = RecipeChanges {
            name: req.name.as_deref().map(str::trim),
            text: req.text.as_deref(),
            image_id,
            cooking_time,
        };

        let recipe: Recipe = if changes.is_empty() {
            existing.clone()
        } else {
            diesel::update(recipes::table.find(existing.id))
                .set(&changes)
                .returning(Recipe::as_returning())
                .get_result(conn)?
        };

        replace_ingredient_lines(conn, recipe.id, &lines)?;
        if let Some(tag_ids) = req.tags.as_deref() {
            replace_tags(conn, recipe.id, tag_ids)?;
        }

        if image_id.is_some() {
            delete_photo(conn, existing.image_id)?;
        }

        Ok(recipe)
    })?;

    tracing::info!(recipe_id = %recipe.id, "recipe updated");

    Ok(Json(recipe_response(&mut conn, &config, Some(user.id), recipe)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{self, unique};

    fn replace_lines_with(ingredient: Uuid, amount: i64) -> RecipeWriteRequest {
        serde_json::from_value(serde_json::json!({
            "ingredients": [{"id": ingredient, "amount": amount}]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_non_owner_update_leaves_lines_unchanged() {
        let Some(pool) = test_support::pool() else {
            return;
        };
        let pool = Arc::new(pool);
        let (author, stranger, recipe, salt) = {
            let mut conn = pool.get().unwrap();
            let author = test_support::create_user(&mut conn);
            let stranger = test_support::create_user(&mut conn);
            let flour = test_support::create_ingredient(&mut conn, &unique("flour"), "g");
            let salt = test_support::create_ingredient(&mut conn, &unique("salt"), "g");
            let recipe = test_support::create_recipe(&mut conn, &author, &[(flour.id, 100)]);
            (author, stranger, recipe, salt)
        };
        let before = test_support::ingredient_lines(&mut pool.get().unwrap(), recipe.id);

        let result = update_recipe(
            AuthUser(stranger),
            State(pool.clone()),
            State(Arc::new(test_support::config())),
            ApiPath(recipe.id),
            ApiJson(replace_lines_with(salt.id, 5)),
        )
        .await;
        assert!(matches!(result, Err(ApiError::Forbidden)));
        assert_eq!(
            test_support::ingredient_lines(&mut pool.get().unwrap(), recipe.id),
            before
        );

        let Json(updated) = update_recipe(
            AuthUser(author),
            State(pool.clone()),
            State(Arc::new(test_support::config())),
            ApiPath(recipe.id),
            ApiJson(replace_lines_with(salt.id, 5)),
        )
        .await
        .unwrap();
        assert_eq!(updated.ingredients.len(), 1);
        assert_eq!(
            test_support::ingredient_lines(&mut pool.get().unwrap(), recipe.id),
            vec![(salt.id, 5)]
        );
    }

    #[tokio::test]
    async fn test_unknown_ingredient_is_a_field_error() {
        let Some(pool) = test_support::pool() else {
            return;
        };
        let pool = Arc::new(pool);
        let (author, recipe) = {
            let mut conn = pool.get().unwrap();
            let author = test_support::create_user(&mut conn);
            let recipe = test_support::create_recipe(&mut conn, &author, &[]);
            (author, recipe)
        };

        let result = update_recipe(
            AuthUser(author),
            State(pool),
            State(Arc::new(test_support::config())),
            ApiPath(recipe.id),
            ApiJson(replace_lines_with(Uuid::new_v4(), 5)),
        )
        .await;
        match result {
            Err(ApiError::Validation(fields)) => assert!(fields.contains("ingredients")),
            other => panic!("unexpected {:?}", other.map(|_| ())),
        }
    }
}
