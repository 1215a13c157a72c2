//! Shared recipe write path for create and update.

use crate::api::error::ApiError;
use crate::models::{NewRecipeIngredient, NewRecipeTag};
use crate::schema::{ingredients, recipe_ingredients, recipe_tags, tags};
use diesel::prelude::*;
use foodgram_core::validation::{MAX_COOKING_TIME, MIN_COOKING_TIME};
use foodgram_core::{missing_ids, FieldErrors, IngredientAmount, RecipeDraft};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct IngredientLineRequest {
    /// Ingredient ID
    pub id: Uuid,
    pub amount: i64,
}

/// Body of both `POST /api/recipes` and `PATCH /api/recipes/{id}`.
///
/// On update, absent simple fields keep their stored value; `ingredients` is
/// always required and replaces every ingredient line.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RecipeWriteRequest {
    pub ingredients: Option<Vec<IngredientLineRequest>>,
    pub tags: Option<Vec<Uuid>>,
    /// Image as a `data:<mime>;base64,<payload>` URI
    pub image: Option<String>,
    pub name: Option<String>,
    pub text: Option<String>,
    /// Minutes, 1..=32000
    pub cooking_time: Option<i64>,
}

impl RecipeWriteRequest {
    pub fn lines(&self) -> Option<Vec<IngredientAmount>> {
        self.ingredients.as_ref().map(|lines| {
            lines
                .iter()
                .map(|line| IngredientAmount {
                    id: line.id,
                    amount: line.amount,
                })
                .collect()
        })
    }

    pub fn draft<'a>(&'a self, lines: Option<&'a [IngredientAmount]>) -> RecipeDraft<'a> {
        RecipeDraft {
            name: self.name.as_deref(),
            text: self.text.as_deref(),
            cooking_time: self.cooking_time,
            image: self.image.as_deref(),
            ingredients: lines,
            tags: self.tags.as_deref(),
        }
    }

    /// Cooking time narrowed to the column type. Only valid after validation.
    pub fn cooking_time_i16(&self) -> Result<Option<i16>, ApiError> {
        self.cooking_time
            .map(|minutes| {
                i16::try_from(minutes).map_err(|_| {
                    ApiError::field(
                        "cooking_time",
                        format!(
                            "Cooking time must be between {} and {} minutes",
                            MIN_COOKING_TIME, MAX_COOKING_TIME
                        ),
                    )
                })
            })
            .transpose()
    }
}

/// Report ingredient and tag ids that do not exist.
pub fn check_references(
    conn: &mut PgConnection,
    lines: &[IngredientAmount],
    tag_ids: Option<&[Uuid]>,
) -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();

    let ingredient_ids: Vec<Uuid> = lines.iter().map(|line| line.id).collect();
    let found: Vec<Uuid> = ingredients::table
        .filter(ingredients::id.eq_any(&ingredient_ids))
        .select(ingredients::id)
        .load(conn)?;
    for id in missing_ids(&ingredient_ids, &found) {
        errors.add("ingredients", format!("Ingredient {} does not exist", id));
    }

    if let Some(tag_ids) = tag_ids {
        let found: Vec<Uuid> = tags::table
            .filter(tags::id.eq_any(tag_ids))
            .select(tags::id)
            .load(conn)?;
        for id in missing_ids(tag_ids, &found) {
            errors.add("tags", format!("Tag {} does not exist", id));
        }
    }

    Ok(errors.into_result()?)
}

/// Replace every ingredient line of a recipe.
pub fn replace_ingredient_lines(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    lines: &[IngredientAmount],
) -> Result<(), ApiError> {
    diesel::delete(recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)))
        .execute(conn)?;

    let rows = lines
        .iter()
        .map(|line| {
            let amount = i16::try_from(line.amount).map_err(|_| {
                ApiError::field("ingredients", format!("Amount {} is out of range", line.amount))
            })?;
            Ok(NewRecipeIngredient {
                recipe_id,
                ingredient_id: line.id,
                amount,
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    diesel::insert_into(recipe_ingredients::table)
        .values(&rows)
        .execute(conn)?;
    Ok(())
}

/// Replace every tag link of a recipe.
pub fn replace_tags(conn: &mut PgConnection, recipe_id: Uuid, tag_ids: &[Uuid]) -> QueryResult<()> {
    diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id))).execute(conn)?;

    if tag_ids.is_empty() {
        return Ok(());
    }

    let rows: Vec<NewRecipeTag> = tag_ids
        .iter()
        .map(|&tag_id| NewRecipeTag { recipe_id, tag_id })
        .collect();
    diesel::insert_into(recipe_tags::table)
        .values(&rows)
        .execute(conn)?;
    Ok(())
}
