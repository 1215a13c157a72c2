//! Read shapes for recipes, assembled from batched queries.

use crate::api::error::ApiError;
use crate::api::tags::TagResponse;
use crate::api::users::view::{user_responses, UserResponse};
use crate::config::Config;
use crate::models::{Recipe, Tag, User};
use crate::schema::{
    favorites, ingredients, recipe_ingredients, recipe_tags, recipes, shopping_cart, tags, users,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use utoipa::ToSchema;
use uuid::Uuid;

/// An ingredient line as shown on a recipe.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeIngredientResponse {
    pub id: Uuid,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i16,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: Uuid,
    pub author: UserResponse,
    pub tags: Vec<TagResponse>,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    /// Absolute URL of the recipe image
    pub image: String,
    pub text: String,
    pub cooking_time: i16,
    pub pub_date: DateTime<Utc>,
}

/// Condensed recipe used by toggles and subscription listings.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeSummary {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub cooking_time: i16,
}

impl RecipeSummary {
    pub fn new(config: &Config, recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: config.photo_url(recipe.image_id),
            cooking_time: recipe.cooking_time,
        }
    }
}

pub fn find_recipe(conn: &mut PgConnection, id: Uuid) -> Result<Recipe, ApiError> {
    recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(conn)
        .optional()?
        .ok_or(ApiError::NotFound("Recipe"))
}

/// Load a recipe the requester is allowed to modify.
pub fn find_own_recipe(
    conn: &mut PgConnection,
    id: Uuid,
    user_id: Uuid,
) -> Result<Recipe, ApiError> {
    let recipe = find_recipe(conn, id)?;
    if recipe.author_id != user_id {
        return Err(ApiError::Forbidden);
    }
    Ok(recipe)
}

pub fn recipe_response(
    conn: &mut PgConnection,
    config: &Config,
    viewer: Option<Uuid>,
    recipe: Recipe,
) -> Result<RecipeResponse, ApiError> {
    recipe_responses(conn, config, viewer, vec![recipe])?
        .pop()
        .ok_or_else(|| ApiError::Internal("recipe vanished while rendering".to_string()))
}

/// Render recipes in the given order with a fixed number of queries,
/// independent of how many recipes are on the page.
pub fn recipe_responses(
    conn: &mut PgConnection,
    config: &Config,
    viewer: Option<Uuid>,
    recipes: Vec<Recipe>,
) -> Result<Vec<RecipeResponse>, ApiError> {
    if recipes.is_empty() {
        return Ok(Vec::new());
    }

    let recipe_ids: Vec<Uuid> = recipes.iter().map(|r| r.id).collect();
    let author_ids: Vec<Uuid> = recipes
        .iter()
        .map(|r| r.author_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let authors: Vec<User> = users::table
        .filter(users::id.eq_any(&author_ids))
        .select(User::as_select())
        .load(conn)?;
    let authors: HashMap<Uuid, UserResponse> = user_responses(conn, config, viewer, authors)?
        .into_iter()
        .map(|author| (author.id, author))
        .collect();

    let line_rows: Vec<(Uuid, Uuid, String, String, i16)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(&recipe_ids))
        .order(ingredients::name.asc())
        .select((
            recipe_ingredients::recipe_id,
            ingredients::id,
            ingredients::name,
            ingredients::measurement_unit,
            recipe_ingredients::amount,
        ))
        .load(conn)?;
    let mut lines_by_recipe: HashMap<Uuid, Vec<RecipeIngredientResponse>> = HashMap::new();
    for (recipe_id, id, name, measurement_unit, amount) in line_rows {
        lines_by_recipe.entry(recipe_id).or_default().push(RecipeIngredientResponse {
            id,
            name,
            measurement_unit,
            amount,
        });
    }

    let tag_rows: Vec<(Uuid, Tag)> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(&recipe_ids))
        .order(tags::name.asc())
        .select((recipe_tags::recipe_id, Tag::as_select()))
        .load(conn)?;
    let mut tags_by_recipe: HashMap<Uuid, Vec<TagResponse>> = HashMap::new();
    for (recipe_id, tag) in tag_rows {
        tags_by_recipe.entry(recipe_id).or_default().push(tag.into());
    }

    let (favorited, in_cart): (HashSet<Uuid>, HashSet<Uuid>) = match viewer {
        Some(viewer) => (
            favorites::table
                .filter(favorites::user_id.eq(viewer))
                .filter(favorites::recipe_id.eq_any(&recipe_ids))
                .select(favorites::recipe_id)
                .load::<Uuid>(conn)?
                .into_iter()
                .collect(),
            shopping_cart::table
                .filter(shopping_cart::user_id.eq(viewer))
                .filter(shopping_cart::recipe_id.eq_any(&recipe_ids))
                .select(shopping_cart::recipe_id)
                .load::<Uuid>(conn)?
                .into_iter()
                .collect(),
        ),
        None => (HashSet::new(), HashSet::new()),
    };

    recipes
        .into_iter()
        .map(|recipe| -> Result<RecipeResponse, ApiError> {
            let author = authors.get(&recipe.author_id).cloned().ok_or_else(|| {
                ApiError::Internal(format!("author of recipe {} missing", recipe.id))
            })?;

            Ok(RecipeResponse {
                id: recipe.id,
                author,
                tags: tags_by_recipe.remove(&recipe.id).unwrap_or_default(),
                ingredients: lines_by_recipe.remove(&recipe.id).unwrap_or_default(),
                is_favorited: favorited.contains(&recipe.id),
                is_in_shopping_cart: in_cart.contains(&recipe.id),
                image: config.photo_url(recipe.image_id),
                name: recipe.name,
                text: recipe.text,
                cooking_time: recipe.cooking_time,
                pub_date: recipe.pub_date,
            })
        })
        .collect()
}
