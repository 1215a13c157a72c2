use crate::api::error::ApiError;
use crate::api::pagination::Page;
use crate::auth::MaybeAuthUser;
use crate::config::Config;
use crate::db::DbPool;
use crate::models::Recipe;
use crate::schema::{favorites, recipe_tags, recipes, shopping_cart, tags};
use axum::{
    extract::{OriginalUri, RawQuery, State},
    Json,
};
use diesel::pg::Pg;
use diesel::prelude::*;
use foodgram_core::RecipeFilter;
use std::sync::Arc;
use uuid::Uuid;

use super::view::{recipe_responses, RecipeResponse};

/// Recipes matching `filter`, unordered and unpaginated.
///
/// Tag matching is a subquery so a recipe with several matching tags is
/// returned once.
fn filtered<'a>(filter: &'a RecipeFilter, viewer: Option<Uuid>) -> recipes::BoxedQuery<'a, Pg> {
    let mut query = recipes::table.into_boxed();

    if !filter.tags.is_empty() {
        query = query.filter(
            recipes::id.eq_any(
                recipe_tags::table
                    .inner_join(tags::table)
                    .filter(tags::slug.eq_any(&filter.tags))
                    .select(recipe_tags::recipe_id),
            ),
        );
    }

    if let Some(author) = filter.author {
        query = query.filter(recipes::author_id.eq(author));
    }

    if let Some(user_id) = filter.favorited_by(viewer) {
        query = query.filter(
            recipes::id.eq_any(
                favorites::table
                    .filter(favorites::user_id.eq(user_id))
                    .select(favorites::recipe_id),
            ),
        );
    }

    if let Some(user_id) = filter.in_cart_of(viewer) {
        query = query.filter(
            recipes::id.eq_any(
                shopping_cart::table
                    .filter(shopping_cart::user_id.eq(user_id))
                    .select(shopping_cart::recipe_id),
            ),
        );
    }

    query
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(
        ("tags" = Option<Vec<String>>, Query, description = "Tag slug; repeat to match any of several"),
        ("author" = Option<Uuid>, Query, description = "Author ID"),
        ("is_favorited" = Option<String>, Query, description = "1 to show only the requester's favorites"),
        ("is_in_shopping_cart" = Option<String>, Query, description = "1 to show only the requester's cart"),
        ("page" = Option<i64>, Query, description = "1-based page number"),
        ("limit" = Option<i64>, Query, description = "Page size (default 6, max 100)")
    ),
    responses(
        (status = 200, description = "Recipes, newest first", body = Page<RecipeResponse>)
    )
)]
pub async fn list_recipes(
    viewer: MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    OriginalUri(uri): OriginalUri,
    RawQuery(query): RawQuery,
) -> Result<Json<Page<RecipeResponse>>, ApiError> {
    let filter = RecipeFilter::parse(query.as_deref());
    let viewer_id = viewer.id();
    let mut conn = pool.get()?;

    let count: i64 = filtered(&filter, viewer_id).count().get_result(&mut conn)?;

    let page: Vec<Recipe> = filtered(&filter, viewer_id)
        .order((recipes::pub_date.desc(), recipes::id.desc()))
        .limit(filter.page.limit)
        .offset(filter.page.offset())
        .select(Recipe::as_select())
        .load(&mut conn)?;

    let results = recipe_responses(&mut conn, &config, viewer_id, page)?;
    Ok(Json(Page::new(&config, &uri, filter.page, count, results)))
}
