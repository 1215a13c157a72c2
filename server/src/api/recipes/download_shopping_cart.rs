use crate::api::error::ApiError;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::schema::{ingredients, recipe_ingredients, recipes, shopping_cart, users};
use axum::{extract::State, http::header, response::IntoResponse};
use chrono::Utc;
use diesel::dsl::sum;
use diesel::prelude::*;
use foodgram_core::{author_display_name, CartRecipe, ShoppingItem, ShoppingList};
use std::sync::Arc;
use uuid::Uuid;

const FILENAME: &str = "shopping_list.txt";

/// Ingredient lines of every recipe in the cart, grouped by
/// `(name, measurement_unit)` with amounts summed.
fn grouped_items(conn: &mut PgConnection, user_id: Uuid) -> QueryResult<Vec<ShoppingItem>> {
    let rows: Vec<(String, String, Option<i64>)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .inner_join(
            shopping_cart::table.on(shopping_cart::recipe_id.eq(recipe_ingredients::recipe_id)),
        )
        .filter(shopping_cart::user_id.eq(user_id))
        .group_by((ingredients::name, ingredients::measurement_unit))
        .select((
            ingredients::name,
            ingredients::measurement_unit,
            sum(recipe_ingredients::amount),
        ))
        .order((ingredients::name.asc(), ingredients::measurement_unit.asc()))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(name, measurement_unit, amount)| ShoppingItem {
            name,
            measurement_unit,
            amount: amount.unwrap_or(0),
        })
        .collect())
}

fn cart_recipes(conn: &mut PgConnection, user_id: Uuid) -> QueryResult<Vec<CartRecipe>> {
    let rows: Vec<(String, String, String, String)> = shopping_cart::table
        .inner_join(recipes::table.inner_join(users::table))
        .filter(shopping_cart::user_id.eq(user_id))
        .order(shopping_cart::added_at.asc())
        .select((
            recipes::name,
            users::first_name,
            users::last_name,
            users::username,
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(name, first_name, last_name, username)| CartRecipe {
            name,
            author: author_display_name(&first_name, &last_name, &username),
        })
        .collect())
}

#[utoipa::path(
    get,
    path = "/api/recipes/download_shopping_cart",
    tag = "recipes",
    responses(
        (status = 200, description = "Aggregated shopping list", content_type = "text/plain", body = String),
        (status = 400, description = "Shopping cart is empty", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn download_shopping_cart(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let list = ShoppingList {
        date: Utc::now().date_naive(),
        items: grouped_items(&mut conn, user.id)?,
        recipes: cart_recipes(&mut conn, user.id)?,
    };

    if list.is_empty() {
        return Err(ApiError::Conflict("Shopping cart is empty".to_string()));
    }

    tracing::info!(
        user_id = %user.id,
        products = list.items.len(),
        recipes = list.recipes.len(),
        "shopping list exported"
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", FILENAME),
            ),
        ],
        list.render(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::membership::{self, ShoppingCart};
    use crate::test_support::{self, unique};

    #[test]
    fn test_cart_lines_are_grouped_by_name_and_unit() {
        let Some(pool) = test_support::pool() else {
            return;
        };
        let mut conn = pool.get().unwrap();
        let cook = test_support::create_user(&mut conn);
        let flour_name = unique("flour");
        let flour = test_support::create_ingredient(&mut conn, &flour_name, "g");
        let flour_cups = test_support::create_ingredient(&mut conn, &flour_name, "cup");

        let first = test_support::create_recipe(&mut conn, &cook, &[(flour.id, 100)]);
        let second =
            test_support::create_recipe(&mut conn, &cook, &[(flour.id, 50), (flour_cups.id, 2)]);
        let uncarted = test_support::create_recipe(&mut conn, &cook, &[(flour.id, 1000)]);
        membership::add::<ShoppingCart>(&mut conn, cook.id, first.id).unwrap();
        membership::add::<ShoppingCart>(&mut conn, cook.id, second.id).unwrap();

        let items = grouped_items(&mut conn, cook.id).unwrap();
        assert_eq!(
            items.iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec![
                format!("{} (cup) — 2", flour_name),
                format!("{} (g) — 150", flour_name),
            ]
        );

        let recipes = cart_recipes(&mut conn, cook.id).unwrap();
        assert_eq!(recipes.len(), 2);
        assert!(recipes.iter().all(|recipe| recipe.name != uncarted.name));
        assert!(recipes.iter().all(|recipe| recipe.author == "Test Cook"));
    }

    #[test]
    fn test_empty_cart_has_no_items() {
        let Some(pool) = test_support::pool() else {
            return;
        };
        let mut conn = pool.get().unwrap();
        let cook = test_support::create_user(&mut conn);

        assert!(grouped_items(&mut conn, cook.id).unwrap().is_empty());
        assert!(cart_recipes(&mut conn, cook.id).unwrap().is_empty());
    }
}
