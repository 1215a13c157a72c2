use crate::api::error::ApiError;
use crate::db::DbPool;
use crate::models::Ingredient;
use crate::schema::ingredients;
use axum::{
    extract::{Query, State},
    Json,
};
use diesel::prelude::*;
use foodgram_core::query::prefix_pattern;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

use super::IngredientResponse;

#[derive(Debug, Deserialize, IntoParams)]
pub struct IngredientSearch {
    /// Case-insensitive name prefix
    pub name: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/ingredients",
    tag = "ingredients",
    params(IngredientSearch),
    responses(
        (status = 200, description = "Ingredients ordered by name", body = Vec<IngredientResponse>)
    )
)]
pub async fn list_ingredients(
    State(pool): State<Arc<DbPool>>,
    Query(search): Query<IngredientSearch>,
) -> Result<Json<Vec<IngredientResponse>>, ApiError> {
    let mut conn = pool.get()?;
    let found = search_ingredients(&mut conn, search.name.as_deref())?;
    Ok(Json(found.into_iter().map(IngredientResponse::from).collect()))
}

/// Ingredients whose name starts with `prefix`, ignoring case; all of them
/// when the prefix is blank.
fn search_ingredients(
    conn: &mut PgConnection,
    prefix: Option<&str>,
) -> QueryResult<Vec<Ingredient>> {
    let mut query = ingredients::table
        .order((ingredients::name.asc(), ingredients::measurement_unit.asc()))
        .select(Ingredient::as_select())
        .into_boxed();

    if let Some(prefix) = prefix.map(str::trim).filter(|p| !p.is_empty()) {
        query = query.filter(ingredients::name.ilike(prefix_pattern(prefix)));
    }

    query.load(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use uuid::Uuid;

    fn names(found: Vec<Ingredient>) -> Vec<String> {
        found.into_iter().map(|ingredient| ingredient.name).collect()
    }

    #[test]
    fn test_prefix_search_ignores_case_and_infix_matches() {
        let Some(pool) = test_support::pool() else {
            return;
        };
        let mut conn = pool.get().unwrap();
        let token = format!("qz{}", &Uuid::new_v4().simple().to_string()[..10]);
        let upper = token.to_uppercase();
        for name in [
            format!("{}milk", token),
            format!("{}carrot", upper),
            format!("raw {}", token),
        ] {
            test_support::create_ingredient(&mut conn, &name, "g");
        }

        assert_eq!(
            names(search_ingredients(&mut conn, Some(&token)).unwrap()),
            vec![format!("{}carrot", upper), format!("{}milk", token)]
        );
        assert_eq!(
            names(search_ingredients(&mut conn, Some(&upper)).unwrap()).len(),
            2
        );
    }

    #[test]
    fn test_cyrillic_prefix_excludes_names_containing_it() {
        let Some(pool) = test_support::pool() else {
            return;
        };
        let mut conn = pool.get().unwrap();
        let suffix = &Uuid::new_v4().simple().to_string()[..10];
        let starts = format!("мо{}", suffix);
        test_support::create_ingredient(&mut conn, &format!("{}локо", starts), "мл");
        test_support::create_ingredient(&mut conn, &format!("са{}", starts), "г");

        assert_eq!(
            names(search_ingredients(&mut conn, Some(&starts)).unwrap()),
            vec![format!("{}локо", starts)]
        );
    }

    #[test]
    fn test_wildcards_in_prefix_are_literal() {
        let Some(pool) = test_support::pool() else {
            return;
        };
        let mut conn = pool.get().unwrap();
        let token = format!("qz{}", &Uuid::new_v4().simple().to_string()[..10]);
        test_support::create_ingredient(&mut conn, &format!("{}abc", token), "g");

        assert!(search_ingredients(&mut conn, Some(&format!("{}%c", token)))
            .unwrap()
            .is_empty());
        assert!(search_ingredients(&mut conn, Some(&format!("{}_bc", token)))
            .unwrap()
            .is_empty());
    }
}
