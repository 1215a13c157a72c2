//! Fixtures for tests that run against a live Postgres.
//!
//! Tests call [`pool`] and return early when `DATABASE_URL` is unset. Every
//! pooled connection opens a test transaction that is never committed, so
//! fixture rows never outlive the test.

use crate::config::Config;
use crate::db::{DbPool, MIGRATIONS};
use crate::models::{Ingredient, NewIngredient, NewPhoto, NewRecipe, NewUser, Recipe, User};
use crate::schema::{ingredients, photos, recipe_ingredients, recipes, users};
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use diesel_migrations::MigrationHarness;
use std::sync::OnceLock;
use uuid::Uuid;

#[derive(Debug)]
struct RollbackOnRelease;

impl CustomizeConnection<PgConnection, r2d2::Error> for RollbackOnRelease {
    fn on_acquire(&self, conn: &mut PgConnection) -> Result<(), r2d2::Error> {
        conn.begin_test_transaction().map_err(r2d2::Error::QueryError)
    }
}

fn migrate(database_url: &str) {
    static MIGRATED: OnceLock<()> = OnceLock::new();
    MIGRATED.get_or_init(|| {
        let mut conn = PgConnection::establish(database_url).expect("connect for migrations");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("run migrations");
    });
}

/// Single-connection pool inside a rolled-back transaction, or `None` when no
/// database is configured.
///
/// Handlers check connections out of the same pool, so a test must drop its
/// own connection before calling one.
pub fn pool() -> Option<DbPool> {
    let database_url = std::env::var("DATABASE_URL").ok()?;
    migrate(&database_url);

    let pool = r2d2::Pool::builder()
        .max_size(1)
        .connection_customizer(Box::new(RollbackOnRelease))
        .build(ConnectionManager::<PgConnection>::new(database_url))
        .expect("build test pool");
    Some(pool)
}

pub fn config() -> Config {
    Config {
        database_url: String::new(),
        bind_addr: "127.0.0.1:0".to_string(),
        public_base_url: "http://testserver".to_string(),
        db_pool_size: 1,
    }
}

/// Suffix keeping fixture names unique across concurrently running tests.
pub fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().simple().to_string()[..12])
}

pub fn create_user(conn: &mut PgConnection) -> User {
    let username = unique("cook");
    let email = format!("{}@example.com", username);
    diesel::insert_into(users::table)
        .values(&NewUser {
            email: &email,
            username: &username,
            first_name: "Test",
            last_name: "Cook",
            password_hash: "unused",
        })
        .returning(User::as_returning())
        .get_result(conn)
        .expect("insert user")
}

pub fn create_ingredient(conn: &mut PgConnection, name: &str, unit: &str) -> Ingredient {
    diesel::insert_into(ingredients::table)
        .values(&NewIngredient {
            name,
            measurement_unit: unit,
        })
        .returning(Ingredient::as_returning())
        .get_result(conn)
        .expect("insert ingredient")
}

/// Insert a recipe with the given `(ingredient, amount)` lines.
pub fn create_recipe(conn: &mut PgConnection, author: &User, lines: &[(Uuid, i16)]) -> Recipe {
    let image_id: Uuid = diesel::insert_into(photos::table)
        .values(&NewPhoto {
            user_id: author.id,
            content_type: "image/png",
            data: b"\x89PNG",
        })
        .returning(photos::id)
        .get_result(conn)
        .expect("insert photo");

    let name = unique("recipe");
    let recipe: Recipe = diesel::insert_into(recipes::table)
        .values(&NewRecipe {
            author_id: author.id,
            name: &name,
            text: "Mix and cook.",
            image_id,
            cooking_time: 10,
        })
        .returning(Recipe::as_returning())
        .get_result(conn)
        .expect("insert recipe");

    for &(ingredient_id, amount) in lines {
        diesel::insert_into(recipe_ingredients::table)
            .values((
                recipe_ingredients::recipe_id.eq(recipe.id),
                recipe_ingredients::ingredient_id.eq(ingredient_id),
                recipe_ingredients::amount.eq(amount),
            ))
            .execute(conn)
            .expect("insert ingredient line");
    }

    recipe
}

/// Ingredient lines of a recipe as `(ingredient, amount)`, ordered by ingredient.
pub fn ingredient_lines(conn: &mut PgConnection, recipe_id: Uuid) -> Vec<(Uuid, i16)> {
    recipe_ingredients::table
        .filter(recipe_ingredients::recipe_id.eq(recipe_id))
        .order(recipe_ingredients::ingredient_id.asc())
        .select((recipe_ingredients::ingredient_id, recipe_ingredients::amount))
        .load(conn)
        .expect("load ingredient lines")
}
