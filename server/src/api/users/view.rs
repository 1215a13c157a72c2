//! Read shapes for users and subscriptions.

use crate::api::error::ApiError;
use crate::api::recipes::view::RecipeSummary;
use crate::config::Config;
use crate::models::{Recipe, User};
use crate::schema::{recipes, subscriptions, users};
use diesel::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub email: String,
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the requester follows this user
    pub is_subscribed: bool,
    /// Absolute avatar URL, if one is set
    pub avatar: Option<String>,
}

impl UserResponse {
    pub fn new(config: &Config, user: User, is_subscribed: bool) -> Self {
        Self {
            avatar: user.avatar_id.map(|id| config.photo_url(id)),
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        }
    }
}

/// A followed author with their newest recipes.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub recipes: Vec<RecipeSummary>,
    pub recipes_count: i64,
}

pub fn find_user(conn: &mut PgConnection, id: Uuid) -> Result<User, ApiError> {
    users::table
        .find(id)
        .select(User::as_select())
        .first(conn)
        .optional()?
        .ok_or(ApiError::NotFound("User"))
}

/// Authors among `author_ids` that `viewer` follows.
fn followed_among(
    conn: &mut PgConnection,
    viewer: Option<Uuid>,
    author_ids: &[Uuid],
) -> QueryResult<HashSet<Uuid>> {
    let Some(viewer) = viewer else {
        return Ok(HashSet::new());
    };

    Ok(subscriptions::table
        .filter(subscriptions::user_id.eq(viewer))
        .filter(subscriptions::author_id.eq_any(author_ids))
        .select(subscriptions::author_id)
        .load::<Uuid>(conn)?
        .into_iter()
        .collect())
}

pub fn user_responses(
    conn: &mut PgConnection,
    config: &Config,
    viewer: Option<Uuid>,
    users: Vec<User>,
) -> QueryResult<Vec<UserResponse>> {
    let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
    let followed = followed_among(conn, viewer, &ids)?;

    Ok(users
        .into_iter()
        .map(|user| {
            let is_subscribed = followed.contains(&user.id);
            UserResponse::new(config, user, is_subscribed)
        })
        .collect())
}

pub fn user_response(
    conn: &mut PgConnection,
    config: &Config,
    viewer: Option<Uuid>,
    user: User,
) -> QueryResult<UserResponse> {
    let is_subscribed = followed_among(conn, viewer, &[user.id])?.contains(&user.id);
    Ok(UserResponse::new(config, user, is_subscribed))
}

/// Render followed authors, each with their recipes newest first, cut to
/// `recipes_limit` when given. `recipes_count` is always the full count.
pub fn subscription_responses(
    conn: &mut PgConnection,
    config: &Config,
    viewer: Uuid,
    authors: Vec<User>,
    recipes_limit: Option<usize>,
) -> QueryResult<Vec<SubscriptionResponse>> {
    let author_ids: Vec<Uuid> = authors.iter().map(|u| u.id).collect();

    let authored: Vec<Recipe> = recipes::table
        .filter(recipes::author_id.eq_any(&author_ids))
        .order(recipes::pub_date.desc())
        .select(Recipe::as_select())
        .load(conn)?;
    let mut by_author: HashMap<Uuid, Vec<Recipe>> = HashMap::new();
    for recipe in authored {
        by_author.entry(recipe.author_id).or_default().push(recipe);
    }

    let users = user_responses(conn, config, Some(viewer), authors)?;

    Ok(users
        .into_iter()
        .map(|user| {
            let recipes = by_author.remove(&user.id).unwrap_or_default();
            let recipes_count = recipes.len() as i64;
            let shown = recipes_limit.unwrap_or(recipes.len());
            SubscriptionResponse {
                recipes: recipes
                    .iter()
                    .take(shown)
                    .map(|recipe| RecipeSummary::new(config, recipe))
                    .collect(),
                recipes_count,
                user,
            }
        })
        .collect())
}
