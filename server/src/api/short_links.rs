//! `/s/{code}` redirects for recipe short links.

use crate::api::error::ApiError;
use crate::api::extract::ApiPath;
use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::schema::recipes;
use crate::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use diesel::prelude::*;
use foodgram_core::short_link;
use std::sync::Arc;
use utoipa::OpenApi;

/// Frontend path a short link resolves to.
pub fn recipe_page_path(id: uuid::Uuid) -> String {
    format!("/recipes/{}/", id)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/s/{code}", get(resolve_short_link))
}

#[utoipa::path(
    get,
    path = "/s/{code}",
    tag = "recipes",
    params(
        ("code" = String, Path, description = "Short link code")
    ),
    responses(
        (status = 302, description = "Redirect to the recipe page"),
        (status = 404, description = "Unknown short link", body = ErrorResponse)
    )
)]
pub async fn resolve_short_link(
    State(pool): State<Arc<DbPool>>,
    ApiPath(code): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = short_link::decode(&code).map_err(|_| ApiError::NotFound("Recipe"))?;

    let mut conn = pool.get()?;
    let exists: bool =
        diesel::select(diesel::dsl::exists(recipes::table.find(id))).get_result(&mut conn)?;
    if !exists {
        return Err(ApiError::NotFound("Recipe"));
    }

    Ok((StatusCode::FOUND, [(header::LOCATION, recipe_page_path(id))]))
}

#[derive(OpenApi)]
#[openapi(paths(resolve_short_link))]
pub struct ApiDoc;
