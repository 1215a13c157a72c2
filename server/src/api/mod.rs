pub mod auth;
pub mod error;
pub mod extract;
pub mod ingredients;
pub mod pagination;
pub mod photos;
pub mod recipes;
pub mod short_links;
pub mod tags;
pub mod users;

use serde::Serialize;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{OpenApi, ToSchema};

use error::ValidationErrorResponse;

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Foodgram API"),
        components(schemas(ErrorResponse, ValidationErrorResponse))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    // Clients send either `Token <t>` or `Bearer <t>`; both carry the same token.
    if let Some(components) = spec.components.as_mut() {
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }

    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        auth::ApiDoc::openapi(),
        users::ApiDoc::openapi(),
        tags::ApiDoc::openapi(),
        ingredients::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
        photos::ApiDoc::openapi(),
        short_links::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        spec.paths.paths.extend(module_spec.paths.paths);

        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_resource() {
        let spec = openapi();
        for path in [
            "/api/users",
            "/api/auth/token/login",
            "/api/tags",
            "/api/ingredients",
            "/api/recipes",
            "/api/recipes/download_shopping_cart",
            "/api/recipes/{id}/favorite",
            "/api/users/{id}/subscribe",
            "/api/photos/{id}",
            "/s/{code}",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
