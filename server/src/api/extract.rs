//! Request extractors whose rejections render through `ApiError`.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts};
use foodgram_core::FieldErrors;

use super::error::ApiError;

/// Field key for body errors that cannot be attributed to a single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// `axum::Json` with malformed bodies reported as field-keyed validation errors.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Path` with unparseable ids reported as a missing object.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let detail = rejection.body_text();
        match rejection {
            JsonRejection::JsonDataError(_) => {
                let (field, message) = split_data_error(&detail);
                ApiError::Validation(FieldErrors::single(field, message))
            }
            JsonRejection::JsonSyntaxError(_) => {
                ApiError::field(NON_FIELD_ERRORS, "Request body is not valid JSON")
            }
            JsonRejection::MissingJsonContentType(_) => ApiError::field(
                NON_FIELD_ERRORS,
                "Expected request with `Content-Type: application/json`",
            ),
            _ => ApiError::field(NON_FIELD_ERRORS, detail),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(e) => {
                tracing::debug!(error = %e.body_text(), "unparseable path parameter");
                ApiError::NotFound("Object")
            }
            other => ApiError::Internal(other.body_text()),
        }
    }
}

/// Split a deserialization failure such as
/// `"...target type: ingredients[0].id: UUID parsing failed"` into the
/// top-level field and the message. Errors without a path land under
/// `non_field_errors`.
fn split_data_error(detail: &str) -> (&str, String) {
    let located = detail
        .split_once("target type: ")
        .map_or(detail, |(_, rest)| rest);

    if let Some((path, message)) = located.split_once(": ") {
        let field = path.split(['[', '.']).next().unwrap_or_default();
        if !field.is_empty() && field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return (field, format!("{}: {}", path, message));
        }
    }

    if let Some(rest) = located.strip_prefix("missing field `") {
        if let Some((field, _)) = rest.split_once('`') {
            return (field, "This field is required.".to_string());
        }
    }

    (NON_FIELD_ERRORS, located.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::recipes::write::RecipeWriteRequest;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn extract_body(body: &str) -> Result<RecipeWriteRequest, ApiError> {
        let request = Request::builder()
            .method("POST")
            .uri("/api/recipes")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        ApiJson::<RecipeWriteRequest>::from_request(request, &())
            .await
            .map(|ApiJson(req)| req)
    }

    fn fields(error: ApiError) -> FieldErrors {
        match error {
            ApiError::Validation(fields) => fields,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_wrongly_typed_ingredient_is_keyed_by_field() {
        let error = extract_body(
            r#"{"ingredients":[{"id":"not-a-uuid","amount":"ten"}],"name":"Soup"}"#,
        )
        .await
        .unwrap_err();
        assert!(fields(error).contains("ingredients"));
    }

    #[tokio::test]
    async fn test_wrongly_typed_cooking_time_is_keyed_by_field() {
        let error = extract_body(r#"{"cooking_time":"soon"}"#).await.unwrap_err();
        assert!(fields(error).contains("cooking_time"));
    }

    #[tokio::test]
    async fn test_syntax_error_is_a_structured_400() {
        let error = extract_body("{\"name\": ").await.unwrap_err();
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);

        let error = extract_body("{").await.unwrap_err();
        assert!(fields(error).contains(NON_FIELD_ERRORS));
    }

    #[tokio::test]
    async fn test_missing_content_type_is_a_structured_400() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/recipes")
            .body(Body::from("{}"))
            .unwrap();
        let error = ApiJson::<RecipeWriteRequest>::from_request(request, &())
            .await
            .map(|_| ())
            .unwrap_err();
        assert!(fields(error).contains(NON_FIELD_ERRORS));
    }

    #[tokio::test]
    async fn test_non_uuid_path_id_is_not_found() {
        async fn handler(ApiPath(id): ApiPath<Uuid>) -> String {
            id.to_string()
        }
        let app = Router::new().route("/recipes/{id}", get(handler));

        let response = app
            .clone()
            .oneshot(Request::get("/recipes/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );

        let id = Uuid::new_v4();
        let response = app
            .oneshot(
                Request::get(format!("/recipes/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_split_data_error() {
        assert_eq!(
            split_data_error(
                "Failed to deserialize the JSON body into the target type: \
                 ingredients[0].id: UUID parsing failed at line 1 column 30"
            ),
            (
                "ingredients",
                "ingredients[0].id: UUID parsing failed at line 1 column 30".to_string()
            )
        );
        assert_eq!(
            split_data_error("missing field `password` at line 1 column 2").0,
            "password"
        );
        assert_eq!(
            split_data_error("invalid type: sequence, expected a map").0,
            NON_FIELD_ERRORS
        );
    }
}
