use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::models::User;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::db::get_user_from_token;

/// Extractor that validates the Authorization header and provides the authenticated user.
///
/// Use this in any handler that requires authentication:
/// ```ignore
/// async fn my_handler(AuthUser(user): AuthUser) -> impl IntoResponse {
///     // user is the authenticated User
/// }
/// ```
pub struct AuthUser(pub User);

/// Like [`AuthUser`], but anonymous requests are let through as `None`.
///
/// A header that is present but invalid is still rejected.
pub struct MaybeAuthUser(pub Option<User>);

impl MaybeAuthUser {
    pub fn id(&self) -> Option<uuid::Uuid> {
        self.0.as_ref().map(|user| user.id)
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingHeader,
    InvalidHeader,
    InvalidFormat,
    InvalidToken,
    Unavailable,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingHeader => (
                StatusCode::UNAUTHORIZED,
                "Authentication credentials were not provided",
            ),
            AuthError::InvalidHeader => (StatusCode::UNAUTHORIZED, "Invalid Authorization header"),
            AuthError::InvalidFormat => (
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header format",
            ),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid or expired token"),
            AuthError::Unavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database connection failed",
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}

/// Token from `Authorization: Token <t>` or `Authorization: Bearer <t>`.
/// `Ok(None)` when the header is absent.
pub fn token_from_headers(headers: &HeaderMap) -> Result<Option<&str>, AuthError> {
    let Some(auth_header) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header.to_str().map_err(|_| AuthError::InvalidHeader)?;

    auth_str
        .strip_prefix("Token ")
        .or_else(|| auth_str.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(Some)
        .ok_or(AuthError::InvalidFormat)
}

fn authenticate(pool: &DbPool, token: &str) -> Result<User, AuthError> {
    let mut conn = pool.get().map_err(|e| {
        tracing::error!("Failed to get DB connection for auth: {}", e);
        AuthError::Unavailable
    })?;
    get_user_from_token(&mut conn, token).ok_or(AuthError::InvalidToken)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<DbPool>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pool = Arc::<DbPool>::from_ref(state);
        let token = token_from_headers(&parts.headers)?.ok_or(AuthError::MissingHeader)?;
        authenticate(&pool, token).map(AuthUser)
    }
}

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    Arc<DbPool>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pool = Arc::<DbPool>::from_ref(state);
        match token_from_headers(&parts.headers)? {
            Some(token) => authenticate(&pool, token).map(|user| MaybeAuthUser(Some(user))),
            None => Ok(MaybeAuthUser(None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_token_and_bearer_schemes() {
        assert_eq!(token_from_headers(&headers("Token abc")).unwrap(), Some("abc"));
        assert_eq!(token_from_headers(&headers("Bearer abc")).unwrap(), Some("abc"));
    }

    #[test]
    fn test_missing_header_is_anonymous() {
        assert_eq!(token_from_headers(&HeaderMap::new()).unwrap(), None);
    }

    #[test]
    fn test_unknown_scheme_rejected() {
        assert!(matches!(
            token_from_headers(&headers("Basic dXNlcjpwYXNz")),
            Err(AuthError::InvalidFormat)
        ));
        assert!(matches!(
            token_from_headers(&headers("Token ")),
            Err(AuthError::InvalidFormat)
        ));
    }
}
