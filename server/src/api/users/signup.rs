use crate::api::error::{ApiError, ValidationErrorResponse};
use crate::api::extract::ApiJson;
use crate::auth::hash_password;
use crate::db::DbPool;
use crate::models::{NewUser, User};
use crate::schema::users;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use foodgram_core::{validate_signup, SignupDraft};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SignupResponse {
    pub email: String,
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// Map a unique-index violation on `users` to the field it concerns.
fn duplicate_field(error: DieselError) -> ApiError {
    let constraint = match &error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            info.constraint_name().map(str::to_owned)
        }
        _ => None,
    };

    match constraint.as_deref() {
        Some("users_email_key") => {
            ApiError::field("email", "A user with this email already exists")
        }
        Some("users_username_key") => {
            ApiError::field("username", "A user with this username already exists")
        }
        _ => error.into(),
    }
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body(content = SignupRequest, example = json!({
        "email": "cook@example.com",
        "username": "cook",
        "first_name": "Jane",
        "last_name": "Doe",
        "password": "correct-horse"
    })),
    responses(
        (status = 201, description = "User created", body = SignupResponse),
        (status = 400, description = "Invalid or duplicate fields", body = ValidationErrorResponse)
    )
)]
pub async fn signup(
    State(pool): State<Arc<DbPool>>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = req.email.trim().to_lowercase();
    let username = req.username.trim();

    validate_signup(&SignupDraft {
        email: &email,
        username,
        first_name: &req.first_name,
        last_name: &req.last_name,
        password: &req.password,
    })?;

    let password_hash = hash_password(&req.password)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))?;

    let mut conn = pool.get()?;

    let new_user = NewUser {
        email: &email,
        username,
        first_name: req.first_name.trim(),
        last_name: req.last_name.trim(),
        password_hash: &password_hash,
    };

    let user: User = diesel::insert_into(users::table)
        .values(&new_user)
        .returning(User::as_returning())
        .get_result(&mut conn)
        .map_err(duplicate_field)?;

    tracing::info!(user_id = %user.id, "user signed up");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_violation(constraint: &'static str) -> DieselError {
        #[derive(Debug)]
        struct Info(&'static str);

        impl diesel::result::DatabaseErrorInformation for Info {
            fn message(&self) -> &str {
                "duplicate key value violates unique constraint"
            }
            fn details(&self) -> Option<&str> {
                None
            }
            fn hint(&self) -> Option<&str> {
                None
            }
            fn table_name(&self) -> Option<&str> {
                Some("users")
            }
            fn column_name(&self) -> Option<&str> {
                None
            }
            fn constraint_name(&self) -> Option<&str> {
                Some(self.0)
            }
            fn statement_position(&self) -> Option<i32> {
                None
            }
        }

        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, Box::new(Info(constraint)))
    }

    #[test]
    fn test_duplicate_email_is_a_field_error() {
        match duplicate_field(unique_violation("users_email_key")) {
            ApiError::Validation(fields) => assert!(fields.contains("email")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_username_is_a_field_error() {
        match duplicate_field(unique_violation("users_username_key")) {
            ApiError::Validation(fields) => assert!(fields.contains("username")),
            other => panic!("unexpected {:?}", other),
        }
    }
}
