pub mod avatar;
pub mod get;
pub mod list;
pub mod set_password;
pub mod signup;
pub mod subscribe;
pub mod subscriptions;
pub mod view;

use crate::AppState;
use axum::routing::{get, post, put};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/users endpoints (mounted at /api/users)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_users).post(signup::signup))
        .route("/me", get(get::get_me))
        .route(
            "/me/avatar",
            put(avatar::put_avatar).delete(avatar::delete_avatar),
        )
        .route("/set_password", post(set_password::set_password))
        .route("/subscriptions", get(subscriptions::list_subscriptions))
        .route("/{id}", get(get::get_user))
        .route(
            "/{id}/subscribe",
            post(subscribe::subscribe).delete(subscribe::unsubscribe),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        signup::signup,
        list::list_users,
        get::get_user,
        get::get_me,
        set_password::set_password,
        avatar::put_avatar,
        avatar::delete_avatar,
        subscribe::subscribe,
        subscribe::unsubscribe,
        subscriptions::list_subscriptions,
    ),
    components(schemas(
        signup::SignupRequest,
        signup::SignupResponse,
        set_password::SetPasswordRequest,
        avatar::AvatarRequest,
        avatar::AvatarResponse,
        view::UserResponse,
        view::SubscriptionResponse,
    ))
)]
pub struct ApiDoc;
