use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{
    AppState,
    handlers::{health, users},
};

pub mod paths {
    pub const ROOT: &str = "/";
    pub const USERS: &str = "/users";
    pub const USER: &str = "/users/{id}";
    pub const USER_PASSWORD: &str = "/users/{id}/password";
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(paths::ROOT, get(health::health_handler))
        .route(
            paths::USERS,
            post(users::create_user_handler).get(users::list_users_handler),
        )
        .route(
            paths::USER,
            get(users::get_user_handler)
                .patch(users::update_user_handler)
                .delete(users::delete_user_handler),
        )
        .route(
            paths::USER_PASSWORD,
            post(users::change_password_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
