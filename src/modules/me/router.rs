use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::controller::{get_profile, logout, update_profile};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn init_me_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile).put(update_profile))
        .route("/logout", post(logout))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
