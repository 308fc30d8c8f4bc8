use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{confirm_account, login, refresh, register};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/confirm-account", get(confirm_account))
        .route("/refresh", post(refresh))
}
