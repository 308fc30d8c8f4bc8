use axum::{Router, middleware, routing::get};

use super::controller::ping;
use crate::middleware::auth::require_auth;
use crate::middleware::role::require_admin_or_manager;
use crate::state::AppState;

/// Layers run bottom-up: `require_auth` attaches claims before the role check reads them.
pub fn init_admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping))
        .route_layer(middleware::from_fn(require_admin_or_manager))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
