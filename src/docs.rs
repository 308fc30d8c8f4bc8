use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use staybook_models::{
    LoginRequest, MessageResponse, RefreshTokenRequest, RegisterRequest, RoleInfo, TokenPair,
    UpdateProfileRequest, UserResponse,
};

use crate::modules::auth::controller::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::confirm_account,
        crate::modules::auth::controller::refresh,
        crate::modules::me::controller::get_profile,
        crate::modules::me::controller::update_profile,
        crate::modules::me::controller::logout,
        crate::modules::admin::controller::ping,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            RefreshTokenRequest,
            UpdateProfileRequest,
            TokenPair,
            UserResponse,
            RoleInfo,
            MessageResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, email confirmation and sessions"),
        (name = "Me", description = "The authenticated user's own account"),
        (name = "Admin", description = "Staff-only endpoints")
    ),
    info(
        title = "Staybook API",
        version = "0.1.0",
        description = "Authentication and session API of the Staybook booking marketplace.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
