//! OpenAPI document and the optional Swagger UI.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::dto::{AuthenticationRequest, AuthenticationResponse, CreateUserRequest};
use super::handlers;
use crate::auth::PublicAllowlist;
use crate::domain::{Album, UserProfile};
use crate::error::{ErrorBody, ErrorResponse};

/// Path of the generated OpenAPI JSON document.
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Mount point of the Swagger UI.
pub const SWAGGER_UI_PATH: &str = "/swagger-ui";

/// The gateway's OpenAPI document.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "users-gateway",
        description = "User accounts over REST with stateless bearer authentication and a live registration stream."
    ),
    paths(
        handlers::auth::login,
        handlers::user::create_user,
        handlers::user::get_user,
        handlers::user::list_users,
        handlers::stream::stream_users,
        handlers::system::health_handler,
    ),
    components(schemas(
        UserProfile,
        Album,
        CreateUserRequest,
        AuthenticationRequest,
        AuthenticationResponse,
        ErrorResponse,
        ErrorBody,
        handlers::system::HealthResponse,
    )),
    modifiers(&BearerSecurity),
    tags(
        (name = "Auth", description = "Login"),
        (name = "Users", description = "Registration, reads and the registration stream"),
        (name = "System", description = "Health"),
    )
)]
pub struct ApiDoc;

#[derive(Debug)]
struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Adds the documentation routes to `allowlist` so they need no token.
#[must_use]
pub fn allow_docs(allowlist: PublicAllowlist) -> PublicAllowlist {
    allowlist
        .allow(axum::http::Method::GET, SWAGGER_UI_PATH)
        .allow(axum::http::Method::GET, "/swagger-ui/{file}")
        .allow(axum::http::Method::GET, OPENAPI_JSON_PATH)
}

/// Swagger UI serving [`ApiDoc`].
#[cfg(feature = "swagger-ui")]
#[must_use]
pub fn swagger_ui() -> utoipa_swagger_ui::SwaggerUi {
    utoipa_swagger_ui::SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_JSON_PATH, ApiDoc::openapi())
}
