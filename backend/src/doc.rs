//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer together
//! with its request and response schemas, plus the bearer token security
//! scheme. Swagger UI serves it in debug builds and `openapi-dump` prints it
//! for external tooling.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::credits::{CreditCheckResponse, CreditsResponse, DeductResponse};
use crate::inbound::http::users::{
    AuthResponse, LoginRequest, ProfileResponse, SignupRequestBody, UserResponse,
};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Token returned by POST /api/v1/auth/signup or /api/v1/auth/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Bloom backend API",
        description = "Account signup, login and the per-prediction credit ledger."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("bearerAuth" = [])),
    paths(
        crate::inbound::http::users::signup,
        crate::inbound::http::users::login,
        crate::inbound::http::users::current_profile,
        crate::inbound::http::credits::get_credits,
        crate::inbound::http::credits::check_credits,
        crate::inbound::http::credits::deduct_credits,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        SignupRequestBody,
        LoginRequest,
        AuthResponse,
        UserResponse,
        ProfileResponse,
        CreditsResponse,
        CreditCheckResponse,
        DeductResponse,
    )),
    tags(
        (name = "auth", description = "Signup and login"),
        (name = "users", description = "Account profile"),
        (name = "credits", description = "Credit balance and per-prediction deductions"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
