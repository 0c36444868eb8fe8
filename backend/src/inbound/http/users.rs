//! Account HTTP handlers: signup, login and profile.
//!
//! ```text
//! POST /api/v1/auth/signup {"name":"Ada","email":"ada@example.com","password":"..."}
//! POST /api/v1/auth/login {"email":"ada@example.com","password":"..."}
//! GET /api/v1/user/profile
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    Account, AuthenticatedAccount, Error, LoginCredentials, LoginValidationError, SignupRequest,
    SignupValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Signup request body for `POST /api/v1/auth/signup`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequestBody {
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "correct horse battery")]
    pub password: String,
}

/// Login request body for `POST /api/v1/auth/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

impl TryFrom<SignupRequestBody> for SignupRequest {
    type Error = SignupValidationError;

    fn try_from(value: SignupRequestBody) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.name, &value.email, &value.password)
    }
}

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[schema(example = 4.0)]
    pub credits: f64,
    pub total_predictions: u64,
    #[schema(example = "2026-01-15T09:30:00Z")]
    pub created_at: String,
}

impl From<&Account> for UserResponse {
    fn from(account: &Account) -> Self {
        let balance = account.balance();
        Self {
            id: account.id().to_string(),
            name: account.name().to_string(),
            email: account.email().to_string(),
            credits: balance.credits().as_decimal(),
            total_predictions: balance.total_predictions(),
            created_at: account.created_at().to_rfc3339(),
        }
    }
}

/// Response for signup and login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

impl From<AuthenticatedAccount> for AuthResponse {
    fn from(value: AuthenticatedAccount) -> Self {
        Self {
            token: value.token.as_str().to_owned(),
            user: UserResponse::from(&value.account),
        }
    }
}

/// Response for `GET /api/v1/user/profile`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user: UserResponse,
}

fn map_signup_validation_error(err: SignupValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": err.field(),
        "code": err.code(),
    }))
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyEmail => Error::invalid_request("email must not be empty")
            .with_details(json!({ "field": "email", "code": "empty_email" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// Register an account with the default credit balance.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = SignupRequestBody,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signup",
    security(())
)]
#[post("/auth/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequestBody>,
) -> ApiResult<HttpResponse> {
    let request =
        SignupRequest::try_from(payload.into_inner()).map_err(map_signup_validation_error)?;
    let authenticated = state.signup.signup(&request).await?;
    Ok(HttpResponse::Created().json(AuthResponse::from(authenticated)))
}

/// Exchange email and password for a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AuthResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security(())
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AuthResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let authenticated = state.login.login(&credentials).await?;
    Ok(web::Json(AuthResponse::from(authenticated)))
}

/// Fetch the caller's profile.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use bloom_backend::inbound::http::users::current_profile;
///
/// let app = App::new().service(current_profile);
/// ```
#[utoipa::path(
    get,
    path = "/api/v1/user/profile",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentProfile",
    security(("bearerAuth" = []))
)]
#[get("/user/profile")]
pub async fn current_profile(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<ProfileResponse>> {
    let account = state.profile.fetch_profile(user.user_id()).await?;
    Ok(web::Json(ProfileResponse {
        user: UserResponse::from(&account),
    }))
}
