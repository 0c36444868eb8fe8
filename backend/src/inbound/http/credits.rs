//! Credit ledger HTTP handlers.
//!
//! ```text
//! GET /api/v1/user/credits
//! POST /api/v1/user/credits/check
//! POST /api/v1/user/credits/deduct
//! ```
//!
//! Every prediction costs [`UNIT_COST`]. The check endpoint is advisory; only
//! the deduct endpoint guarantees the balance covers the charge.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CreditBalance, Error, UNIT_COST};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Response for `GET /api/v1/user/credits`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreditsResponse {
    #[schema(example = 4.0)]
    pub credits: f64,
    pub total_predictions: u64,
    #[schema(example = 100)]
    pub remaining_predictions: u64,
}

impl From<CreditBalance> for CreditsResponse {
    fn from(balance: CreditBalance) -> Self {
        Self {
            credits: balance.credits().as_decimal(),
            total_predictions: balance.total_predictions(),
            remaining_predictions: balance.remaining_predictions(),
        }
    }
}

/// Response for `POST /api/v1/user/credits/check`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreditCheckResponse {
    pub has_enough_credits: bool,
    pub credits: f64,
    #[schema(example = 0.04)]
    pub required: f64,
}

/// Response for `POST /api/v1/user/credits/deduct`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeductResponse {
    #[schema(example = "Credits deducted successfully")]
    pub message: String,
    pub credits: f64,
    pub remaining_predictions: u64,
}

/// Current balance of the caller.
#[utoipa::path(
    get,
    path = "/api/v1/user/credits",
    responses(
        (status = 200, description = "Credit balance", body = CreditsResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account not found", body = Error),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["credits"],
    operation_id = "getCredits",
    security(("bearerAuth" = []))
)]
#[get("/user/credits")]
pub async fn get_credits(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<CreditsResponse>> {
    let balance = state.ledger.balance(user.user_id()).await?;
    Ok(web::Json(CreditsResponse::from(balance)))
}

/// Whether the caller can pay for one prediction.
///
/// Eligibility and the reported balance come from one snapshot. The answer
/// may be stale by the time a deduction runs.
#[utoipa::path(
    post,
    path = "/api/v1/user/credits/check",
    responses(
        (status = 200, description = "Eligibility", body = CreditCheckResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["credits"],
    operation_id = "checkCredits",
    security(("bearerAuth" = []))
)]
#[post("/user/credits/check")]
pub async fn check_credits(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<CreditCheckResponse>> {
    let balance = state.ledger.balance(user.user_id()).await?;
    Ok(web::Json(CreditCheckResponse {
        has_enough_credits: balance.credits().covers(UNIT_COST),
        credits: balance.credits().as_decimal(),
        required: UNIT_COST.as_decimal(),
    }))
}

/// Charge the caller for one prediction.
#[utoipa::path(
    post,
    path = "/api/v1/user/credits/deduct",
    responses(
        (status = 200, description = "Credits deducted", body = DeductResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Insufficient credits", body = Error),
        (status = 404, description = "Account not found", body = Error),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["credits"],
    operation_id = "deductCredits",
    security(("bearerAuth" = []))
)]
#[post("/user/credits/deduct")]
pub async fn deduct_credits(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<DeductResponse>> {
    let balance = state.ledger.deduct(user.user_id(), UNIT_COST).await?;
    Ok(web::Json(DeductResponse {
        message: "Credits deducted successfully".to_owned(),
        credits: balance.credits().as_decimal(),
        remaining_predictions: balance.remaining_predictions(),
    }))
}
