//! Actix response mapping for domain errors.
//!
//! The domain error stays transport-agnostic; this module picks the status
//! code, echoes the trace id as a header and keeps server-side detail out of
//! response bodies.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, web};
use serde_json::error::Category;
use serde_json::json;
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const INTERNAL_MESSAGE: &str = "Internal server error";
const UNAVAILABLE_MESSAGE: &str = "Service temporarily unavailable";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        // Credits are prepaid: an empty balance is a refusal, not a 402.
        ErrorCode::InsufficientCredits => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// The body a client is allowed to see.
///
/// Server-side failures are logged in full and replaced by a fixed message;
/// everything else passes through untouched.
fn public_view(err: &Error) -> Error {
    let replacement = match err.code() {
        ErrorCode::InternalError => {
            error!(message = err.message(), trace_id = ?err.trace_id(), "request failed");
            Error::internal(INTERNAL_MESSAGE)
        }
        ErrorCode::ServiceUnavailable => {
            warn!(message = err.message(), trace_id = ?err.trace_id(), "dependency unavailable");
            Error::service_unavailable(UNAVAILABLE_MESSAGE)
        }
        _ => return err.clone(),
    };
    match err.trace_id() {
        Some(id) => replacement.with_trace_id(id),
        None => replacement,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id));
        }
        response.json(public_view(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Self::internal(INTERNAL_MESSAGE)
    }
}

/// JSON body configuration whose rejections use the [`Error`] envelope.
///
/// Register it as app data wherever handlers take `web::Json<_>`, otherwise
/// actix answers malformed bodies with a plain-text 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    payload_error(&err).into()
}

/// The JSON key serde reported as absent, if that is what went wrong.
fn missing_field(err: &serde_json::Error) -> Option<String> {
    let message = err.to_string();
    let rest = message.strip_prefix("missing field `")?;
    rest.split('`').next().map(str::to_owned)
}

fn payload_error(err: &JsonPayloadError) -> Error {
    let (message, field, code) = match err {
        JsonPayloadError::ContentType => (
            "request body must be application/json".to_owned(),
            "body".to_owned(),
            "unsupported_content_type",
        ),
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => (
            "request body is too large".to_owned(),
            "body".to_owned(),
            "payload_too_large",
        ),
        JsonPayloadError::Deserialize(inner) if inner.classify() == Category::Data => {
            match missing_field(inner) {
                Some(field) => (format!("{field} is required"), field, "missing_field"),
                None => (
                    "request body has a field of the wrong type".to_owned(),
                    "body".to_owned(),
                    "invalid_field",
                ),
            }
        }
        _ => (
            "request body is not valid JSON".to_owned(),
            "body".to_owned(),
            "malformed_json",
        ),
    };
    Error::invalid_request(message).with_details(json!({ "field": field, "code": code }))
}
