//! End-to-end HTTP flows over the in-memory account store.
//!
//! Every adapter is real here: Argon2 hashing, HS256 tokens, the credit
//! ledger and the trace middleware. Only PostgreSQL is swapped for the
//! in-process repository.

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::{App, test, web};
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::{Value, json};

use bloom_backend::Trace;
use bloom_backend::domain::{AccountService, CreditLedgerService, TRACE_ID_HEADER};
use bloom_backend::inbound::http::credits::{check_credits, deduct_credits, get_credits};
use bloom_backend::inbound::http::error::json_config;
use bloom_backend::inbound::http::state::{HttpState, HttpStatePorts};
use bloom_backend::inbound::http::users::{current_profile, login, signup};
use bloom_backend::outbound::memory::InMemoryAccountRepository;
use bloom_backend::outbound::security::{Argon2CredentialHasher, JwtTokenService};

const SIGNING_KEY: &[u8] = b"an-integration-test-signing-key-of-32+";

fn http_state() -> HttpState {
    let clock = Arc::new(DefaultClock);
    let accounts = Arc::new(InMemoryAccountRepository::new());
    let tokens = Arc::new(JwtTokenService::new(
        SIGNING_KEY,
        chrono::Duration::hours(1),
        clock.clone(),
    ));
    let service = Arc::new(AccountService::new(
        accounts.clone(),
        Arc::new(Argon2CredentialHasher::new()),
        tokens.clone(),
        clock,
    ));
    HttpState::new(HttpStatePorts {
        signup: service.clone(),
        login: service.clone(),
        profile: service,
        ledger: Arc::new(CreditLedgerService::new(accounts)),
        tokens,
    })
}

async fn app() -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .app_data(web::Data::new(http_state()))
            .app_data(json_config())
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .service(signup)
                    .service(login)
                    .service(current_profile)
                    .service(get_credits)
                    .service(check_credits)
                    .service(deduct_credits),
            ),
    )
    .await
}

async fn send(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    request: test::TestRequest,
) -> (StatusCode, Value) {
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let body: Value = test::read_body_json(response).await;
    (status, body)
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

async fn sign_up(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    email: &str,
) -> String {
    let (status, body) = send(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/signup")
            .set_json(json!({ "name": "Ada", "email": email, "password": "hunter22" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
    body["token"].as_str().expect("token").to_owned()
}

#[rstest]
#[actix_web::test]
async fn signup_login_and_spend_credits() {
    let app = app().await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/signup")
            .set_json(json!({
                "name": "Ada",
                "email": "Ada@Example.com",
                "password": "hunter22"
            })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["user"]["credits"], 4.0);
    assert_eq!(body["user"]["totalPredictions"], 0);

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "email": "ada@example.com", "password": "hunter22" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().expect("token").to_owned();

    let (status, body) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/user/credits")
            .insert_header(bearer(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["credits"], 4.0);
    assert_eq!(body["remainingPredictions"], 100);

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/user/credits/check")
            .insert_header(bearer(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hasEnoughCredits"], true);
    assert_eq!(body["required"], 0.04);

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/user/credits/deduct")
            .insert_header(bearer(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Credits deducted successfully");
    assert_eq!(body["credits"], 3.96);
    assert_eq!(body["remainingPredictions"], 99);

    let (status, body) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/user/profile")
            .insert_header(bearer(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["totalPredictions"], 1);
    assert_eq!(body["user"]["credits"], 3.96);
}

#[rstest]
#[actix_web::test]
async fn draining_the_balance_forbids_further_deductions() {
    let app = app().await;
    let token = sign_up(&app, "grace@example.com").await;

    for _ in 0..100 {
        let (status, _) = send(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/user/credits/deduct")
                .insert_header(bearer(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/user/credits/check")
            .insert_header(bearer(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hasEnoughCredits"], false);
    assert_eq!(body["credits"], 0.0);

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/user/credits/deduct")
            .insert_header(bearer(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "insufficient_credits");
    assert_eq!(body["details"]["required"], 0.04);
}

#[rstest]
#[actix_web::test]
async fn duplicate_emails_conflict() {
    let app = app().await;
    sign_up(&app, "lin@example.com").await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/signup")
            .set_json(json!({
                "name": "Lin",
                "email": "LIN@example.com",
                "password": "another-pass"
            })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");
}

#[rstest]
#[actix_web::test]
async fn wrong_password_is_unauthorised() {
    let app = app().await;
    sign_up(&app, "kay@example.com").await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "email": "kay@example.com", "password": "not-it" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
}

#[rstest]
#[case("/api/v1/user/credits", None)]
#[case("/api/v1/user/profile", Some("Bearer not-a-jwt"))]
#[actix_web::test]
async fn protected_routes_require_a_valid_token(
    #[case] path: &str,
    #[case] authorization: Option<&str>,
) {
    let app = app().await;
    let mut request = test::TestRequest::get().uri(path);
    if let Some(value) = authorization {
        request = request.insert_header((header::AUTHORIZATION, value));
    }

    let response = test::call_service(&app, request.to_request()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key(TRACE_ID_HEADER));
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "unauthorized");
    assert!(body["traceId"].is_string());
}

#[rstest]
#[case(json!({ "email": "ada@example.com" }).to_string(), "name", "missing_field")]
#[case(r#"{"name": "Ada", "email": "#.to_owned(), "body", "malformed_json")]
#[actix_web::test]
async fn malformed_signup_bodies_use_the_error_envelope(
    #[case] payload: String,
    #[case] field: &str,
    #[case] code: &str,
) {
    let app = app().await;
    let request = test::TestRequest::post()
        .uri("/api/v1/auth/signup")
        .insert_header(header::ContentType::json())
        .set_payload(payload);

    let response = test::call_service(&app, request.to_request()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().contains_key(TRACE_ID_HEADER));
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
    assert!(body["traceId"].is_string());
}
