//! Unit tests for the architecture lint.

use std::path::PathBuf;

use rstest::rstest;

use super::*;

fn lint_one(file: &str, contents: &str) -> Result<(), ArchitectureLintError> {
    lint_sources(&[LintSource {
        file: PathBuf::from(file),
        contents: contents.to_owned(),
    }])
}

#[rstest]
#[case("inbound/http/credits.rs", "use crate::domain::ports::CreditLedger; fn f() {}")]
#[case("domain/user.rs", "use utoipa::ToSchema; #[derive(ToSchema)] struct Foo;")]
#[case("domain/credits.rs", "use serde::Serialize; fn f() { let _ = chrono::Utc::now(); }")]
#[case("outbound/persistence/pool.rs", "use diesel_async::AsyncPgConnection; fn f() {}")]
#[case("outbound/security/argon2_hasher.rs", "use argon2::Argon2; fn f() {}")]
#[case("inbound/http/token_config.rs", "use sha2::Sha256; use zeroize::Zeroizing; fn f() {}")]
fn permitted_dependencies_pass(#[case] file: &str, #[case] contents: &str) {
    let result = lint_one(file, contents);
    assert!(result.is_ok(), "result: {result:?}");
}

#[rstest]
#[case(
    "inbound/http/state.rs",
    "use crate::outbound::memory::InMemoryAccountRepository; fn f() {}",
    "crate::outbound"
)]
#[case(
    "inbound/http/state.rs",
    "use bloom_backend::outbound::memory; fn f() {}",
    "crate::outbound"
)]
#[case(
    "inbound/http/state.rs",
    "fn f() { let _ = super::super::outbound::memory::InMemoryAccountRepository::new(); }",
    "crate::outbound"
)]
#[case("inbound/http/users.rs", "use diesel::prelude::*; fn f() {}", "`diesel`")]
#[case("inbound/http/auth.rs", "use jsonwebtoken::decode; fn f() {}", "`jsonwebtoken`")]
#[case("domain/account_service.rs", "use argon2::Argon2; fn f() {}", "`argon2`")]
#[case("domain/error.rs", "fn f() -> actix_web::HttpResponse { todo!() }", "`actix_web`")]
#[case("domain/user.rs", "use crate::inbound::http; fn f() {}", "crate::inbound")]
#[case("outbound/memory/mod.rs", "use crate::inbound::http::state; fn f() {}", "crate::inbound")]
#[case("outbound/persistence/pool.rs", "use actix_web::web; fn f() {}", "`actix_web`")]
fn boundary_violations_are_reported(
    #[case] file: &str,
    #[case] contents: &str,
    #[case] expected: &str,
) {
    match lint_one(file, contents) {
        Err(ArchitectureLintError::Violations(violations)) => {
            assert!(
                violations
                    .iter()
                    .any(|v| v.file == PathBuf::from(file) && v.message.contains(expected)),
                "expected '{expected}' in {violations:?}"
            );
        }
        other => panic!("expected violations, got {other:?}"),
    }
}

#[rstest]
fn files_outside_the_layers_are_rejected() {
    assert!(matches!(
        lint_one("main.rs", "fn main() {}"),
        Err(ArchitectureLintError::Parse { .. })
    ));
}

#[rstest]
fn repeated_imports_are_reported_once() {
    let result = lint_one(
        "domain/auth.rs",
        "use actix_web::web; use actix_web::HttpResponse; fn f() {}",
    );
    match result {
        Err(ArchitectureLintError::Violations(violations)) => assert_eq!(violations.len(), 1),
        other => panic!("expected violations, got {other:?}"),
    }
}
