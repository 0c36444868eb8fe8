//! Behaviour tests for the architecture guardrails, run against a backend
//! tree written to a temporary directory.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use architecture_lint::{ArchitectureLintError, LintSource, Violation};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

#[derive(Default)]
struct LintWorld {
    sources: RefCell<Vec<LintSource>>,
    result: RefCell<Option<Result<(), ArchitectureLintError>>>,
}

impl LintWorld {
    fn add(&self, file: &str, contents: &str) {
        self.sources.borrow_mut().push(LintSource {
            file: PathBuf::from(file),
            contents: contents.to_owned(),
        });
    }

    fn violations(&self) -> Vec<Violation> {
        match self.result.borrow().as_ref().expect("lint must have run") {
            Err(ArchitectureLintError::Violations(violations)) => violations.clone(),
            other => panic!("expected violations, got {other:?}"),
        }
    }
}

#[fixture]
fn world() -> LintWorld {
    LintWorld::default()
}

#[given("a domain service, an HTTP handler and a repository adapter")]
fn a_clean_tree(world: &LintWorld) {
    world.add(
        "domain/credit_ledger_service.rs",
        "use crate::domain::ports::AccountRepository; use tracing::info; pub struct S;",
    );
    world.add(
        "inbound/http/users.rs",
        "use actix_web::{post, web}; use crate::domain::SignupRequest; fn f() {}",
    );
    world.add(
        "outbound/persistence/diesel_account_repository.rs",
        "use diesel::prelude::*; use crate::domain::ports::AccountRepository; pub struct R;",
    );
}

#[given("an HTTP handler that imports the in-memory repository")]
fn handler_imports_repository(world: &LintWorld) {
    world.add(
        "inbound/http/credits.rs",
        "use crate::outbound::memory::InMemoryAccountRepository; fn f() {}",
    );
}

#[given("a domain service that imports Argon2")]
fn domain_imports_argon2(world: &LintWorld) {
    world.add(
        "domain/account_service.rs",
        "use argon2::PasswordHasher; pub struct S;",
    );
}

#[given("a repository adapter that imports the HTTP state")]
fn repository_imports_http_state(world: &LintWorld) {
    world.add(
        "outbound/memory/mod.rs",
        "use crate::inbound::http::state::HttpState; pub struct R;",
    );
}

#[when("the architecture lint runs")]
fn the_lint_runs(world: &LintWorld) {
    let temp_dir = TempDir::new().expect("tempdir");
    let backend_dir = temp_dir.path().join("backend");
    for source in world.sources.borrow().iter() {
        let path = backend_dir.join("src").join(&source.file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent directories");
        }
        fs::write(&path, &source.contents).expect("write source file");
    }
    let result = architecture_lint::lint_backend_sources(&backend_dir);
    *world.result.borrow_mut() = Some(result);
}

#[then("the lint succeeds")]
fn the_lint_succeeds(world: &LintWorld) {
    let result = world.result.borrow();
    let outcome = result.as_ref().expect("lint must have run");
    assert!(outcome.is_ok(), "expected success, got {outcome:?}");
}

#[then("a violation in {file} mentions {text}")]
fn a_violation_mentions(world: &LintWorld, file: String, text: String) {
    let file = PathBuf::from(file.trim_matches('"'));
    let text = text.trim_matches('"');
    let violations = world.violations();
    assert!(
        violations
            .iter()
            .any(|v| v.file == file && v.message.contains(text)),
        "expected a violation in {file:?} mentioning '{text}', got {violations:?}"
    );
}

#[then("{count} files are reported")]
fn files_are_reported(world: &LintWorld, count: usize) {
    let files: BTreeSet<PathBuf> = world.violations().into_iter().map(|v| v.file).collect();
    assert_eq!(files.len(), count, "reported files: {files:?}");
}

#[scenario(path = "tests/features/architecture_guardrails.feature", name = "A clean tree passes")]
fn clean_tree_passes(world: LintWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/architecture_guardrails.feature",
    name = "The HTTP adapter may not reach the persistence adapter"
)]
fn inbound_cannot_reach_outbound(world: LintWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/architecture_guardrails.feature",
    name = "The domain stays free of password hashing"
)]
fn domain_has_no_password_hashing(world: LintWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/architecture_guardrails.feature",
    name = "Adapters may not depend on each other"
)]
fn outbound_cannot_reach_inbound(world: LintWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/architecture_guardrails.feature",
    name = "Every offending file is reported"
)]
fn every_offending_file_is_reported(world: LintWorld) {
    drop(world);
}
