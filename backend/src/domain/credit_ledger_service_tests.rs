//! Tests for the credit ledger service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::MockAccountRepository;
use crate::domain::{
    Account, AccountParts, EmailAddress, ErrorCode, UNIT_COST, UserName,
};
use chrono::Utc;
use mockall::predicate::eq;
use rstest::{fixture, rstest};
use serde_json::json;

fn account_with(hundredths: u64, total_predictions: u64) -> Account {
    Account::from_parts(AccountParts {
        id: UserId::random(),
        name: UserName::new("Ada").expect("valid name"),
        email: EmailAddress::new("ada@example.com").expect("valid email"),
        credits: Credits::from_hundredths(hundredths),
        total_predictions,
        created_at: Utc::now(),
    })
}

fn make_service(repo: MockAccountRepository) -> CreditLedgerService<MockAccountRepository> {
    CreditLedgerService::new(Arc::new(repo))
}

#[fixture]
fn user_id() -> UserId {
    UserId::random()
}

#[rstest]
#[tokio::test]
async fn balance_reports_derived_remaining_predictions(user_id: UserId) {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(Some(account_with(400, 0))));

    let balance = make_service(repo)
        .balance(&user_id)
        .await
        .expect("balance succeeds");

    assert_eq!(balance.credits(), Credits::from_hundredths(400));
    assert_eq!(balance.total_predictions(), 0);
    assert_eq!(balance.remaining_predictions(), 100);
}

#[rstest]
#[tokio::test]
async fn balance_fails_for_unknown_accounts(user_id: UserId) {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_id().times(1).return_once(|_| Ok(None));

    let error = make_service(repo)
        .balance(&user_id)
        .await
        .expect_err("missing account");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(3, false)]
#[case(4, true)]
#[case(400, true)]
#[tokio::test]
async fn has_sufficient_credits_compares_against_cost(
    user_id: UserId,
    #[case] hundredths: u64,
    #[case] expected: bool,
) {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(account_with(hundredths, 0))));

    let sufficient = make_service(repo)
        .has_sufficient_credits(&user_id, UNIT_COST)
        .await
        .expect("check succeeds");
    assert_eq!(sufficient, expected);
}

#[rstest]
#[tokio::test]
async fn deduct_returns_the_updated_balance(user_id: UserId) {
    let mut repo = MockAccountRepository::new();
    repo.expect_try_deduct()
        .with(eq(user_id.clone()), eq(UNIT_COST))
        .times(1)
        .return_once(|_, _| {
            Ok(DeductionOutcome::Applied(CreditBalance::new(
                Credits::from_hundredths(396),
                1,
            )))
        });

    let balance = make_service(repo)
        .deduct(&user_id, UNIT_COST)
        .await
        .expect("deduction succeeds");
    assert_eq!(balance.credits(), Credits::from_hundredths(396));
    assert_eq!(balance.remaining_predictions(), 99);
}

#[rstest]
#[tokio::test]
async fn deduct_surfaces_balance_and_requirement_when_short(user_id: UserId) {
    let mut repo = MockAccountRepository::new();
    repo.expect_try_deduct().times(1).return_once(|_, _| {
        Ok(DeductionOutcome::Insufficient(CreditBalance::new(
            Credits::from_hundredths(3),
            99,
        )))
    });

    let error = make_service(repo)
        .deduct(&user_id, UNIT_COST)
        .await
        .expect_err("insufficient credits");
    assert_eq!(error.code(), ErrorCode::InsufficientCredits);
    assert_eq!(
        error.details(),
        Some(&json!({ "credits": 0.03, "required": 0.04 }))
    );
}

#[rstest]
#[tokio::test]
async fn deduct_fails_for_unknown_accounts(user_id: UserId) {
    let mut repo = MockAccountRepository::new();
    repo.expect_try_deduct()
        .times(1)
        .return_once(|_, _| Ok(DeductionOutcome::AccountMissing));

    let error = make_service(repo)
        .deduct(&user_id, UNIT_COST)
        .await
        .expect_err("missing account");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn deduct_rejects_zero_amounts_without_touching_the_store(user_id: UserId) {
    let mut repo = MockAccountRepository::new();
    repo.expect_try_deduct().never();

    let error = make_service(repo)
        .deduct(&user_id, Credits::ZERO)
        .await
        .expect_err("zero amount");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[case(AccountRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(AccountRepositoryError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn deduct_maps_repository_failures(
    user_id: UserId,
    #[case] failure: AccountRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockAccountRepository::new();
    repo.expect_try_deduct()
        .times(1)
        .return_once(move |_, _| Err(failure));

    let error = make_service(repo)
        .deduct(&user_id, UNIT_COST)
        .await
        .expect_err("repository failure");
    assert_eq!(error.code(), expected);
}
