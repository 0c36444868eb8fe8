//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.
//!
//! Deduction is one `UPDATE ... WHERE credit_hundredths >= $amount RETURNING`
//! statement. PostgreSQL row locking makes concurrent deductions against the
//! same account serialise, and the `WHERE` clause is re-evaluated against the
//! latest committed row, so the balance can never go negative.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, DeductionOutcome, StoredCredentials,
};
use crate::domain::{
    Account, AccountParts, CreditBalance, Credits, EmailAddress, PasswordHash, UserId, UserName,
};

use super::models::{AccountRow, BalanceRow, NewAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `AccountRepository` port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AccountRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            AccountRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> AccountRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => AccountRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => AccountRepositoryError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            AccountRepositoryError::connection("database connection error")
        }
        _ => AccountRepositoryError::query("database error"),
    }
}

/// Insert failures: a unique violation can only be the email index, since
/// ids are random UUIDs.
fn map_insert_error(error: diesel::result::Error, email: &EmailAddress) -> AccountRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            AccountRepositoryError::duplicate_email(email.as_ref())
        }
        other => map_diesel_error(other),
    }
}

fn to_db_amount(value: u64) -> Result<i64, AccountRepositoryError> {
    i64::try_from(value).map_err(|_| AccountRepositoryError::query("amount exceeds storage range"))
}

fn from_db_amount(value: i64, column: &str) -> Result<u64, AccountRepositoryError> {
    u64::try_from(value)
        .map_err(|_| AccountRepositoryError::query(format!("negative {column} in store")))
}

fn row_to_balance(row: BalanceRow) -> Result<CreditBalance, AccountRepositoryError> {
    Ok(CreditBalance::new(
        Credits::from_hundredths(from_db_amount(row.credit_hundredths, "credit balance")?),
        from_db_amount(row.total_predictions, "prediction count")?,
    ))
}

fn row_to_account(row: AccountRow) -> Result<(Account, PasswordHash), AccountRepositoryError> {
    let name = UserName::new(row.name)
        .map_err(|err| AccountRepositoryError::query(format!("stored name invalid: {err}")))?;
    let email = EmailAddress::new(&row.email)
        .map_err(|err| AccountRepositoryError::query(format!("stored email invalid: {err}")))?;
    let balance = row_to_balance(BalanceRow {
        credit_hundredths: row.credit_hundredths,
        total_predictions: row.total_predictions,
    })?;

    let account = Account::from_parts(AccountParts {
        id: UserId::from_uuid(row.id),
        name,
        email,
        credits: balance.credits(),
        total_predictions: balance.total_predictions(),
        created_at: row.created_at,
    });
    Ok((account, PasswordHash::new(row.password_hash)))
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn insert(
        &self,
        account: &Account,
        password_hash: &PasswordHash,
    ) -> Result<(), AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let balance = account.balance();

        let new_row = NewAccountRow {
            id: *account.id().as_uuid(),
            name: account.name().as_ref(),
            email: account.email().as_ref(),
            password_hash: password_hash.as_str(),
            credit_hundredths: to_db_amount(balance.credits().hundredths())?,
            total_predictions: to_db_amount(balance.total_predictions())?,
            created_at: account.created_at(),
        };

        diesel::insert_into(users::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_insert_error(err, account.email()))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<AccountRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| row_to_account(row).map(|(account, _)| account))
            .transpose()
    }

    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<AccountRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| {
            row_to_account(row).map(|(account, password_hash)| StoredCredentials {
                account,
                password_hash,
            })
        })
        .transpose()
    }

    async fn try_deduct(
        &self,
        id: &UserId,
        amount: Credits,
    ) -> Result<DeductionOutcome, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let amount = to_db_amount(amount.hundredths())?;

        let applied: Option<BalanceRow> = diesel::update(users::table)
            .filter(users::id.eq(id.as_uuid()))
            .filter(users::credit_hundredths.ge(amount))
            .set((
                users::credit_hundredths.eq(users::credit_hundredths - amount),
                users::total_predictions.eq(users::total_predictions + 1_i64),
            ))
            .returning(BalanceRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        if let Some(row) = applied {
            return row_to_balance(row).map(DeductionOutcome::Applied);
        }

        // Not applied: tell a short balance apart from a missing account.
        let current: Option<BalanceRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(BalanceRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        match current {
            Some(row) => row_to_balance(row).map(DeductionOutcome::Insufficient),
            None => Ok(DeductionOutcome::AccountMissing),
        }
    }
}
