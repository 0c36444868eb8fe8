//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts and their credit ledger state.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name chosen at signup (2-64 characters).
        name -> Varchar,
        /// Lower-cased login email, unique.
        email -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        /// Balance in hundredths of a credit, never negative.
        credit_hundredths -> Int8,
        /// Number of paid predictions, never negative.
        total_predictions -> Int8,
        created_at -> Timestamptz,
    }
}
