//! Account repository for managing user accounts.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use super::Pagination;
use crate::model::{Account, NewAccount};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for account database operations.
///
/// Handles account creation and the credential lookups used by the
/// authentication flow. Uniqueness of username and email is enforced by
/// database unique indexes, so [`create_account`] is a single atomic
/// insert; a racing duplicate surfaces as a constraint violation rather
/// than a lost update.
///
/// [`create_account`]: AccountRepository::create_account
pub trait AccountRepository {
    /// Creates a new user account.
    ///
    /// Inserts a new account record into the database with the provided
    /// credentials and profile information. The username is trimmed and the
    /// email is normalized to lowercase before the insert.
    fn create_account(
        &mut self,
        new_account: NewAccount,
    ) -> impl Future<Output = PgResult<Account>> + Send;

    /// Finds an account by its unique identifier.
    fn find_account_by_id(
        &mut self,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Finds an account by username.
    ///
    /// The username is matched exactly as stored (usernames are trimmed at
    /// creation time).
    fn find_account_by_username(
        &mut self,
        username: &str,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Finds an account by email address.
    ///
    /// Retrieves an account using its email for authentication and lookup.
    /// Email comparison is case-insensitive.
    fn find_account_by_email(
        &mut self,
        email: &str,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Lists accounts with pagination support.
    ///
    /// Retrieves accounts ordered by creation time with most recent first.
    fn list_accounts(
        &mut self,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<Account>>> + Send;

    /// Counts all accounts in the system.
    fn count_accounts(&mut self) -> impl Future<Output = PgResult<i64>> + Send;
}

impl AccountRepository for PgConnection {
    async fn create_account(&mut self, mut new_account: NewAccount) -> PgResult<Account> {
        use schema::accounts;

        // Normalize identity fields; the password hash is stored verbatim
        new_account.username = new_account.username.trim().to_owned();
        new_account.email_address = new_account.email_address.trim().to_lowercase();
        new_account.account_role = new_account.account_role.trim().to_owned();
        new_account.phone_number = new_account.phone_number.trim().to_owned();

        diesel::insert_into(accounts::table)
            .values(&new_account)
            .returning(Account::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_account_by_id(&mut self, account_id: Uuid) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        accounts::table
            .filter(dsl::id.eq(account_id))
            .select(Account::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_account_by_username(&mut self, username: &str) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        accounts::table
            .filter(dsl::username.eq(username.trim()))
            .select(Account::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_account_by_email(&mut self, email: &str) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        accounts::table
            .filter(dsl::email_address.eq(email.trim().to_lowercase()))
            .select(Account::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_accounts(&mut self, pagination: Pagination) -> PgResult<Vec<Account>> {
        use schema::accounts::{self, dsl};

        accounts::table
            .order(dsl::created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(Account::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn count_accounts(&mut self) -> PgResult<i64> {
        use schema::accounts;

        accounts::table
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)
    }
}
