//! Account model for PostgreSQL database operations.
//!
//! This module provides the core account model for user authentication.
//! An account stores the identity of a platform user (attendee or event
//! organizer) together with their credential hash.
//!
//! ## Models
//!
//! - [`Account`] - Main account model with complete user information
//! - [`NewAccount`] - Data structure for creating new user accounts

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::accounts;

/// Role string for event organizer accounts.
pub const ROLE_ORGANIZER: &str = "organizer";

/// Role string for regular user accounts.
pub const ROLE_USER: &str = "user";

/// Main account model representing a user account in the system.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Account {
    /// Unique account identifier, assigned by the database.
    pub id: Uuid,
    /// Unique login and display handle, immutable after creation.
    pub username: String,
    /// Primary email for authentication, stored lowercase.
    pub email_address: String,
    /// Argon2id PHC string; never exposed through the API or logs.
    pub password_hash: String,
    /// Account role, stored as an opaque string (e.g. "organizer", "user").
    pub account_role: String,
    /// Contact phone number, required at signup, no format validation.
    pub phone_number: String,
    /// Timestamp when the account was created.
    pub created_at: Timestamp,
    /// Timestamp when the account was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new account.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewAccount {
    /// Unique login and display handle.
    pub username: String,
    /// Primary email for authentication.
    pub email_address: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Account role string.
    pub account_role: String,
    /// Contact phone number.
    pub phone_number: String,
}

impl Account {
    /// Returns whether the account has the organizer role.
    pub fn is_organizer(&self) -> bool {
        self.account_role == ROLE_ORGANIZER
    }

    /// Returns the creation timestamp as a [`jiff::Timestamp`].
    pub fn created_at(&self) -> jiff::Timestamp {
        self.created_at.into()
    }

    /// Returns the last-update timestamp as a [`jiff::Timestamp`].
    pub fn updated_at(&self) -> jiff::Timestamp {
        self.updated_at.into()
    }
}
