//! Database constraint violations organized by functional area.
//!
//! This module provides an enumeration of all database constraint violations,
//! so query errors can be translated into precise, user-facing failures.

mod accounts;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use self::accounts::AccountConstraints;

/// Categories of database constraint violations.
///
/// This enum helps classify constraint violations by their purpose and type,
/// making it easier to handle different categories of errors appropriately.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintCategory {
    /// Data validation constraints (format, length, range checks).
    Validation,
    /// Chronological integrity constraints (timestamp relationships).
    Chronological,
    /// Uniqueness constraints (primary keys, unique indexes).
    Uniqueness,
}

/// Unified constraint violation enum that can represent any database constraint.
///
/// This enum wraps all specific constraint types, providing a single interface
/// for handling any constraint violation while maintaining type safety.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ConstraintViolation {
    /// Constraints on the `accounts` table.
    Account(AccountConstraints),
}

impl ConstraintViolation {
    /// Creates a new [`ConstraintViolation`] from the constraint name.
    ///
    /// This method attempts to parse a constraint name string into the
    /// corresponding enum variant. It returns `None` if the constraint name
    /// is not recognized.
    ///
    /// # Examples
    ///
    /// ```
    /// use utsav_postgres::types::ConstraintViolation;
    ///
    /// let violation = ConstraintViolation::new("accounts_email_address_unique_idx");
    /// assert!(violation.is_some());
    ///
    /// let unknown = ConstraintViolation::new("unknown_constraint");
    /// assert!(unknown.is_none());
    /// ```
    pub fn new(constraint: &str) -> Option<Self> {
        if constraint.starts_with("accounts_")
            && let Some(c) = AccountConstraints::new(constraint)
        {
            return Some(ConstraintViolation::Account(c));
        }

        None
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            ConstraintViolation::Account(c) => c.categorize(),
        }
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintViolation::Account(c) => c.fmt(f),
        }
    }
}

impl From<ConstraintViolation> for String {
    #[inline]
    fn from(val: ConstraintViolation) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for ConstraintViolation {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value).ok_or(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_account_constraints() {
        let violation = ConstraintViolation::new("accounts_username_unique_idx");
        assert_eq!(
            violation,
            Some(ConstraintViolation::Account(
                AccountConstraints::UsernameUnique
            ))
        );

        let violation = ConstraintViolation::new("accounts_email_address_unique_idx");
        assert_eq!(
            violation,
            Some(ConstraintViolation::Account(
                AccountConstraints::EmailAddressUnique
            ))
        );
    }

    #[test]
    fn rejects_unknown_constraints() {
        assert!(ConstraintViolation::new("venues_name_unique_idx").is_none());
        assert!(ConstraintViolation::new("").is_none());
    }

    #[test]
    fn uniqueness_constraints_categorized() {
        let violation = ConstraintViolation::new("accounts_username_unique_idx").unwrap();
        assert_eq!(violation.categorize(), ConstraintCategory::Uniqueness);

        let violation = ConstraintViolation::new("accounts_email_format").unwrap();
        assert_eq!(violation.categorize(), ConstraintCategory::Validation);
    }
}
