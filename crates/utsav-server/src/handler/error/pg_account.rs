//! Account-related constraint violation error handlers.

use utsav_postgres::types::AccountConstraints;

use crate::handler::{Error, ErrorKind};

impl From<AccountConstraints> for Error<'static> {
    fn from(c: AccountConstraints) -> Self {
        let error = match c {
            AccountConstraints::UsernameNotEmpty => {
                ErrorKind::BadRequest.with_message("Username cannot be empty")
            }
            AccountConstraints::UsernameLengthMax => {
                ErrorKind::BadRequest.with_message("Username cannot exceed 32 characters")
            }
            AccountConstraints::EmailFormat => {
                ErrorKind::BadRequest.with_message("Invalid email format")
            }
            AccountConstraints::EmailLengthMax => {
                ErrorKind::BadRequest.with_message("Email address is too long")
            }
            AccountConstraints::PasswordHashNotEmpty => {
                ErrorKind::BadRequest.with_message("Password cannot be empty")
            }
            AccountConstraints::AccountRoleNotEmpty => {
                ErrorKind::BadRequest.with_message("Role cannot be empty")
            }
            AccountConstraints::PhoneNumberNotEmpty => {
                ErrorKind::BadRequest.with_message("Phone number cannot be empty")
            }
            AccountConstraints::UpdatedAfterCreated => ErrorKind::InternalServerError.into_error(),
            AccountConstraints::UsernameUnique => {
                ErrorKind::Conflict.with_message("Username is already in use")
            }
            AccountConstraints::EmailAddressUnique => ErrorKind::Conflict
                .with_message("An account with this email address already exists"),
        };

        error.with_resource("account")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violations_map_to_conflict() {
        let error: Error<'static> = AccountConstraints::UsernameUnique.into();
        assert_eq!(error.kind(), ErrorKind::Conflict);
        assert_eq!(error.message(), Some("Username is already in use"));

        let error: Error<'static> = AccountConstraints::EmailAddressUnique.into();
        assert_eq!(error.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn validation_violations_map_to_bad_request() {
        let error: Error<'static> = AccountConstraints::EmailFormat.into();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.resource(), Some("account"));
    }
}
