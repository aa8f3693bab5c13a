//! Signed bearer token claims.

use std::borrow::Cow;

use jiff::{SignedDuration, Span, Timestamp};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use utsav_postgres::model::Account;
use uuid::Uuid;

use crate::TRACING_TARGET_AUTHENTICATION;
use crate::handler::{Error, ErrorKind, Result};

/// Claims carried by authentication tokens.
///
/// This structure contains both RFC 7519 standard claims and the
/// application-specific role claim. Identity (`sub`) and role (`rol`) are
/// the only account data embedded in the token; everything else is looked
/// up from the credential store when needed.
///
/// | Claim | Field | Description |
/// |-------|-------|-------------|
/// | `iss` | `issued_by` | Token issuer identifier |
/// | `aud` | `audience` | Token audience identifier |
/// | `jti` | `token_id` | Unique token identifier |
/// | `sub` | `account_id` | Account ID this token represents |
/// | `rol` | `account_role` | Role of the account |
/// | `iat` | `issued_at` | Token creation timestamp |
/// | `exp` | `expires_at` | Token expiration timestamp |
///
/// Tokens are signed with HMAC-SHA256; validity is entirely a function of
/// the signature and the embedded expiry. There is no persisted session
/// state and no revocation.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct AuthClaims {
    // Standard (or registered) claims.
    /// Issuer (who created the token).
    #[serde(rename = "iss")]
    issued_by: Cow<'static, str>,
    /// Audience (who the token is intended for).
    #[serde(rename = "aud")]
    audience: Cow<'static, str>,

    /// JWT ID (unique identifier for this token).
    #[serde(rename = "jti")]
    pub token_id: Uuid,
    /// Subject ID (unique identifier of the associated account).
    #[serde(rename = "sub")]
    pub account_id: Uuid,

    /// Issued at (as seconds since the Unix epoch).
    #[serde(rename = "iat", with = "jiff::fmt::serde::timestamp::second::required")]
    pub issued_at: Timestamp,
    /// Expiration time (as seconds since the Unix epoch).
    #[serde(rename = "exp", with = "jiff::fmt::serde::timestamp::second::required")]
    pub expires_at: Timestamp,

    // Private (or custom) claims.
    /// Role of the account.
    #[serde(rename = "rol")]
    pub account_role: String,
}

impl AuthClaims {
    /// Default JWT audience identifier for authentication tokens.
    const JWT_AUDIENCE: &str = "utsav:server";
    /// Default JWT issuer identifier for authentication tokens.
    const JWT_ISSUER: &str = "utsav";
    /// Fixed lifetime of issued tokens.
    const TOKEN_TTL: SignedDuration = SignedDuration::from_hours(1);

    /// Creates fresh claims for the given account.
    ///
    /// Generates a new token id and stamps the fixed one-hour expiry
    /// relative to the current time.
    pub fn new(account: &Account) -> Self {
        let issued_at = Timestamp::now();

        Self {
            issued_by: Cow::Borrowed(Self::JWT_ISSUER),
            audience: Cow::Borrowed(Self::JWT_AUDIENCE),
            token_id: Uuid::new_v4(),
            account_id: account.id,
            issued_at,
            expires_at: issued_at + Self::TOKEN_TTL,
            account_role: account.account_role.clone(),
        }
    }

    /// Checks if the token has expired based on current UTC time.
    #[inline]
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Timestamp::now()
    }

    /// Returns the remaining lifetime of this token.
    ///
    /// The duration until expiration, or zero if already expired.
    #[inline]
    #[must_use]
    pub fn remaining_lifetime(&self) -> Span {
        let remaining = self.expires_at - Timestamp::now();
        if remaining.get_seconds() > 0 {
            remaining
        } else {
            Span::new()
        }
    }

    /// Encodes the claims into a signed bearer token string.
    ///
    /// # Errors
    ///
    /// Returns an internal error when token signing fails.
    pub fn encode(&self, encoding_key: &EncodingKey) -> Result<String> {
        let header = Header::new(Algorithm::HS256);
        encode(&header, self, encoding_key).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_AUTHENTICATION,
                error = %e,
                account_id = %self.account_id,
                "failed to encode auth token"
            );

            ErrorKind::InternalServerError
                .with_message("Authentication token generation failed")
                .with_context("Unable to create session token")
                .with_resource("authentication")
        })
    }

    /// Parses and validates a signed bearer token string.
    ///
    /// Validation covers the signature, issuer, audience, required claims
    /// and expiry. All failures map onto the handler error taxonomy:
    /// expired or badly-signed tokens are unauthorized, structurally broken
    /// tokens are malformed.
    ///
    /// # Errors
    ///
    /// Returns various authentication errors for invalid tokens.
    pub fn decode(auth_token: &str, decoding_key: &DecodingKey) -> Result<Self> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = false; // Not Before claim not used
        validation.validate_aud = true;
        validation.set_audience(&[Self::JWT_AUDIENCE]);
        validation.set_issuer(&[Self::JWT_ISSUER]);
        validation.set_required_spec_claims(&["iss", "aud", "jti", "sub", "iat", "exp", "rol"]);

        let token_data = decode::<Self>(auth_token, decoding_key, &validation)?;
        let claims = token_data.claims;

        // Double-check expiration; decoding leeway must not extend a session
        if claims.is_expired() {
            tracing::warn!(
                target: TRACING_TARGET_AUTHENTICATION,
                token_id = %claims.token_id,
                account_id = %claims.account_id,
                expired_at = %claims.expires_at,
                "auth token validation failed: token expired"
            );

            return Err(ErrorKind::Unauthorized
                .with_message("Authentication session has expired")
                .with_context("Please sign in again to continue")
                .with_resource("authentication"));
        }

        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            token_id = %claims.token_id,
            account_id = %claims.account_id,
            account_role = %claims.account_role,
            remaining = ?claims.remaining_lifetime(),
            "auth token validation completed successfully"
        );

        Ok(claims)
    }
}

impl From<JwtError> for Error<'static> {
    fn from(error: JwtError) -> Self {
        let error = match error.kind() {
            JwtErrorKind::ExpiredSignature => ErrorKind::Unauthorized
                .with_message("Your session has expired")
                .with_context("Please sign in again to continue"),
            JwtErrorKind::InvalidSignature => ErrorKind::Unauthorized
                .with_message("Authentication token verification failed")
                .with_context("Token signature could not be verified"),
            JwtErrorKind::InvalidAudience => ErrorKind::Unauthorized
                .with_message("Authentication token is not valid for this service")
                .with_context("Token was issued for a different application"),
            JwtErrorKind::InvalidIssuer => ErrorKind::Unauthorized
                .with_message("Authentication token is from an untrusted source")
                .with_context("Token was not issued by this authentication system"),
            JwtErrorKind::InvalidToken => ErrorKind::MalformedAuthToken
                .with_message("Authentication token is invalid")
                .with_context("The provided token format is unrecognized"),
            JwtErrorKind::InvalidAlgorithm => ErrorKind::MalformedAuthToken
                .with_message("Authentication token uses unsupported format")
                .with_context("Token was signed with an incompatible algorithm"),
            JwtErrorKind::MissingRequiredClaim(claim) => ErrorKind::MalformedAuthToken
                .with_message("Authentication token is incomplete")
                .with_context(format!("Token is missing required field: {}", claim)),
            JwtErrorKind::Base64(_) => ErrorKind::MalformedAuthToken
                .with_message("Authentication token format is corrupted")
                .with_context("Token contains invalid base64 encoding"),
            JwtErrorKind::Json(_) => ErrorKind::MalformedAuthToken
                .with_message("Authentication token structure is invalid")
                .with_context("Token payload contains malformed data"),
            _ => ErrorKind::InternalServerError
                .with_message("Authentication processing failed")
                .with_context("An unexpected error occurred during token validation"),
        };

        error.with_resource("authentication")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::TokenKeys;

    const TEST_SECRET: &str = "an-unguessable-test-secret-0123456789abcdef";

    fn test_account() -> Account {
        Account {
            id: Uuid::new_v4(),
            username: "alice".to_owned(),
            email_address: "a@x.com".to_owned(),
            password_hash: "$argon2id$irrelevant".to_owned(),
            account_role: "user".to_owned(),
            phone_number: "555-0100".to_owned(),
            created_at: Timestamp::now().into(),
            updated_at: Timestamp::now().into(),
        }
    }

    #[test]
    fn encode_decode_round_trip() -> anyhow::Result<()> {
        let keys = TokenKeys::new(TEST_SECRET)?;
        let claims = AuthClaims::new(&test_account());

        let token = claims.encode(keys.encoding_key())?;
        let decoded = AuthClaims::decode(&token, keys.decoding_key())
            .map_err(|e| anyhow::anyhow!("decode failed: {e}"))?;

        assert_eq!(decoded.account_id, claims.account_id);
        assert_eq!(decoded.token_id, claims.token_id);
        assert_eq!(decoded.account_role, "user");
        assert!(!decoded.is_expired());

        Ok(())
    }

    #[test]
    fn fresh_claims_expire_in_one_hour() {
        let claims = AuthClaims::new(&test_account());
        let lifetime = claims.expires_at - claims.issued_at;

        assert_eq!(lifetime.get_hours(), 1);
        assert!(!claims.is_expired());
    }

    #[test]
    fn each_issuance_has_a_unique_token_id() {
        let account = test_account();
        let first = AuthClaims::new(&account);
        let second = AuthClaims::new(&account);

        assert_ne!(first.token_id, second.token_id);
    }

    #[test]
    fn expired_token_fails_verification() -> anyhow::Result<()> {
        let keys = TokenKeys::new(TEST_SECRET)?;
        let mut claims = AuthClaims::new(&test_account());

        // Past the decoder's clock leeway
        claims.issued_at = Timestamp::now() - SignedDuration::from_hours(3);
        claims.expires_at = Timestamp::now() - SignedDuration::from_hours(2);

        let token = claims.encode(keys.encoding_key())?;
        let error = AuthClaims::decode(&token, keys.decoding_key())
            .expect_err("expired token must fail verification");

        assert_eq!(error.kind(), ErrorKind::Unauthorized);
        Ok(())
    }

    #[test]
    fn tampered_token_fails_verification() -> anyhow::Result<()> {
        let keys = TokenKeys::new(TEST_SECRET)?;
        let claims = AuthClaims::new(&test_account());
        let token = claims.encode(keys.encoding_key())?;

        // Flip a character inside the payload segment
        let mut tampered = token.into_bytes();
        let payload_pos = tampered.len() / 2;
        tampered[payload_pos] = if tampered[payload_pos] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered)?;

        assert!(AuthClaims::decode(&tampered, keys.decoding_key()).is_err());
        Ok(())
    }

    #[test]
    fn wrong_secret_fails_verification() -> anyhow::Result<()> {
        let keys = TokenKeys::new(TEST_SECRET)?;
        let other_keys = TokenKeys::new("a-different-test-secret-0123456789abcdef")?;

        let claims = AuthClaims::new(&test_account());
        let token = claims.encode(keys.encoding_key())?;

        let error = AuthClaims::decode(&token, other_keys.decoding_key())
            .expect_err("foreign signature must fail verification");
        assert_eq!(error.kind(), ErrorKind::Unauthorized);

        Ok(())
    }

    #[test]
    fn garbage_token_is_malformed() -> anyhow::Result<()> {
        let keys = TokenKeys::new(TEST_SECRET)?;

        let error = AuthClaims::decode("not-a-token", keys.decoding_key())
            .expect_err("garbage must fail verification");
        assert_eq!(error.kind(), ErrorKind::MalformedAuthToken);

        Ok(())
    }
}
