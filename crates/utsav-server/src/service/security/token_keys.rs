//! Authentication secret key management for signed session tokens.
//!
//! This module provides functionality for deriving and managing the
//! cryptographic keys used to sign and verify bearer tokens.

use std::fmt;
use std::sync::Arc;

use jsonwebtoken::{DecodingKey, EncodingKey};

use crate::{Error, Result};

/// Tracing target for token key management.
const TRACING_TARGET: &str = "utsav_server::service::token_keys";

/// Minimum accepted secret length in bytes.
///
/// HMAC-SHA256 secrets shorter than the hash output size weaken the signature.
const MIN_SECRET_LEN: usize = 32;

/// Secret keys used to sign and verify bearer tokens.
///
/// Both keys are derived from one process-wide secret that is provided by
/// configuration at startup and stays constant for the process lifetime.
/// The struct is cheaply cloneable and thread-safe.
#[derive(Clone)]
pub struct TokenKeys {
    inner: Arc<TokenKeysInner>,
}

/// Internal container for the actual key data.
struct TokenKeysInner {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
}

impl TokenKeys {
    /// Derives HMAC-SHA256 signing keys from the given secret.
    ///
    /// The secret length is validated and a sign/verify round trip runs before
    /// the keys are handed out, so a misconfigured secret fails at startup
    /// instead of on the first login.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the secret is too short, or an
    /// authentication error when the round-trip self check fails.
    pub fn new(secret: &str) -> Result<Self> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(Error::config(format!(
                "auth token secret must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }

        let this = Self {
            inner: Arc::new(TokenKeysInner {
                decoding_key: DecodingKey::from_secret(secret.as_bytes()),
                encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            }),
        };

        this.validate_keys()?;

        tracing::info!(
            target: TRACING_TARGET,
            secret_len = secret.len(),
            "authentication token keys derived"
        );

        Ok(this)
    }

    /// Returns a reference to the decoding key.
    ///
    /// This key is used to verify token signatures.
    #[inline]
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.inner.decoding_key
    }

    /// Returns a reference to the encoding key.
    ///
    /// This key is used to sign tokens.
    #[inline]
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.inner.encoding_key
    }

    /// Validates that the derived keys are functional for token operations.
    ///
    /// Performs a round-trip test by signing and verifying a probe token.
    fn validate_keys(&self) -> Result<()> {
        use jsonwebtoken::{Algorithm, Header, Validation, decode, encode};
        use serde::{Deserialize, Serialize};

        #[derive(Debug, Serialize, Deserialize)]
        struct ProbeClaims {
            sub: String,
            exp: i64,
        }

        let claims = ProbeClaims {
            sub: "probe".to_owned(),
            exp: jiff::Timestamp::now().as_second() + 300,
        };

        let header = Header::new(Algorithm::HS256);
        let token = encode(&header, &claims, self.encoding_key()).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "key validation failed during encoding"
            );
            Error::auth("key validation encoding failed").with_source(e)
        })?;

        let validation = Validation::new(Algorithm::HS256);
        decode::<ProbeClaims>(&token, self.decoding_key(), &validation).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "key validation failed during decoding"
            );
            Error::auth("key validation decoding failed").with_source(e)
        })?;

        Ok(())
    }
}

impl fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenKeys").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "an-unguessable-development-secret-0123456789";

    #[test]
    fn derive_valid_keys() {
        let keys = TokenKeys::new(TEST_SECRET);
        assert!(keys.is_ok(), "key derivation failed: {:?}", keys.err());
    }

    #[test]
    fn reject_short_secret() {
        let result = TokenKeys::new("too-short");
        assert!(result.is_err());
    }

    #[test]
    fn debug_does_not_leak_key_material() {
        let keys = TokenKeys::new(TEST_SECRET).unwrap();
        let debug = format!("{:?}", keys);
        assert!(!debug.contains(TEST_SECRET));
    }
}
