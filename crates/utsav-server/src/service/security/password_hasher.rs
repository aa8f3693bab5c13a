//! Password hashing and verification for the credential store.
//!
//! Credentials are hashed with Argon2id using an explicit work factor
//! held in this module, so raising the cost later is a one-line change
//! and old hashes keep verifying (algorithm, parameters and salt all
//! travel inside the PHC string). Passwords pass through verbatim as
//! byte sequences; nothing on this path trims or normalizes them.

use std::fmt;

use argon2::password_hash::{Error as ArgonError, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier, Version};
use rand::Rng;
use rand::rngs::OsRng;

use crate::handler::{Error, ErrorKind, Result};

/// Target identifier for password hashing service logging.
const TRACING_TARGET: &str = "utsav_server::service::password_hasher";

/// Generic hasher failure surfaced to the client as a 500.
///
/// The context stays server-side; the client only learns that password
/// processing failed, never why.
fn hasher_failure(context: &'static str) -> Error<'static> {
    ErrorKind::InternalServerError
        .with_message("Password processing failed")
        .with_context(context)
        .with_resource("authentication")
}

/// Password hashing and verification service.
///
/// Holds a configured Argon2id instance and a precomputed decoy hash.
/// The decoy backs [`verify_dummy_password`]: when a login names an
/// unknown email, the handler still performs exactly one verification
/// (against the decoy) so the response time matches the known-account
/// path one for one.
///
/// [`verify_dummy_password`]: PasswordHasher::verify_dummy_password
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    decoy_hash: String,
}

impl PasswordHasher {
    /// Argon2id memory cost in KiB (19 MiB).
    const MEMORY_COST_KIB: u32 = 19 * 1024;
    /// Argon2id iteration count.
    const ITERATIONS: u32 = 2;
    /// Argon2id lane count.
    const LANES: u32 = 1;

    /// Creates a new instance of the [`PasswordHasher`] service.
    ///
    /// Assembles the Argon2id instance from the module's work factor and
    /// hashes a throwaway random password to seed the decoy hash. The
    /// random password is dropped here, so the decoy can never verify.
    ///
    /// # Errors
    ///
    /// Returns an internal error when the parameters are rejected or the
    /// decoy hash cannot be computed.
    pub fn new() -> crate::Result<Self> {
        let params = Params::new(Self::MEMORY_COST_KIB, Self::ITERATIONS, Self::LANES, None)
            .map_err(|e| {
                crate::Error::internal("password_hasher", "invalid Argon2 parameters")
                    .with_source(e)
            })?;

        let hasher = Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            decoy_hash: String::new(),
        };

        let decoy_password: String = rand::rng()
            .sample_iter(rand::distr::Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();

        let decoy_hash = hasher.hash_password(&decoy_password).map_err(|e| {
            crate::Error::internal("password_hasher", "failed to seed decoy hash").with_source(e)
        })?;

        tracing::debug!(
            target: TRACING_TARGET,
            memory_cost_kib = Self::MEMORY_COST_KIB,
            iterations = Self::ITERATIONS,
            lanes = Self::LANES,
            "password hasher ready"
        );

        Ok(Self { decoy_hash, ..hasher })
    }

    /// Hashes a password with a fresh random salt.
    ///
    /// Returns a PHC string suitable for long-term storage; hashing the
    /// same password twice yields different strings that both verify.
    ///
    /// # Errors
    ///
    /// Returns `ErrorKind::InternalServerError` when salt generation or
    /// the hash computation fails.
    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::try_from_rng(&mut OsRng).map_err(|e| {
            tracing::error!(target: TRACING_TARGET, error = %e, "salt generation failed");
            hasher_failure("Salt generation error")
        })?;

        match self.argon2.hash_password(password.as_bytes(), &salt) {
            Ok(hash) => Ok(hash.to_string()),
            Err(e) => {
                tracing::error!(target: TRACING_TARGET, error = %e, "hash computation failed");
                Err(hasher_failure("Hash computation error"))
            }
        }
    }

    /// Verifies a password against a stored PHC string.
    ///
    /// Recomputes with the salt and parameters embedded in `stored_hash`
    /// and compares in constant time.
    ///
    /// # Errors
    ///
    /// - `ErrorKind::Unauthorized` when the password does not match
    /// - `ErrorKind::InternalServerError` when the stored hash is not a
    ///   valid PHC string or the backend fails
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<()> {
        let Ok(parsed_hash) = PasswordHash::new(stored_hash) else {
            // A broken stored hash is a server-side defect, not a bad credential
            tracing::warn!(target: TRACING_TARGET, "stored hash is not a valid PHC string");
            return Err(ErrorKind::InternalServerError
                .with_message("Authentication system temporarily unavailable")
                .with_context("Stored hash format error")
                .with_resource("authentication"));
        };

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(()),
            Err(ArgonError::Password) => Err(ErrorKind::Unauthorized
                .with_message("Authentication failed")
                .with_resource("authentication")),
            Err(e) => {
                tracing::error!(target: TRACING_TARGET, error = %e, "verification backend failed");
                Err(hasher_failure("Verification error"))
            }
        }
    }

    /// Burns one full-cost verification against the decoy hash.
    ///
    /// Called on the unknown-account login path so its duration is
    /// indistinguishable from a real password check. Always returns
    /// `false`: the decoy's password was discarded at construction.
    pub fn verify_dummy_password(&self, password: &str) -> bool {
        let _ = self.verify_password(password, &self.decoy_hash);
        false
    }
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("memory_cost_kib", &Self::MEMORY_COST_KIB)
            .field("iterations", &Self::ITERATIONS)
            .field("lanes", &Self::LANES)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_password() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new()?;
        let password = "Secr3t!_password";
        let hash = hasher.hash_password(password)?;

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password(password, &hash).is_ok());
        assert!(hasher.verify_password("wrong_password", &hash).is_err());

        Ok(())
    }

    #[test]
    fn hash_embeds_configured_work_factor() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new()?;
        let hash = hasher.hash_password("test_password")?;

        assert!(hash.contains("m=19456,t=2,p=1"));

        Ok(())
    }

    #[test]
    fn hash_produces_unique_salts() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new()?;
        let password = "test_password";

        let hash1 = hasher.hash_password(password)?;
        let hash2 = hasher.hash_password(password)?;

        assert_ne!(hash1, hash2);
        assert!(hasher.verify_password(password, &hash1).is_ok());
        assert!(hasher.verify_password(password, &hash2).is_ok());

        Ok(())
    }

    #[test]
    fn passwords_are_not_trimmed() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new()?;
        let hash = hasher.hash_password(" padded ")?;

        assert!(hasher.verify_password(" padded ", &hash).is_ok());
        assert!(hasher.verify_password("padded", &hash).is_err());

        Ok(())
    }

    #[test]
    fn wrong_password_maps_to_unauthorized() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new()?;
        let hash = hasher.hash_password("correct_password")?;

        let error = hasher
            .verify_password("wrong_password", &hash)
            .expect_err("wrong password must fail verification");
        assert_eq!(error.kind(), ErrorKind::Unauthorized);

        Ok(())
    }

    #[test]
    fn malformed_hash_maps_to_internal_error() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new()?;

        let error = hasher
            .verify_password("test_password", "not_a_valid_hash_format")
            .expect_err("malformed hash must fail verification");
        assert_eq!(error.kind(), ErrorKind::InternalServerError);

        Ok(())
    }

    #[test]
    fn dummy_verification_always_fails() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new()?;

        assert!(!hasher.verify_dummy_password("any_password"));
        assert!(!hasher.verify_dummy_password(""));

        Ok(())
    }

    #[test]
    fn debug_does_not_leak_decoy_hash() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new()?;
        let debug = format!("{:?}", hasher);

        assert!(!debug.contains("$argon2id$"));

        Ok(())
    }
}
