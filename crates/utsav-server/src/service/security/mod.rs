//! Security primitives for the authentication flow.
//!
//! - [`PasswordHasher`] - Argon2id password hashing and verification
//! - [`TokenKeys`] - signing keys for bearer tokens

mod password_hasher;
mod token_keys;

pub use self::password_hasher::PasswordHasher;
pub use self::token_keys::TokenKeys;
