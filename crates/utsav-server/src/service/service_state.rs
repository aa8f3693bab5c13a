//! Application state and dependency injection.

use utsav_postgres::PgClient;

use crate::Result;
use crate::service::{PasswordHasher, ServiceConfig, TokenKeys};

/// Application state.
///
/// Holds the handles shared by all request handlers: the credential store
/// connection pool, the password hasher and the token signing keys. All
/// fields are cheaply cloneable and the state carries no mutable data.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    pg_client: PgClient,
    password_hasher: PasswordHasher,
    token_keys: TokenKeys,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Derives the token keys and creates the database client; connections
    /// are established lazily on first use.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let service_state = Self {
            pg_client: config.connect_postgres()?,
            password_hasher: config.create_password_hasher()?,
            token_keys: config.token_keys()?,
        };

        Ok(service_state)
    }

    /// Returns the credential store client.
    #[inline]
    pub fn pg_client(&self) -> &PgClient {
        &self.pg_client
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(pg_client: PgClient);
impl_di!(password_hasher: PasswordHasher);
impl_di!(token_keys: TokenKeys);
