//! Bearer token extraction and generation for Authorization headers.
//!
//! This module handles signed tokens in HTTP Authorization Bearer headers.
//! It supports both extracting tokens from incoming requests and generating
//! tokens for outgoing responses.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::{IntoResponse, IntoResponseParts, Response, ResponseParts};
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use axum_extra::typed_header::TypedHeaderRejectionReason;

use crate::extract::auth::AuthClaims;
use crate::handler::{Error, ErrorKind, Result};
use crate::service::TokenKeys;

/// Bearer token extractor and response generator.
///
/// When used as an extractor, the token is validated for signature
/// integrity, expiration, required claims, and issuer/audience matching.
/// When used as a response (or response part), it signs the claims and
/// emits an `Authorization: Bearer` header.
///
/// # Examples
///
/// Extracting a token from a request:
/// ```rust,ignore
/// async fn handler(auth_header: AuthHeader) -> Result<impl IntoResponse> {
///     let claims = auth_header.as_auth_claims();
///     println!("account: {}", claims.account_id);
///     Ok("Success")
/// }
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct AuthHeader {
    auth_claims: AuthClaims,
    token_keys: TokenKeys,
}

impl AuthHeader {
    /// Creates a new authentication header with the given claims and keys.
    #[inline]
    pub const fn new(claims: AuthClaims, keys: TokenKeys) -> Self {
        Self {
            auth_claims: claims,
            token_keys: keys,
        }
    }

    /// Returns a reference to the token claims.
    #[inline]
    pub const fn as_auth_claims(&self) -> &AuthClaims {
        &self.auth_claims
    }

    /// Consumes this header and returns the token claims.
    #[inline]
    pub fn into_auth_claims(self) -> AuthClaims {
        self.auth_claims
    }

    /// Signs the claims and returns the raw bearer token string.
    ///
    /// # Errors
    ///
    /// Returns an error if token signing fails.
    pub fn bearer_token(&self) -> Result<String> {
        self.auth_claims.encode(self.token_keys.encoding_key())
    }

    /// Creates an `AuthHeader` from a parsed Authorization header.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is invalid, expired, or malformed.
    fn from_header(
        authorization_header: TypedHeader<Authorization<Bearer>>,
        token_keys: TokenKeys,
    ) -> Result<Self> {
        let auth_claims =
            AuthClaims::decode(authorization_header.token(), token_keys.decoding_key())?;
        Ok(Self::new(auth_claims, token_keys))
    }

    /// Converts this header into an HTTP Authorization header.
    ///
    /// # Errors
    ///
    /// Returns an error if token signing fails.
    fn into_header(self) -> Result<TypedHeader<Authorization<Bearer>>> {
        let jwt_token = self.bearer_token()?;

        let bearer_auth = Authorization::bearer(&jwt_token).map_err(|_| {
            tracing::error!(
                target: crate::TRACING_TARGET_AUTHENTICATION,
                account_id = %self.auth_claims.account_id,
                "generated token has invalid format for Authorization header"
            );

            ErrorKind::InternalServerError
                .with_message("Authentication header creation failed")
                .with_context("Generated token format is invalid")
                .with_resource("authentication")
        })?;

        Ok(TypedHeader(bearer_auth))
    }
}

impl<S> FromRequestParts<S> for AuthHeader
where
    S: Sync + Send,
    TokenKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Return cached header if available to avoid re-parsing
        if let Some(auth_header) = parts.extensions.get::<Self>() {
            return Ok(auth_header.clone());
        }

        // Extract Bearer token from Authorization header
        type AuthBearerHeader = TypedHeader<Authorization<Bearer>>;
        let token_keys = TokenKeys::from_ref(state);

        match AuthBearerHeader::from_request_parts(parts, state).await {
            Ok(bearer_header) => {
                let auth_header = Self::from_header(bearer_header, token_keys)?;
                // Cache for subsequent extractors in the same request
                parts.extensions.insert(auth_header.clone());
                Ok(auth_header)
            }
            Err(rejection) => {
                let error = match rejection.reason() {
                    TypedHeaderRejectionReason::Missing => ErrorKind::MissingAuthToken
                        .with_message("Authentication required")
                        .with_context("Missing Authorization header with Bearer token")
                        .with_resource("authentication"),
                    TypedHeaderRejectionReason::Error(_) => ErrorKind::MalformedAuthToken
                        .with_message("Invalid token format")
                        .with_context("Authorization header must contain a valid Bearer token")
                        .with_resource("authentication"),
                    _ => ErrorKind::InternalServerError
                        .with_message("Authentication processing failed")
                        .with_context("Unexpected error during header extraction")
                        .with_resource("authentication"),
                };
                Err(error)
            }
        }
    }
}

impl IntoResponseParts for AuthHeader {
    type Error = Error<'static>;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        // .into_response_parts() for a TypedHeader is infallible
        self.into_header()
            .map(|h| h.into_response_parts(res).unwrap())
    }
}

impl IntoResponse for AuthHeader {
    fn into_response(self) -> Response {
        match self.into_header() {
            Ok(header) => header.into_response(),
            Err(error) => error.into_response(),
        }
    }
}
