// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless bearer-token authentication for the user service.
//!
//! ## Auth Flow
//!
//! 1. Client posts `{"username", "password"}` to `/login`
//! 2. Server:
//!    - Checks the credentials with a [`CredentialVerifier`]
//!    - Signs an HS512 token carrying `sub`, `roles`, `iat`, `exp`, `iss`, `aud`
//!    - Returns it as `Authorization: Bearer <token>`
//! 3. Client echoes the header on every later request
//! 4. The [`middleware::authorize`] layer verifies it and installs a
//!    per-request [`SecurityContext`] into the request extensions
//! 5. Handlers take the [`Auth`] extractor and check roles on it
//!
//! ## Security
//!
//! - No server-side sessions; the token is the only state
//! - Signature, issuer, audience and expiry are all enforced
//! - Every verification failure looks the same to the caller
//! - No revocation, replay protection or rate limiting

pub mod claims;
pub mod clock;
pub mod codec;
pub mod context;
pub mod credentials;
pub mod error;
pub mod extractor;
pub mod login;
pub mod middleware;
pub mod roles;
pub mod service;

use axum::http::HeaderValue;

pub use clock::{Clock, FixedClock, SystemClock};
pub use context::SecurityContext;
pub use credentials::{CredentialVerifier, CredentialsError, InMemoryCredentials, VerifiedUser};
pub use error::{AuthError, TokenError};
pub use extractor::Auth;
pub use login::{AuthenticationStage, LoginRequest};
pub use roles::{Authentication, RoleSet};
pub use service::{IssuedToken, TokenService};

/// Prefix in front of the token in the `Authorization` header.
pub const TOKEN_PREFIX: &str = "Bearer ";

/// Header value carrying `token`.
///
/// # Errors
///
/// Fails only if the token contains bytes that are not valid in a header,
/// which never happens for tokens this service signs.
pub fn bearer_header(token: &str) -> Result<HeaderValue, AuthError> {
    HeaderValue::from_str(&format!("{TOKEN_PREFIX}{token}"))
        .map_err(|e| AuthError::InternalError(e.to_string()))
}

/// Strip the bearer prefix from a raw header value.
pub fn strip_bearer(value: &str) -> Option<&str> {
    value.strip_prefix(TOKEN_PREFIX).map(str::trim)
}
