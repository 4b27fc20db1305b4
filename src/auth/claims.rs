// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and the mapping from the domain view onto them.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::roles::RoleSet;

/// Claims carried in the token payload.
///
/// Field order is the serialization order, which keeps signed tokens
/// byte-for-byte reproducible.
///
/// ```json
/// {
///   "sub": "admin",
///   "roles": ["ADMIN", "USER"],
///   "iat": 1586465683,
///   "exp": 1586465684,
///   "iss": "https://auth.example.com",
///   "aud": "user-service"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (principal)
    pub sub: String,
    /// Plain role names, no `ROLE_` prefix
    #[serde(default)]
    pub roles: RoleSet,
    /// Issued at (seconds since epoch)
    pub iat: i64,
    /// Expires at (seconds since epoch)
    pub exp: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
}

impl TokenClaims {
    /// Expiry as an instant. Out-of-range values clamp to the far future
    /// (or past) so they compare sensibly instead of failing.
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or(if self.exp < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
    }
}

/// Build the claims for a principal. Timestamps are truncated to whole
/// seconds, as the wire format requires.
pub fn to_claims(
    principal: &str,
    roles: &RoleSet,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    issuer: &str,
    audience: &str,
) -> TokenClaims {
    TokenClaims {
        sub: principal.to_string(),
        roles: roles.clone(),
        iat: issued_at.timestamp(),
        exp: expires_at.timestamp(),
        iss: issuer.to_string(),
        aud: audience.to_string(),
    }
}

/// Extract the principal and its roles, verbatim.
pub fn from_claims(claims: TokenClaims) -> (String, RoleSet) {
    (claims.sub, claims.roles)
}
