// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! Two layers live here:
//!
//! - [`TokenError`] is the internal taxonomy produced while signing and
//!   verifying tokens. It never reaches a client: the token service folds
//!   every verification failure into "not authenticated".
//! - [`AuthError`] is what the HTTP boundary renders.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failures while signing or verifying a token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Wrong number of segments, bad base64 or undecodable claims
    #[error("token is malformed")]
    Malformed,
    /// MAC mismatch: tampered token or different secret
    #[error("token signature is invalid")]
    SignatureInvalid,
    /// Claims decoded but were issued by someone else
    #[error("token issuer does not match")]
    IssuerMismatch,
    /// Claims decoded but were meant for another audience
    #[error("token audience does not match")]
    AudienceMismatch,
    /// Verification instant is at or past `exp`
    #[error("token has expired")]
    Expired,
    /// Tokens are never issued for an empty subject
    #[error("token principal must not be empty")]
    EmptyPrincipal,
    /// Claims could not be serialized or signed
    #[error("failed to encode token: {0}")]
    Encoding(String),
}

/// Authentication error type rendered at the HTTP boundary.
///
/// Login failures deliberately share one variant: a client never learns
/// whether the username exists.
#[derive(Debug)]
pub enum AuthError {
    /// Request carries no valid authentication
    MissingAuthentication,
    /// Login rejected (bad credentials or unreadable body)
    InvalidCredentials,
    /// Authenticated, but lacking the required role
    InsufficientPermissions,
    /// Internal error
    InternalError(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthentication => "missing_authentication",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::InsufficientPermissions => "insufficient_permissions",
            AuthError::InternalError(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthentication | AuthError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
            AuthError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthentication => write!(f, "Full authentication is required"),
            AuthError::InvalidCredentials => write!(f, "Bad credentials"),
            AuthError::InsufficientPermissions => {
                write!(f, "Insufficient permissions for this operation")
            }
            AuthError::InternalError(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
