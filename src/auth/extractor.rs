// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is Authentication
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{middleware::resolve_context, Authentication, AuthError, SecurityContext};
use crate::state::AppState;

/// Security context for this request.
///
/// Uses the context installed by the authorization middleware; if the route
/// is not behind it, resolves one from the headers directly.
fn security_context(parts: &Parts, state: &AppState) -> SecurityContext {
    match parts.extensions.get::<SecurityContext>() {
        Some(context) => context.clone(),
        None => resolve_context(&parts.headers, &state.tokens),
    }
}

/// Extractor for authenticated users.
///
/// Rejects with 401 when the request carries no valid token.
///
/// # Example
///
/// ```rust,ignore
/// async fn me(Auth(user): Auth) -> Result<Json<MeResponse>, AuthError> {
///     user.require_any_role(&[ADMIN, USER])?;
///     Ok(Json(user.into()))
/// }
/// ```
pub struct Auth(pub Authentication);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        security_context(parts, state)
            .into_authentication()
            .map(Auth)
            .ok_or(AuthError::MissingAuthentication)
    }
}
