// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization middleware for Axum.
//!
//! Runs once per request, before any handler, and always installs a fresh
//! [`SecurityContext`] into the request extensions. It never rejects: a
//! missing or invalid token just leaves the context empty, and the
//! extractors decide per route whether that is fatal.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/protected", get(protected_handler))
//!     .route_layer(axum::middleware::from_fn_with_state(state.clone(), authorize));
//! ```

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use super::{context::SecurityContext, service::TokenService, strip_bearer};
use crate::state::AppState;

/// Authorization middleware function.
pub async fn authorize(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let context = resolve_context(request.headers(), &state.tokens);
    request.extensions_mut().insert(context);
    next.run(request).await
}

/// Build the security context for a request from its headers.
pub fn resolve_context(headers: &HeaderMap, tokens: &TokenService) -> SecurityContext {
    let Some(header) = headers.get(AUTHORIZATION) else {
        return SecurityContext::empty();
    };

    let Ok(value) = header.to_str() else {
        debug!("Authorization header is not valid ASCII");
        return SecurityContext::empty();
    };

    let Some(token) = strip_bearer(value) else {
        debug!("Authorization header is not a bearer token");
        return SecurityContext::empty();
    };

    tokens.try_authenticate(token).into()
}
