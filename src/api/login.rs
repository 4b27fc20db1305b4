// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login endpoint.

use axum::{
    body::Bytes,
    extract::State,
    http::{header::AUTHORIZATION, StatusCode},
    response::{IntoResponse, Response},
};

use crate::auth::{bearer_header, AuthError, AuthenticationStage};
use crate::state::AppState;

/// Exchange a username and password for a bearer token.
///
/// The body is read raw so that an unparsable body is a plain 401, the same
/// as wrong credentials.
#[utoipa::path(
    post,
    path = "/login",
    tag = "Authentication",
    request_body = crate::auth::LoginRequest,
    responses(
        (status = 200, description = "Authenticated; token in the Authorization header",
            headers(("Authorization" = String, description = "Bearer <token>"))),
        (status = 401, description = "Bad credentials"),
    )
)]
pub async fn login(State(state): State<AppState>, body: Bytes) -> Result<Response, AuthError> {
    let stage = AuthenticationStage::new(&state.tokens, state.credentials.as_ref());
    let issued = stage.attempt(&body)?;

    let header = bearer_header(&issued.token)?;
    Ok((StatusCode::OK, [(AUTHORIZATION, header)]).into_response())
}
