// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{
    roles::{ADMIN, USER},
    Auth, AuthError, Authentication,
};

/// Response for GET /api/users/me
#[derive(Debug, Serialize, ToSchema)]
pub struct UserMeResponse {
    /// Authenticated principal (token `sub`)
    pub username: String,
    /// Plain role names
    pub roles: Vec<String>,
    /// Roles as authorities (`ROLE_` prefixed)
    pub authorities: Vec<String>,
}

impl From<&Authentication> for UserMeResponse {
    fn from(user: &Authentication) -> Self {
        Self {
            username: user.principal().to_string(),
            roles: user.roles().iter().map(String::from).collect(),
            authorities: user.authorities().into_iter().collect(),
        }
    }
}

/// Get the current authenticated user's information.
///
/// This endpoint returns the identity and roles carried by the caller's token.
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = UserMeResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 403, description = "Forbidden - requires ADMIN or USER role"),
    )
)]
pub async fn get_current_user(Auth(user): Auth) -> Result<Json<UserMeResponse>, AuthError> {
    let user = user.require_any_role(&[ADMIN, USER])?;
    Ok(Json(user.into()))
}
