// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Roles, authorities and the authenticated principal.
//!
//! Roles travel inside tokens as plain names (`ADMIN`). Access checks work on
//! authorities, which are the role names with [`ROLE_PREFIX`] prepended
//! (`ROLE_ADMIN`).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::AuthError;

/// Prefix that turns a role name into an authority.
pub const ROLE_PREFIX: &str = "ROLE_";

/// Role granted to administrators.
pub const ADMIN: &str = "ADMIN";

/// Role granted to regular users.
pub const USER: &str = "USER";

/// Deduplicated set of plain role names.
///
/// Backed by a `BTreeSet` so iteration order, and therefore the serialized
/// token, is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(BTreeSet<String>);

impl RoleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, role: &str) -> bool {
        self.0.contains(role)
    }

    pub fn insert(&mut self, role: impl Into<String>) -> bool {
        self.0.insert(role.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Roles as authorities (`ROLE_` + role).
    pub fn authorities(&self) -> BTreeSet<String> {
        self.iter().map(to_authority).collect()
    }
}

impl<S: Into<String>> FromIterator<S> for RoleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Map a plain role to its authority string.
pub fn to_authority(role: &str) -> String {
    format!("{ROLE_PREFIX}{role}")
}

/// A verified subject and its roles.
///
/// Plain data; whoever holds one has already passed token verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authentication {
    principal: String,
    roles: RoleSet,
}

impl Authentication {
    pub fn new(principal: impl Into<String>, roles: RoleSet) -> Self {
        Self {
            principal: principal.into(),
            roles,
        }
    }

    pub fn principal(&self) -> &str {
        &self.principal
    }

    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }

    pub fn authorities(&self) -> BTreeSet<String> {
        self.roles.authorities()
    }

    /// Check for a plain role name (`ADMIN`, not `ROLE_ADMIN`).
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Check for an authority string (`ROLE_ADMIN`).
    pub fn has_authority(&self, authority: &str) -> bool {
        authority
            .strip_prefix(ROLE_PREFIX)
            .is_some_and(|role| self.has_role(role))
    }

    /// Succeed when the principal holds at least one of `roles`.
    pub fn require_any_role(&self, roles: &[&str]) -> Result<&Self, AuthError> {
        if roles.iter().any(|role| self.has_role(role)) {
            Ok(self)
        } else {
            Err(AuthError::InsufficientPermissions)
        }
    }
}
