// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-request security context.
//!
//! Lives in the request's extensions, so it is created with the request and
//! dropped with it. It is never stored anywhere else.

use super::roles::Authentication;

/// Holds at most one authenticated principal for the current request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityContext {
    authentication: Option<Authentication>,
}

impl SecurityContext {
    /// Context for a request without (valid) credentials.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn authenticated(authentication: Authentication) -> Self {
        Self {
            authentication: Some(authentication),
        }
    }

    pub fn authentication(&self) -> Option<&Authentication> {
        self.authentication.as_ref()
    }

    pub fn into_authentication(self) -> Option<Authentication> {
        self.authentication
    }

    pub fn is_authenticated(&self) -> bool {
        self.authentication.is_some()
    }
}

impl From<Option<Authentication>> for SecurityContext {
    fn from(authentication: Option<Authentication>) -> Self {
        Self { authentication }
    }
}
