// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential verification collaborator used by the login path.
//!
//! Password storage and hashing policy live outside this crate. The login
//! stage only needs something that turns a username and password into a
//! principal with roles, or says no.

use std::collections::HashMap;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;

use super::roles::RoleSet;

/// Outcome of a successful credential check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedUser {
    pub principal: String,
    pub roles: RoleSet,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialsError {
    /// Unknown user or wrong password; the two are never distinguished
    #[error("bad credentials")]
    Invalid,
    /// The backing store could not answer
    #[error("credential store unavailable: {0}")]
    Unavailable(String),
}

/// Checks a username/password pair.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> Result<VerifiedUser, CredentialsError>;
}

struct Account {
    password_digest: [u8; 32],
    roles: RoleSet,
}

/// Fixed set of accounts held in memory.
///
/// A stand-in for a real user store: handy for tests and for running the
/// server with a single configured account.
#[derive(Default)]
pub struct InMemoryCredentials {
    accounts: HashMap<String, Account>,
}

impl InMemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
        roles: RoleSet,
    ) -> Self {
        let password: String = password.into();
        self.accounts.insert(
            username.into(),
            Account {
                password_digest: digest(&password),
                roles,
            },
        );
        self
    }
}

impl CredentialVerifier for InMemoryCredentials {
    fn verify(&self, username: &str, password: &str) -> Result<VerifiedUser, CredentialsError> {
        let account = self.accounts.get(username).ok_or(CredentialsError::Invalid)?;

        // Fixed-width digests keep the comparison independent of input length.
        if !bool::from(account.password_digest[..].ct_eq(&digest(password)[..])) {
            return Err(CredentialsError::Invalid);
        }

        Ok(VerifiedUser {
            principal: username.to_string(),
            roles: account.roles.clone(),
        })
    }
}

impl std::fmt::Debug for InMemoryCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCredentials")
            .field("accounts", &self.accounts.len())
            .finish()
    }
}

fn digest(password: &str) -> [u8; 32] {
    Sha256::digest(password.as_bytes()).into()
}
