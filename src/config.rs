// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the validated
//! [`SigningConfiguration`]. Everything is read once at startup; nothing here
//! is reloadable.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `APP_SECURITY_SECRET` | HMAC secret for token signing (≥ 8 bytes) | Required |
//! | `APP_SECURITY_ISSUER` | Issuer URL written to and expected in tokens | Required |
//! | `APP_SECURITY_AUDIENCE` | Audience written to and expected in tokens | Required |
//! | `APP_SECURITY_EXPIRATION` | Token lifetime in milliseconds, at most one year | `864000000` (10 days) |
//! | `APP_LOGIN_USERNAME` | Optional account accepted by the login endpoint | Unset |
//! | `APP_LOGIN_PASSWORD` | Password for that account | Unset |
//! | `APP_LOGIN_ROLES` | Comma-separated roles for that account | `USER` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use chrono::TimeDelta;
use thiserror::Error;
use url::Url;

pub const SECRET_ENV: &str = "APP_SECURITY_SECRET";
pub const ISSUER_ENV: &str = "APP_SECURITY_ISSUER";
pub const AUDIENCE_ENV: &str = "APP_SECURITY_AUDIENCE";
pub const EXPIRATION_ENV: &str = "APP_SECURITY_EXPIRATION";

pub const LOGIN_USERNAME_ENV: &str = "APP_LOGIN_USERNAME";
pub const LOGIN_PASSWORD_ENV: &str = "APP_LOGIN_PASSWORD";
pub const LOGIN_ROLES_ENV: &str = "APP_LOGIN_ROLES";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Ten days. Production deployments should set the lifetime explicitly.
pub const DEFAULT_EXPIRATION_MILLIS: u64 = 10 * 24 * 60 * 60 * 1000;

/// Longest token lifetime accepted: one year.
pub const MAX_EXPIRATION_MILLIS: u64 = 365 * 24 * 60 * 60 * 1000;

/// Shortest secret accepted for signing.
pub const MIN_SECRET_LEN: usize = 8;

/// Startup configuration errors. All of them are fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("secret must be at least 8 bytes")]
    SecretTooShort,
    #[error("issuer must be an absolute URL: {0}")]
    InvalidIssuer(String),
    #[error("audience must not be empty")]
    EmptyAudience,
    #[error("expiration must be between 1 and 31536000000 milliseconds, got {0:?}")]
    InvalidExpiration(String),
}

/// Secret, issuer, audience and lifetime used to sign and verify tokens.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningConfiguration {
    secret: String,
    issuer: String,
    audience: String,
    expiration_millis: u64,
}

impl SigningConfiguration {
    pub fn new(
        secret: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        expiration_millis: u64,
    ) -> Result<Self, ConfigError> {
        let secret = secret.into();
        let issuer = issuer.into();
        let audience = audience.into();

        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::SecretTooShort);
        }
        Url::parse(&issuer).map_err(|_| ConfigError::InvalidIssuer(issuer.clone()))?;
        if audience.trim().is_empty() {
            return Err(ConfigError::EmptyAudience);
        }
        let in_range = (1..=MAX_EXPIRATION_MILLIS).contains(&expiration_millis)
            && i64::try_from(expiration_millis)
                .ok()
                .and_then(TimeDelta::try_milliseconds)
                .is_some();
        if !in_range {
            return Err(ConfigError::InvalidExpiration(expiration_millis.to_string()));
        }

        Ok(Self {
            secret,
            issuer,
            audience,
            expiration_millis,
        })
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let secret = required(SECRET_ENV)?;
        let issuer = required(ISSUER_ENV)?;
        let audience = required(AUDIENCE_ENV)?;
        let expiration_millis = match lookup(EXPIRATION_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidExpiration(raw.clone()))?,
            None => DEFAULT_EXPIRATION_MILLIS,
        };

        Self::new(secret, issuer, audience, expiration_millis)
    }

    pub fn secret(&self) -> &[u8] {
        self.secret.as_bytes()
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn expiration_millis(&self) -> u64 {
        self.expiration_millis
    }

    pub fn expiration(&self) -> TimeDelta {
        // Bounded by MAX_EXPIRATION_MILLIS in `new`.
        TimeDelta::milliseconds(self.expiration_millis as i64)
    }
}

impl std::fmt::Debug for SigningConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningConfiguration")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("expiration_millis", &self.expiration_millis)
            .finish()
    }
}
