// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuing and verification.
//!
//! This is the only place that knows about expiry and issuer/audience
//! binding. Callers get `Option<Authentication>` back from verification and
//! cannot tell a tampered token from an expired one; the reason is logged at
//! `debug` level only.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::{
    claims::{self, TokenClaims},
    clock::Clock,
    codec::TokenCodec,
    roles::{Authentication, RoleSet},
    TokenError,
};
use crate::config::SigningConfiguration;

/// A freshly issued token and the instants baked into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies bearer tokens for one signing configuration.
pub struct TokenService {
    config: SigningConfiguration,
    codec: TokenCodec,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(config: SigningConfiguration, clock: Arc<dyn Clock>) -> Self {
        let codec = TokenCodec::new(config.secret());
        Self {
            config,
            codec,
            clock,
        }
    }

    pub fn config(&self) -> &SigningConfiguration {
        &self.config
    }

    /// Sign a token for `principal` carrying `roles`.
    ///
    /// The clock is read exactly once; `expires_at` is derived from that
    /// reading.
    ///
    /// # Errors
    ///
    /// [`TokenError::EmptyPrincipal`] for an empty subject, or
    /// [`TokenError::Encoding`] if signing itself fails.
    pub fn issue(&self, principal: &str, roles: &RoleSet) -> Result<IssuedToken, TokenError> {
        if principal.is_empty() {
            return Err(TokenError::EmptyPrincipal);
        }

        let issued_at = self.clock.now();
        let expires_at = issued_at
            .checked_add_signed(self.config.expiration())
            .ok_or_else(|| TokenError::Encoding("expiry out of range".to_string()))?;

        let claims = claims::to_claims(
            principal,
            roles,
            issued_at,
            expires_at,
            self.config.issuer(),
            self.config.audience(),
        );
        let token = self.codec.sign(&claims)?;

        info!(
            principal = %principal,
            roles = roles.len(),
            expires_at = %expires_at,
            "Issued token"
        );

        Ok(IssuedToken {
            token,
            issued_at,
            expires_at,
        })
    }

    /// Verify a token and return who it authenticates, or `None`.
    pub fn try_authenticate(&self, token: &str) -> Option<Authentication> {
        match self.verify(token) {
            Ok(claims) => {
                let (principal, roles) = claims::from_claims(claims);
                Some(Authentication::new(principal, roles))
            }
            Err(reason) => {
                debug!(reason = %reason, "Rejected token");
                None
            }
        }
    }

    /// Full verification with the failure reason kept for logging.
    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let claims = self.codec.decode(token)?;

        if claims.iss != self.config.issuer() {
            return Err(TokenError::IssuerMismatch);
        }
        if claims.aud != self.config.audience() {
            return Err(TokenError::AudienceMismatch);
        }
        if self.clock.now() >= claims.expires_at() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::clock::{FixedClock, SystemClock};
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use chrono::TimeDelta;

    const MY_ISSUER: &str = "https://my-issuer.example";
    const MY_AUDIENCE: &str = "my audience";
    const MY_SECRET: &str = "my secret";

    fn config(secret: &str, issuer: &str, audience: &str) -> SigningConfiguration {
        SigningConfiguration::new(secret, issuer, audience, 1000).unwrap()
    }

    fn service_with(config: SigningConfiguration, clock: impl Clock + 'static) -> TokenService {
        TokenService::new(config, Arc::new(clock))
    }

    fn default_service() -> TokenService {
        service_with(config(MY_SECRET, MY_ISSUER, MY_AUDIENCE), SystemClock)
    }

    fn fixed(rfc3339: &str) -> FixedClock {
        FixedClock::parse(rfc3339).unwrap()
    }

    fn admin_roles() -> RoleSet {
        ["ADMIN", "USER"].into_iter().collect()
    }

    fn payload(token: &str) -> serde_json::Value {
        let segment = token.split('.').nth(1).unwrap();
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(segment).unwrap()).unwrap()
    }

    #[test]
    fn authenticates_signed_token() {
        let service = default_service();
        let issued = service.issue("admin", &admin_roles()).unwrap();

        let auth = service.try_authenticate(&issued.token).unwrap();
        assert_eq!(auth.principal(), "admin");
        assert_eq!(auth.roles(), &admin_roles());
        assert!(auth.has_authority("ROLE_ADMIN"));
        assert!(auth.has_authority("ROLE_USER"));
    }

    #[test]
    fn empty_role_set_round_trips() {
        let service = default_service();
        let issued = service.issue("nobody", &RoleSet::new()).unwrap();
        let auth = service.try_authenticate(&issued.token).unwrap();
        assert!(auth.roles().is_empty());
    }

    #[test]
    fn refuses_empty_principal() {
        let service = default_service();
        assert_eq!(
            service.issue("", &admin_roles()),
            Err(TokenError::EmptyPrincipal)
        );
    }

    #[test]
    fn longest_lifetime_issues_and_verifies() {
        let config = SigningConfiguration::new(
            MY_SECRET,
            MY_ISSUER,
            MY_AUDIENCE,
            crate::config::MAX_EXPIRATION_MILLIS,
        )
        .unwrap();
        let service = service_with(config, SystemClock);

        let issued = service.issue("admin", &admin_roles()).unwrap();
        assert_eq!(issued.expires_at - issued.issued_at, TimeDelta::days(365));
        assert!(service.try_authenticate(&issued.token).is_some());
    }

    #[test]
    fn expiry_past_representable_time_is_an_error() {
        let service = service_with(
            config(MY_SECRET, MY_ISSUER, MY_AUDIENCE),
            FixedClock(chrono::DateTime::<chrono::Utc>::MAX_UTC),
        );
        assert!(matches!(
            service.issue("admin", &admin_roles()),
            Err(TokenError::Encoding(_))
        ));
    }

    #[test]
    fn claims_carry_plain_roles() {
        let service = default_service();
        let issued = service.issue("admin", &admin_roles()).unwrap();
        let body = payload(&issued.token);
        assert_eq!(body["roles"], serde_json::json!(["ADMIN", "USER"]));
        assert_eq!(body["iss"], MY_ISSUER);
        assert_eq!(body["aud"], MY_AUDIENCE);
        assert_eq!(body["sub"], "admin");
    }

    #[test]
    fn rejects_other_secret() {
        let issued = default_service().issue("admin", &admin_roles()).unwrap();
        let other = service_with(
            config("my other secret", MY_ISSUER, MY_AUDIENCE),
            SystemClock,
        );
        assert!(other.try_authenticate(&issued.token).is_none());
    }

    #[test]
    fn rejects_other_issuer() {
        let issued = default_service().issue("admin", &admin_roles()).unwrap();
        let other = service_with(
            config(MY_SECRET, "https://my-other-issuer.example", MY_AUDIENCE),
            SystemClock,
        );
        assert!(other.try_authenticate(&issued.token).is_none());
        assert_eq!(other.verify(&issued.token), Err(TokenError::IssuerMismatch));
    }

    #[test]
    fn rejects_other_issuer_even_when_expired() {
        let issuer = service_with(
            config(MY_SECRET, MY_ISSUER, MY_AUDIENCE),
            fixed("2020-04-09T20:54:43Z"),
        );
        let issued = issuer.issue("admin", &admin_roles()).unwrap();
        let later = service_with(
            config(MY_SECRET, "https://my-other-issuer.example", MY_AUDIENCE),
            fixed("2030-01-01T00:00:00Z"),
        );
        assert_eq!(later.verify(&issued.token), Err(TokenError::IssuerMismatch));
    }

    #[test]
    fn rejects_other_audience() {
        let issued = default_service().issue("admin", &admin_roles()).unwrap();
        let other = service_with(
            config(MY_SECRET, MY_ISSUER, "my other audience"),
            SystemClock,
        );
        assert!(other.try_authenticate(&issued.token).is_none());
        assert_eq!(
            other.verify(&issued.token),
            Err(TokenError::AudienceMismatch)
        );
    }

    #[test]
    fn any_flipped_signature_character_is_rejected() {
        let service = default_service();
        let issued = service.issue("admin", &admin_roles()).unwrap();
        let signature_start = issued.token.rfind('.').unwrap() + 1;

        for index in signature_start..issued.token.len() {
            let mut bytes = issued.token.clone().into_bytes();
            bytes[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();
            assert!(
                service.try_authenticate(&tampered).is_none(),
                "tampered byte {index} was accepted"
            );
        }
    }

    #[test]
    fn rejects_garbage() {
        let service = default_service();
        assert!(service.try_authenticate("").is_none());
        assert!(service.try_authenticate("not a token").is_none());
        assert!(service.try_authenticate("a.b.c").is_none());
    }

    mod within_fixed_clock {
        use super::*;

        fn issuing_service() -> TokenService {
            service_with(
                config(MY_SECRET, MY_ISSUER, MY_AUDIENCE),
                fixed("2020-04-09T20:54:43.000Z"),
            )
        }

        fn verifying_at(rfc3339: &str) -> TokenService {
            service_with(config(MY_SECRET, MY_ISSUER, MY_AUDIENCE), fixed(rfc3339))
        }

        #[test]
        fn has_issued_at_date() {
            let issued = issuing_service().issue("admin", &admin_roles()).unwrap();
            assert_eq!(payload(&issued.token)["iat"], 1586465683);
        }

        #[test]
        fn has_expire_date() {
            let issued = issuing_service().issue("admin", &admin_roles()).unwrap();
            assert_eq!(payload(&issued.token)["exp"], 1586465684);
            assert_eq!(
                issued.expires_at - issued.issued_at,
                TimeDelta::milliseconds(1000)
            );
        }

        #[test]
        fn issuing_is_deterministic() {
            let service = issuing_service();
            assert_eq!(
                service.issue("admin", &admin_roles()).unwrap().token,
                service.issue("admin", &admin_roles()).unwrap().token
            );
        }

        #[test]
        fn authenticates_just_before_expiry() {
            let issued = issuing_service().issue("admin", &admin_roles()).unwrap();
            let auth = verifying_at("2020-04-09T20:54:43.999Z").try_authenticate(&issued.token);
            assert!(auth.is_some());
        }

        #[test]
        fn rejects_at_expiry_boundary() {
            let issued = issuing_service().issue("admin", &admin_roles()).unwrap();
            let service = verifying_at("2020-04-09T20:54:44.000Z");
            assert!(service.try_authenticate(&issued.token).is_none());
            assert_eq!(service.verify(&issued.token), Err(TokenError::Expired));
        }

        #[test]
        fn rejects_after_expiry() {
            let issued = issuing_service().issue("admin", &admin_roles()).unwrap();
            assert!(verifying_at("2020-04-09T20:54:45Z")
                .try_authenticate(&issued.token)
                .is_none());
        }
    }
}
