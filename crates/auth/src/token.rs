//! HS256 bearer-token codec.
//!
//! Issues tokens embedding `{sub, role}` with a 1-day expiry and verifies
//! incoming tokens with distinct `Expired` / `Invalid` outcomes so the HTTP
//! layer can report them separately (both map to 401).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use campusgate_core::UserId;

use crate::claims::{AccessClaims, TokenValidationError, validate_claims};
use crate::Role;

/// Token lifetime (the original issues 1-day tokens).
pub const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,

    #[error("failed to sign token")]
    Signing,
}

/// Symmetric HS256 issue/verify pair sharing one secret.
pub struct Hs256TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Hs256TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a signed token for `sub` valid from `now` for [`TOKEN_TTL_HOURS`].
    pub fn issue(&self, sub: UserId, role: Role, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = AccessClaims {
            sub,
            role,
            issued_at: now,
            expires_at: now + Duration::hours(TOKEN_TTL_HOURS),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| TokenError::Signing)
    }

    /// Verify signature and claims at time `now`.
    ///
    /// Expiry is checked by [`validate_claims`] rather than the JWT library so
    /// the clock can be injected in tests and the failure kinds stay distinct.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<AccessClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<AccessClaims>(token, &self.decoding, &validation)
            .map_err(|_| TokenError::Invalid)?;

        match validate_claims(&data.claims, now) {
            Ok(()) => Ok(data.claims),
            Err(TokenValidationError::Expired) => Err(TokenError::Expired),
            Err(_) => Err(TokenError::Invalid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> Hs256TokenCodec {
        Hs256TokenCodec::new(b"test-secret")
    }

    #[test]
    fn issue_then_verify_round_trips_claims() {
        let codec = codec();
        let sub = UserId::new();
        let now = Utc::now();

        let token = codec.issue(sub, Role::Admin, now).unwrap();
        let claims = codec.verify(&token, now).unwrap();

        assert_eq!(claims.sub, sub);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(
            claims.expires_at.timestamp() - claims.issued_at.timestamp(),
            TOKEN_TTL_HOURS * 3600
        );
    }

    #[test]
    fn expired_token_reports_expired() {
        let codec = codec();
        let issued = Utc::now() - Duration::hours(TOKEN_TTL_HOURS + 1);

        let token = codec.issue(UserId::new(), Role::Student, issued).unwrap();
        let err = codec.verify(&token, Utc::now()).unwrap_err();

        assert_eq!(err, TokenError::Expired);
    }

    #[test]
    fn wrong_secret_reports_invalid() {
        let now = Utc::now();
        let token = codec().issue(UserId::new(), Role::Student, now).unwrap();

        let other = Hs256TokenCodec::new(b"other-secret");
        assert_eq!(other.verify(&token, now).unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn garbage_token_reports_invalid() {
        let err = codec().verify("not.a.token", Utc::now()).unwrap_err();
        assert_eq!(err, TokenError::Invalid);
    }
}
