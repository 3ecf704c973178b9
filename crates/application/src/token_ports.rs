//! Access token claims and the signing port.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use schoolhub_core::{AppResult, AuthError, AuthResult};

/// Default access token lifetime.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Claims carried by every access token.
///
/// `roles` is a snapshot of the grants at issuance time. Role changes only
/// become visible after the principal logs in again or the token expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Principal identifier.
    pub sub: String,
    /// Numeric role codes.
    pub roles: Vec<i32>,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

impl AccessTokenClaims {
    /// Builds claims for `subject` valid for `ttl` from `issued_at`.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        roles: Vec<i32>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            sub: subject.into(),
            roles,
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }

    /// Checks the claim time window against `now`.
    pub fn validate_window(&self, now: DateTime<Utc>) -> AuthResult<()> {
        if self.exp <= self.iat {
            return Err(AuthError::Unauthenticated);
        }
        if now.timestamp() >= self.exp {
            return Err(AuthError::Unauthenticated);
        }

        Ok(())
    }
}

/// Token lifetime configuration, fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSettings {
    ttl: Duration,
}

impl TokenSettings {
    /// Creates settings with the given lifetime.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// Returns the token lifetime.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self::new(Duration::hours(DEFAULT_TOKEN_TTL_HOURS))
    }
}

/// Port for signing and verifying access tokens.
pub trait TokenCodec: Send + Sync {
    /// Signs claims into a compact token.
    fn encode(&self, claims: &AccessTokenClaims) -> AppResult<String>;

    /// Verifies the signature and expiry of a token and returns its claims.
    /// Every failure maps to `AuthError::Unauthenticated`.
    fn decode(&self, token: &str) -> AuthResult<AccessTokenClaims>;
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::{AccessTokenClaims, TokenSettings};

    #[test]
    fn default_ttl_is_one_day() {
        assert_eq!(TokenSettings::default().ttl(), Duration::hours(24));
    }

    #[test]
    fn fresh_claims_are_within_window() {
        let now = Utc::now();
        let claims = AccessTokenClaims::new("sub", vec![212], now, Duration::hours(24));
        assert!(claims.validate_window(now).is_ok());
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn expired_claims_are_rejected() {
        let issued_at = Utc::now() - Duration::hours(25);
        let claims = AccessTokenClaims::new("sub", vec![212], issued_at, Duration::hours(24));
        assert!(claims.validate_window(Utc::now()).is_err());
    }

    #[test]
    fn inverted_window_is_rejected() {
        let now = Utc::now();
        let claims = AccessTokenClaims::new("sub", vec![212], now, Duration::hours(-1));
        assert!(claims.validate_window(now).is_err());
    }
}
