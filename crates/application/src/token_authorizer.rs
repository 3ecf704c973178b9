//! Bearer token verification and role guards.

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;

use schoolhub_core::{AuthError, AuthResult};
use schoolhub_domain::{RoleCodeRegistry, RoleName, UserId};

use crate::TokenCodec;

/// Identity extracted from a verified access token.
///
/// The role codes are the issuance-time snapshot; the store is not consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedPrincipal {
    subject: UserId,
    role_codes: Vec<i32>,
}

impl AuthenticatedPrincipal {
    /// Creates a principal from verified token data.
    #[must_use]
    pub fn new(subject: UserId, role_codes: Vec<i32>) -> Self {
        Self {
            subject,
            role_codes,
        }
    }

    /// Returns the principal identifier.
    #[must_use]
    pub fn subject(&self) -> UserId {
        self.subject
    }

    /// Returns the role codes embedded in the token.
    #[must_use]
    pub fn role_codes(&self) -> &[i32] {
        &self.role_codes
    }

    /// Resolves the embedded codes to role names.
    #[must_use]
    pub fn role_names(&self) -> Vec<RoleName> {
        RoleCodeRegistry::names_for_codes(&self.role_codes)
    }

    /// Returns whether the principal holds at least one of `required`.
    #[must_use]
    pub fn has_any_role(&self, required: &[RoleName]) -> bool {
        self.role_names()
            .iter()
            .any(|role| required.contains(role))
    }

    /// Fails with `AuthError::Unauthorized` unless the principal holds one of
    /// `required`. The error does not reveal which roles would have passed.
    pub fn require_any_role(&self, required: &[RoleName]) -> AuthResult<()> {
        if self.has_any_role(required) {
            Ok(())
        } else {
            Err(AuthError::Unauthorized)
        }
    }
}

/// Verifies inbound access tokens.
#[derive(Clone)]
pub struct TokenAuthorizer {
    token_codec: Arc<dyn TokenCodec>,
}

impl TokenAuthorizer {
    /// Creates an authorizer sharing the issuer's codec.
    #[must_use]
    pub fn new(token_codec: Arc<dyn TokenCodec>) -> Self {
        Self { token_codec }
    }

    /// Verifies `raw_token` and returns the embedded identity.
    pub fn authorize(&self, raw_token: &str) -> AuthResult<AuthenticatedPrincipal> {
        let raw_token = raw_token.trim();
        if raw_token.is_empty() {
            return Err(AuthError::Unauthenticated);
        }

        let claims = self.token_codec.decode(raw_token)?;
        claims.validate_window(Utc::now())?;

        let subject = UserId::from_str(&claims.sub).map_err(|_| AuthError::Unauthenticated)?;

        Ok(AuthenticatedPrincipal::new(subject, claims.roles))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use schoolhub_core::AuthError;
    use schoolhub_domain::{RoleName, UserId};

    use super::{AuthenticatedPrincipal, TokenAuthorizer};
    use crate::test_support::FakeTokenCodec;
    use crate::{AccessTokenClaims, TokenCodec};

    fn authorizer() -> TokenAuthorizer {
        TokenAuthorizer::new(Arc::new(FakeTokenCodec))
    }

    fn token_for(subject: &str, roles: Vec<i32>, issued_at: chrono::DateTime<Utc>) -> String {
        let claims = AccessTokenClaims::new(subject, roles, issued_at, Duration::hours(24));
        FakeTokenCodec.encode(&claims).unwrap_or_default()
    }

    #[test]
    fn valid_token_yields_subject_and_codes() {
        let user_id = UserId::new();
        let token = token_for(&user_id.to_string(), vec![2938], Utc::now());

        let principal = authorizer().authorize(&token);

        assert_eq!(
            principal.ok(),
            Some(AuthenticatedPrincipal::new(user_id, vec![2938]))
        );
    }

    #[test]
    fn tampered_token_is_unauthenticated() {
        let result = authorizer().authorize("forged:whatever");
        assert!(matches!(result, Err(AuthError::Unauthenticated)));
    }

    #[test]
    fn empty_token_is_unauthenticated() {
        assert!(matches!(
            authorizer().authorize("   "),
            Err(AuthError::Unauthenticated)
        ));
    }

    #[test]
    fn expired_token_is_unauthenticated() {
        let token = token_for(
            &UserId::new().to_string(),
            vec![6794],
            Utc::now() - Duration::hours(25),
        );
        assert!(matches!(
            authorizer().authorize(&token),
            Err(AuthError::Unauthenticated)
        ));
    }

    #[test]
    fn non_uuid_subject_is_unauthenticated() {
        let token = token_for("alice", vec![6794], Utc::now());
        assert!(matches!(
            authorizer().authorize(&token),
            Err(AuthError::Unauthenticated)
        ));
    }

    #[test]
    fn guard_accepts_intersecting_roles() {
        let principal = AuthenticatedPrincipal::new(UserId::new(), vec![1847]);
        assert!(
            principal
                .require_any_role(&[RoleName::Admin, RoleName::Maintainer])
                .is_ok()
        );
    }

    #[test]
    fn guard_rejects_disjoint_roles() {
        let principal = AuthenticatedPrincipal::new(UserId::new(), vec![2938]);
        assert!(matches!(
            principal.require_any_role(&[RoleName::Admin]),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn unknown_codes_grant_nothing() {
        let principal = AuthenticatedPrincipal::new(UserId::new(), vec![999_999]);
        assert!(principal.role_names().is_empty());
        assert!(!principal.has_any_role(RoleName::all()));
    }
}
