//! HS256 access token codec.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use schoolhub_application::{AccessTokenClaims, TokenCodec};
use schoolhub_core::{AppError, AppResult, AuthError, AuthResult};
use tracing::debug;

/// Signs and verifies access tokens with a shared HMAC secret.
#[derive(Clone)]
pub struct JwtTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtTokenCodec {
    /// Creates a codec from the signing secret.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

impl TokenCodec for JwtTokenCodec {
    fn encode(&self, claims: &AccessTokenClaims) -> AppResult<String> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|error| AppError::Internal(format!("failed to sign access token: {error}")))
    }

    fn decode(&self, token: &str) -> AuthResult<AccessTokenClaims> {
        jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|error| {
                debug!(reason = ?error.kind(), "access token rejected");
                AuthError::Unauthenticated
            })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use schoolhub_application::{AccessTokenClaims, TokenCodec};
    use schoolhub_core::AuthError;

    use super::JwtTokenCodec;

    const SECRET: &str = "test-secret-with-at-least-32-characters";

    fn claims(issued_at: chrono::DateTime<Utc>) -> AccessTokenClaims {
        AccessTokenClaims::new("3f1c", vec![2938, 4923], issued_at, Duration::hours(24))
    }

    #[test]
    fn decodes_what_it_signs() {
        let codec = JwtTokenCodec::new(SECRET);
        let original = claims(Utc::now());

        let decoded = codec.encode(&original).map(|token| codec.decode(&token));

        assert_eq!(decoded.ok().and_then(Result::ok), Some(original));
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let issuer = JwtTokenCodec::new("another-secret-with-at-least-32-chars!");
        let Ok(token) = issuer.encode(&claims(Utc::now())) else {
            panic!("signing should succeed");
        };

        let result = JwtTokenCodec::new(SECRET).decode(&token);
        assert!(matches!(result, Err(AuthError::Unauthenticated)));
    }

    #[test]
    fn rejects_tampered_payload() {
        let codec = JwtTokenCodec::new(SECRET);
        let Ok(token) = codec.encode(&claims(Utc::now())) else {
            panic!("signing should succeed");
        };
        let mut segments: Vec<String> = token.split('.').map(str::to_owned).collect();
        segments[1].push('A');

        let result = codec.decode(&segments.join("."));
        assert!(matches!(result, Err(AuthError::Unauthenticated)));
    }

    #[test]
    fn rejects_expired_token() {
        let codec = JwtTokenCodec::new(SECRET);
        let Ok(token) = codec.encode(&claims(Utc::now() - Duration::hours(25))) else {
            panic!("signing should succeed");
        };

        assert!(matches!(
            codec.decode(&token),
            Err(AuthError::Unauthenticated)
        ));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            JwtTokenCodec::new(SECRET).decode("not-a-jwt"),
            Err(AuthError::Unauthenticated)
        ));
    }
}
