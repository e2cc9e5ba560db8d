use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::application::ports::{CredentialError, TokenClaims, TokenService};
use crate::domain::User;

/// HS256 access tokens. Expiry is checked here rather than by `jsonwebtoken`
/// so that it is exact (no leeway) and testable against a fixed clock.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtTokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn issue_at(&self, user: &User, now: DateTime<Utc>) -> Result<String, CredentialError> {
        let ttl = i64::try_from(self.ttl.as_secs())
            .map_err(|e| CredentialError::Signing(e.to_string()))?;
        let iat = now.timestamp();
        let claims = TokenClaims {
            user_id: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            iat,
            exp: iat.saturating_add(ttl),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| CredentialError::Signing(e.to_string()))
    }

    pub fn verify_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenClaims, CredentialError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| CredentialError::InvalidToken(e.to_string()))?;

        if now.timestamp() >= data.claims.exp {
            return Err(CredentialError::Expired);
        }

        Ok(data.claims)
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user: &User) -> Result<String, CredentialError> {
        self.issue_at(user, Utc::now())
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, CredentialError> {
        self.verify_at(token, Utc::now())
    }
}
