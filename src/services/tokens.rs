//! Signed session tokens (HS256 JWT)

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::{clock::Clock, config::AuthConfig, models::user::{Credential, UserClaims}};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token signature or algorithm")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is not valid yet")]
    NotYetValid,

    #[error("malformed token: {0}")]
    Malformed(String),
}

/// Issues and validates session tokens against a shared secret.
///
/// Expiry and not-before are checked against the injected [`Clock`] rather
/// than the library's own reading of the system time.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    pub fn new(secret: &str, issuer: impl Into<String>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
            ttl,
            clock,
        }
    }

    pub fn from_config(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(
            &config.jwt_secret,
            config.issuer.clone(),
            Duration::seconds(config.token_ttl_secs),
            clock,
        )
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign a token for the given credential
    pub fn issue(&self, credential: &Credential) -> Result<String, TokenError> {
        let now = self.clock.now().timestamp();
        let claims = UserClaims {
            sub: credential.id.to_string(),
            user_id: credential.id,
            username: credential.username.clone(),
            role: credential.role.clone(),
            iss: self.issuer.clone(),
            iat: now,
            nbf: now,
            exp: now + self.ttl.num_seconds(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Malformed(e.to_string()))
    }

    /// Verify signature, algorithm and issuer, then the time window
    pub fn validate(&self, token: &str) -> Result<UserClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;

        let claims = decode::<UserClaims>(token, &self.decoding, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
                _ => TokenError::Malformed(e.to_string()),
            })?
            .claims;

        let now = self.clock.now().timestamp();
        if now > claims.exp {
            return Err(TokenError::Expired);
        }
        if now < claims.nbf {
            return Err(TokenError::NotYetValid);
        }

        Ok(claims)
    }
}
