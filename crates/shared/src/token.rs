//! Access-token issuing and verification.
//!
//! The service deals only in short-lived bearer tokens; deciding who gets a
//! token and with which role happens elsewhere.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Claims carried inside an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Role granted to the subject.
    pub role: String,
    /// Issued-at timestamp, unix seconds.
    pub iat: i64,
    /// Expiry timestamp, unix seconds.
    pub exp: i64,
}

impl Claims {
    /// Id of the user the token was issued to.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }
}

/// Settings for token issuing.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HMAC secret the tokens are signed with.
    pub secret: String,
    /// How long an issued token stays valid, in minutes.
    pub ttl_minutes: i64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            ttl_minutes: 15,
        }
    }
}

/// Failures while issuing or verifying tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signing the claims failed.
    #[error("could not sign token: {0}")]
    Signing(String),

    /// The token has expired.
    #[error("token has expired")]
    Expired,

    /// The token is malformed or signed with a different key.
    #[error("invalid token: {0}")]
    Invalid(String),
}

/// Issues and verifies the bearer tokens the API accepts.
#[derive(Clone)]
pub struct TokenService {
    ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .field("keys", &"[hidden]")
            .finish()
    }
}

impl TokenService {
    /// Creates a service signing with the configured secret.
    #[must_use]
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            ttl: Duration::minutes(config.ttl_minutes),
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
        }
    }

    /// Issues a signed access token for the given user.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if the claims cannot be encoded.
    pub fn issue(&self, user_id: Uuid, role: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            role: role.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verifies a token's signature and expiry, returning its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` for an outdated token and
    /// `TokenError::Invalid` for anything else that fails verification.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}
