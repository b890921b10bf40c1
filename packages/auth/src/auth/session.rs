//! # Session tokens: HS256 JWTs
//!
//! A session token asserts a local user identity to later requests. It is stateless: the
//! signature and the embedded expiry are all a verifier needs, nothing is stored.
//!
//! ## Payload
//!
//! ```json
//! {
//!   "user": { "name": "Alice", "avatar_url": "http://x/a.png", "id": "<uuid>" },
//!   "sub": "<uuid>",
//!   "iat": 1717200000,
//!   "exp": 1717286400
//! }
//! ```
//!
//! The signing primitive sits behind [`TokenSigner`] so tests and embedders can swap it.

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Lifetime of an issued session token.
pub const SESSION_TTL_HOURS: i64 = 24;

/// Secret used to sign session tokens. Never empty.
#[derive(Clone)]
pub struct SigningSecret(String);

impl SigningSecret {
    pub fn new(secret: impl Into<String>) -> Result<Self, AuthError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(AuthError::Configuration("JWT_SECRET is empty".into()));
        }
        Ok(Self(secret))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret([redacted])")
    }
}

/// User claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub name: String,
    pub avatar_url: String,
    pub id: String,
}

/// Full JWT payload as signed by [`JwtSigner`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtPayload {
    pub user: SessionClaims,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum SignError {
    #[error("failed to sign session token: {0}")]
    Encode(#[from] jsonwebtoken::errors::Error),
}

/// Opaque signing primitive used to issue session tokens.
pub trait TokenSigner: Send + Sync {
    fn sign(
        &self,
        claims: &SessionClaims,
        subject: &str,
        secret: &SigningSecret,
        expires_in: Duration,
    ) -> Result<String, SignError>;
}

/// HS256 JWT signer.
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtSigner;

impl TokenSigner for JwtSigner {
    fn sign(
        &self,
        claims: &SessionClaims,
        subject: &str,
        secret: &SigningSecret,
        expires_in: Duration,
    ) -> Result<String, SignError> {
        let issued_at = Utc::now();
        let payload = JwtPayload {
            user: claims.clone(),
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + expires_in).timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(secret.as_bytes()),
        )?;
        Ok(token)
    }
}
