use std::fmt;
use std::future::Future;

use oauth2::AccessToken;

use crate::error::AuthError;

/// Single-use authorization code from the OAuth redirect.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthorizationCode(String);

impl AuthorizationCode {
    pub fn new(code: impl Into<String>) -> Result<Self, AuthError> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(AuthError::InvalidInput("authorization code is empty".into()));
        }
        Ok(Self(code))
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthorizationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthorizationCode([redacted])")
    }
}

/// Bearer credential for the provider API. Never empty.
#[derive(Debug, Clone)]
pub struct ProviderAccessToken(AccessToken);

impl ProviderAccessToken {
    /// Returns `None` for an empty token.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.is_empty() {
            return None;
        }
        Some(Self(AccessToken::new(token)))
    }

    pub fn secret(&self) -> &str {
        self.0.secret()
    }
}

/// Stage 1: trade an authorization code for a provider access token.
///
/// Client credentials belong to the implementor. Network failures, rejected codes and
/// responses without a token are all [`AuthError::UpstreamAuth`].
pub trait CodeExchanger: Send + Sync {
    fn exchange(
        &self,
        code: &AuthorizationCode,
    ) -> impl Future<Output = Result<ProviderAccessToken, AuthError>> + Send;
}
