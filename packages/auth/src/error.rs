//! Error taxonomy for the sign-in pipeline.
//!
//! Every stage fails fast with one of these kinds and the remaining stages never run.

use crate::auth::SignError;
use crate::db::RepositoryError;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AuthError {
    /// Missing or invalid process configuration. Needs an operator fix.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// The caller handed us something unusable, e.g. an empty authorization code.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The provider was unreachable or rejected the code or token.
    #[error("upstream authentication failed: {0}")]
    UpstreamAuth(String),
    /// The provider answered but its profile payload is missing required fields.
    #[error("malformed provider profile: {0}")]
    MalformedProfile(String),
    /// The user store is unavailable or a write failed.
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl AuthError {
    /// Short, stable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::Configuration(_) => "configuration",
            AuthError::InvalidInput(_) => "invalid_input",
            AuthError::UpstreamAuth(_) => "upstream_auth",
            AuthError::MalformedProfile(_) => "malformed_profile",
            AuthError::Persistence(_) => "persistence",
        }
    }
}

impl From<RepositoryError> for AuthError {
    fn from(err: RepositoryError) -> Self {
        AuthError::Persistence(err.to_string())
    }
}

impl From<SignError> for AuthError {
    fn from(err: SignError) -> Self {
        AuthError::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::errors::ErrorKind;

    use super::*;

    #[test]
    fn test_repository_errors_become_persistence() {
        let err: AuthError = RepositoryError::Unavailable("connection refused".into()).into();
        assert!(matches!(err, AuthError::Persistence(_)));
        assert_eq!(err.kind(), "persistence");
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_sign_errors_become_configuration() {
        let encode = jsonwebtoken::errors::Error::from(ErrorKind::InvalidKeyFormat);
        let err: AuthError = SignError::from(encode).into();
        assert!(matches!(err, AuthError::Configuration(_)));
        assert!(err.to_string().contains("failed to sign session token"));
        assert_eq!(err.kind(), "configuration");
    }
}
