//! # Configuration: GitHub credentials and the session signing secret
//!
//! [`AuthConfig`] is built once at process start and handed to the pipeline. Nothing inside
//! the stages reads the environment.
//!
//! ## Environment variables
//!
//! | Variable | Required | Default |
//! |----------|----------|---------|
//! | `GITHUB_CLIENT_ID` | yes | |
//! | `GITHUB_CLIENT_SECRET` | yes | |
//! | `JWT_SECRET` | yes | |
//! | `GITHUB_OAUTH_URL` | no | `https://github.com` |
//! | `GITHUB_API_URL` | no | `https://api.github.com` |
//! | `AUTH_REDIRECT_URI` | no | unset (GitHub uses the app's registered callback) |
//! | `GITHUB_USER_AGENT` | no | `auth` |
//!
//! A `.env` file is loaded first via `dotenvy` when one exists.

use oauth2::{AuthUrl, ClientId, ClientSecret, RedirectUrl, TokenUrl};
use reqwest::Url;

use crate::auth::SigningSecret;
use crate::error::AuthError;

const DEFAULT_OAUTH_URL: &str = "https://github.com";
const DEFAULT_API_URL: &str = "https://api.github.com";
const DEFAULT_USER_AGENT: &str = "auth";

/// GitHub OAuth and session-signing configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub(crate) client_id: ClientId,
    pub(crate) client_secret: ClientSecret,
    pub(crate) signing_secret: SigningSecret,
    pub(crate) auth_url: AuthUrl,
    pub(crate) token_url: TokenUrl,
    pub(crate) user_url: Url,
    pub(crate) redirect_url: Option<RedirectUrl>,
    pub(crate) user_agent: String,
}

impl AuthConfig {
    /// Create a config pointing at github.com.
    ///
    /// Empty credentials are rejected here so a misconfigured process never reaches the
    /// network.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        signing_secret: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let client_id = required("GITHUB_CLIENT_ID", client_id.into())?;
        let client_secret = required("GITHUB_CLIENT_SECRET", client_secret.into())?;
        let signing_secret = SigningSecret::new(signing_secret)?;

        Ok(Self {
            client_id: ClientId::new(client_id),
            client_secret: ClientSecret::new(client_secret),
            signing_secret,
            auth_url: auth_url(DEFAULT_OAUTH_URL)?,
            token_url: token_url(DEFAULT_OAUTH_URL)?,
            user_url: user_url(DEFAULT_API_URL)?,
            redirect_url: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, AuthError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AuthError> {
        let var = |key: &str| {
            lookup(key).ok_or_else(|| AuthError::Configuration(format!("{key} not set")))
        };

        let mut config = Self::new(
            var("GITHUB_CLIENT_ID")?,
            var("GITHUB_CLIENT_SECRET")?,
            var("JWT_SECRET")?,
        )?;

        if let Some(url) = lookup("GITHUB_OAUTH_URL") {
            config = config.with_oauth_base_url(&url)?;
        }
        if let Some(url) = lookup("GITHUB_API_URL") {
            config = config.with_api_base_url(&url)?;
        }
        if let Some(url) = lookup("AUTH_REDIRECT_URI") {
            config = config.with_redirect_url(&url)?;
        }
        if let Some(agent) = lookup("GITHUB_USER_AGENT") {
            config = config.with_user_agent(agent);
        }

        Ok(config)
    }

    /// Override the base of the authorize and token endpoints (default `https://github.com`).
    pub fn with_oauth_base_url(mut self, base: &str) -> Result<Self, AuthError> {
        self.auth_url = auth_url(base)?;
        self.token_url = token_url(base)?;
        Ok(self)
    }

    /// Override the base of the REST API (default `https://api.github.com`).
    pub fn with_api_base_url(mut self, base: &str) -> Result<Self, AuthError> {
        self.user_url = user_url(base)?;
        Ok(self)
    }

    /// Redirect URI sent with the authorize and token requests.
    pub fn with_redirect_url(mut self, url: &str) -> Result<Self, AuthError> {
        let url = RedirectUrl::new(url.to_string())
            .map_err(|e| AuthError::Configuration(format!("invalid AUTH_REDIRECT_URI: {e}")))?;
        self.redirect_url = Some(url);
        Ok(self)
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn client_id(&self) -> &str {
        self.client_id.as_str()
    }

    pub fn token_url(&self) -> &str {
        self.token_url.as_str()
    }

    pub fn user_url(&self) -> &Url {
        &self.user_url
    }

    pub fn signing_secret(&self) -> &SigningSecret {
        &self.signing_secret
    }
}

fn required(name: &str, value: String) -> Result<String, AuthError> {
    if value.trim().is_empty() {
        return Err(AuthError::Configuration(format!("{name} is empty")));
    }
    Ok(value)
}

fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}

fn auth_url(base: &str) -> Result<AuthUrl, AuthError> {
    AuthUrl::new(endpoint(base, "login/oauth/authorize"))
        .map_err(|e| AuthError::Configuration(format!("invalid authorize URL: {e}")))
}

fn token_url(base: &str) -> Result<TokenUrl, AuthError> {
    TokenUrl::new(endpoint(base, "login/oauth/access_token"))
        .map_err(|e| AuthError::Configuration(format!("invalid token URL: {e}")))
}

fn user_url(base: &str) -> Result<Url, AuthError> {
    Url::parse(&endpoint(base, "user"))
        .map_err(|e| AuthError::Configuration(format!("invalid API URL: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_point_at_github() {
        let config = AuthConfig::new("id", "secret", "jwt").unwrap();
        assert_eq!(config.client_id(), "id");
        assert_eq!(config.token_url(), "https://github.com/login/oauth/access_token");
        assert_eq!(config.user_url().as_str(), "https://api.github.com/user");
        assert!(config.redirect_url.is_none());
    }

    #[test]
    fn test_empty_credentials_are_configuration_errors() {
        assert!(matches!(
            AuthConfig::new("", "secret", "jwt"),
            Err(AuthError::Configuration(_))
        ));
        assert!(matches!(
            AuthConfig::new("id", "  ", "jwt"),
            Err(AuthError::Configuration(_))
        ));
        assert!(matches!(
            AuthConfig::new("id", "secret", ""),
            Err(AuthError::Configuration(_))
        ));
    }

    #[test]
    fn test_from_lookup_names_missing_variable() {
        let err = AuthConfig::from_lookup(lookup(&[
            ("GITHUB_CLIENT_ID", "id"),
            ("JWT_SECRET", "jwt"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("GITHUB_CLIENT_SECRET"));
    }

    #[test]
    fn test_from_lookup_applies_overrides() {
        let config = AuthConfig::from_lookup(lookup(&[
            ("GITHUB_CLIENT_ID", "id"),
            ("GITHUB_CLIENT_SECRET", "secret"),
            ("JWT_SECRET", "jwt"),
            ("GITHUB_OAUTH_URL", "http://127.0.0.1:9000/"),
            ("GITHUB_API_URL", "http://127.0.0.1:9001"),
            ("AUTH_REDIRECT_URI", "http://localhost:8080/auth/github/callback"),
            ("GITHUB_USER_AGENT", "my-app"),
        ]))
        .unwrap();

        assert_eq!(config.token_url(), "http://127.0.0.1:9000/login/oauth/access_token");
        assert_eq!(config.user_url().as_str(), "http://127.0.0.1:9001/user");
        assert_eq!(config.user_agent, "my-app");
        assert!(config.redirect_url.is_some());
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let config = AuthConfig::new("id", "secret", "jwt").unwrap();
        assert!(matches!(
            config.with_api_base_url("not a url"),
            Err(AuthError::Configuration(_))
        ));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = AuthConfig::new("id", "client-secret-value", "jwt-secret-value").unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("client-secret-value"));
        assert!(!debug.contains("jwt-secret-value"));
    }
}
