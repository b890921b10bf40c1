//! # GitHub OAuth 2.0 client
//!
//! Implements the first two pipeline stages against GitHub.
//!
//! ## Types
//!
//! - [`GitHubUser`]: deserialization target for `api.github.com/user`. Every field is
//!   optional on the wire so a missing one surfaces as a malformed-profile error rather
//!   than a generic decode failure.
//! - [`GitHubTokenResponse`]: token endpoint reply. Only `access_token` is required;
//!   `token_type` is not read and is taken as `bearer`.
//! - [`ConfiguredClient`]: a fully-typed `oauth2::Client` alias over that response with
//!   auth and token endpoints set.
//! - [`GitHubOAuth`]: the public handler built from an [`AuthConfig`].
//!
//! ## Flow
//!
//! 1. **[`authorize_url`](GitHubOAuth::authorize_url)**: builds the URL the browser is sent
//!    to, requesting the `read:user` scope with a random CSRF state. Keeping that state
//!    until the callback is the caller's job.
//!
//! 2. **[`exchange`](CodeExchanger::exchange)**: POSTs the code together with the client
//!    id and secret to `/login/oauth/access_token`. GitHub answers bad codes with
//!    `200 {"error": ...}`, which fails to parse as a token response and is reported as
//!    [`AuthError::UpstreamAuth`] like any other rejection.
//!
//! 3. **[`fetch_profile`](IdentityFetcher::fetch_profile)**: GETs `/user` with the bearer
//!    token and maps `id`, `login`, `avatar_url` and `name`. All four are required.

use std::time::Duration;

use oauth2::basic::BasicTokenType;
use oauth2::{
    AccessToken, AuthType, CsrfToken, EndpointNotSet, EndpointSet, RefreshToken, Scope,
    TokenResponse,
};
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use super::{AuthorizationCode, CodeExchanger, IdentityFetcher, ProviderAccessToken};
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::models::ProviderProfile;

/// GitHub user info from API.
#[derive(Debug, Deserialize)]
struct GitHubUser {
    id: Option<i64>,
    login: Option<String>,
    avatar_url: Option<String>,
    name: Option<String>,
}

impl GitHubUser {
    fn into_profile(self) -> Result<ProviderProfile, AuthError> {
        let provider_id = self.id.ok_or_else(|| missing("id"))?;
        Ok(ProviderProfile {
            provider_id,
            login: non_empty(self.login, "login")?,
            avatar_url: non_empty(self.avatar_url, "avatar_url")?,
            display_name: non_empty(self.name, "name")?,
        })
    }
}

fn missing(field: &str) -> AuthError {
    AuthError::MalformedProfile(format!("GitHub user response has no `{field}`"))
}

fn non_empty(value: Option<String>, field: &str) -> Result<String, AuthError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| missing(field))
}

/// Longest slice of an upstream error body carried into an error message.
const MAX_ERROR_BODY: usize = 256;

fn truncate_body(body: &str) -> &str {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}

/// Token endpoint reply. `BasicTokenResponse` requires `token_type`, which GitHub is not
/// obliged to send.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct GitHubTokenResponse {
    access_token: AccessToken,
    #[serde(skip, default = "bearer")]
    token_type: BasicTokenType,
}

fn bearer() -> BasicTokenType {
    BasicTokenType::Bearer
}

impl TokenResponse for GitHubTokenResponse {
    type TokenType = BasicTokenType;

    fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    fn token_type(&self) -> &BasicTokenType {
        &self.token_type
    }

    fn expires_in(&self) -> Option<Duration> {
        None
    }

    fn refresh_token(&self) -> Option<&RefreshToken> {
        None
    }

    fn scopes(&self) -> Option<&Vec<Scope>> {
        None
    }
}

/// `BasicClient` with GitHub's token response.
type GitHubClient<HasAuthUrl = EndpointNotSet, HasTokenUrl = EndpointNotSet> = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    GitHubTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    HasAuthUrl,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    HasTokenUrl,
>;

/// OAuth client type with auth URL and token URL set.
type ConfiguredClient = GitHubClient<EndpointSet, EndpointSet>;

/// GitHub OAuth handler.
#[derive(Debug, Clone)]
pub struct GitHubOAuth {
    client: ConfiguredClient,
    http: Client,
    user_url: Url,
}

impl GitHubOAuth {
    /// Create a new GitHub OAuth handler.
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        // Following redirects opens the client up to SSRF.
        let http = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AuthError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client: create_client(config),
            http,
            user_url: config.user_url.clone(),
        })
    }

    /// Generate the authorization URL and its CSRF state.
    pub fn authorize_url(&self) -> (String, String) {
        let (auth_url, csrf_state) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("read:user".to_string()))
            .url();

        (auth_url.to_string(), csrf_state.secret().clone())
    }
}

fn create_client(config: &AuthConfig) -> ConfiguredClient {
    let client = GitHubClient::new(config.client_id.clone())
        .set_client_secret(config.client_secret.clone())
        .set_auth_uri(config.auth_url.clone())
        .set_token_uri(config.token_url.clone())
        .set_auth_type(AuthType::RequestBody);

    match &config.redirect_url {
        Some(url) => client.set_redirect_uri(url.clone()),
        None => client,
    }
}

impl CodeExchanger for GitHubOAuth {
    async fn exchange(&self, code: &AuthorizationCode) -> Result<ProviderAccessToken, AuthError> {
        let token_result = self
            .client
            .exchange_code(oauth2::AuthorizationCode::new(code.secret().to_string()))
            .request_async(&self.http)
            .await
            .map_err(|e| AuthError::UpstreamAuth(format!("token exchange failed: {e}")))?;

        ProviderAccessToken::new(token_result.access_token().secret().clone()).ok_or_else(|| {
            AuthError::UpstreamAuth("token endpoint returned an empty access token".into())
        })
    }
}

impl IdentityFetcher for GitHubOAuth {
    async fn fetch_profile(&self, token: &ProviderAccessToken) -> Result<ProviderProfile, AuthError> {
        let response = self
            .http
            .get(self.user_url.clone())
            .bearer_auth(token.secret())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| AuthError::UpstreamAuth(format!("user request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::UpstreamAuth(format!(
                "user endpoint returned {status}: {}",
                truncate_body(&body)
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AuthError::UpstreamAuth(format!("failed to read user response: {e}")))?;

        let github_user: GitHubUser = serde_json::from_slice(&body)
            .map_err(|e| AuthError::MalformedProfile(format!("invalid user payload: {e}")))?;

        github_user.into_profile()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(json: &str) -> Result<ProviderProfile, AuthError> {
        serde_json::from_str::<GitHubUser>(json).unwrap().into_profile()
    }

    fn test_config() -> AuthConfig {
        AuthConfig::new("test-client", "test-secret", "jwt").unwrap()
    }

    #[test]
    fn test_complete_user_maps_to_profile() {
        let profile = user(
            r#"{"id": 42, "login": "alice", "avatar_url": "http://x/a.png", "name": "Alice", "bio": null}"#,
        )
        .unwrap();

        assert_eq!(
            profile,
            ProviderProfile {
                provider_id: 42,
                login: "alice".to_string(),
                avatar_url: "http://x/a.png".to_string(),
                display_name: "Alice".to_string(),
            }
        );
    }

    #[test]
    fn test_each_missing_field_is_malformed() {
        let cases = [
            r#"{"login": "alice", "avatar_url": "http://x/a.png", "name": "Alice"}"#,
            r#"{"id": 42, "avatar_url": "http://x/a.png", "name": "Alice"}"#,
            r#"{"id": 42, "login": "alice", "name": "Alice"}"#,
            r#"{"id": 42, "login": "alice", "avatar_url": "http://x/a.png"}"#,
            r#"{"id": 42, "login": "alice", "avatar_url": "http://x/a.png", "name": null}"#,
            r#"{"id": 42, "login": "", "avatar_url": "http://x/a.png", "name": "Alice"}"#,
        ];

        for case in cases {
            assert!(
                matches!(user(case), Err(AuthError::MalformedProfile(_))),
                "expected malformed profile for {case}"
            );
        }
    }

    #[test]
    fn test_token_response_needs_only_access_token() {
        let token: GitHubTokenResponse = serde_json::from_str(r#"{"access_token": "tok1"}"#).unwrap();
        assert_eq!(token.access_token().secret(), "tok1");
        assert_eq!(token.token_type(), &BasicTokenType::Bearer);

        let token: GitHubTokenResponse = serde_json::from_str(
            r#"{"access_token": "tok1", "token_type": "bearer", "scope": "read:user"}"#,
        )
        .unwrap();
        assert_eq!(token.access_token().secret(), "tok1");
    }

    #[test]
    fn test_error_body_is_truncated() {
        let long = "x".repeat(MAX_ERROR_BODY * 4);
        assert_eq!(truncate_body(&long).len(), MAX_ERROR_BODY);
        assert_eq!(truncate_body("Bad credentials"), "Bad credentials");

        let wide = "é".repeat(MAX_ERROR_BODY + 1);
        assert_eq!(truncate_body(&wide).chars().count(), MAX_ERROR_BODY);
    }

    #[test]
    fn test_authorize_url_contains_client_and_state() {
        let oauth = GitHubOAuth::new(&test_config()).unwrap();
        let (url, state) = oauth.authorize_url();

        assert!(url.starts_with("https://github.com/login/oauth/authorize?"));
        assert!(url.contains("client_id=test-client"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains(&format!("state={state}")));
        assert!(!state.is_empty());
    }

    #[test]
    fn test_authorize_url_state_unique_per_call() {
        let oauth = GitHubOAuth::new(&test_config()).unwrap();
        let (_, first) = oauth.authorize_url();
        let (_, second) = oauth.authorize_url();
        assert_ne!(first, second);
    }
}
