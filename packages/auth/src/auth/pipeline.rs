use serde::Serialize;
use sqlx::PgPool;

use super::{
    AuthorizationCode, CodeExchanger, GitHubOAuth, IdentityFetcher, IdentityReconciler,
    JwtSigner, TokenSigner,
};
use crate::config::AuthConfig;
use crate::db::{PgUserRepository, UserRepository};
use crate::error::AuthError;
use crate::models::User;

/// Result of a successful sign-in.
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedSession {
    pub token: String,
    pub user: User,
}

/// Production wiring: GitHub, PostgreSQL and HS256 JWTs.
pub type GitHubAuthenticator =
    AuthenticateUser<GitHubOAuth, GitHubOAuth, PgUserRepository, JwtSigner>;

/// Runs exchange → fetch → reconcile for one authorization code.
pub struct AuthenticateUser<X, F, R, S> {
    exchanger: X,
    fetcher: F,
    reconciler: IdentityReconciler<R, S>,
}

impl GitHubAuthenticator {
    pub fn github(config: &AuthConfig, pool: PgPool) -> Result<Self, AuthError> {
        let oauth = GitHubOAuth::new(config)?;
        let reconciler = IdentityReconciler::new(
            PgUserRepository::new(pool),
            JwtSigner,
            config.signing_secret.clone(),
        );
        Ok(Self::new(oauth.clone(), oauth, reconciler))
    }
}

impl<X, F, R, S> AuthenticateUser<X, F, R, S>
where
    X: CodeExchanger,
    F: IdentityFetcher,
    R: UserRepository,
    S: TokenSigner,
{
    pub fn new(exchanger: X, fetcher: F, reconciler: IdentityReconciler<R, S>) -> Self {
        Self {
            exchanger,
            fetcher,
            reconciler,
        }
    }

    /// Authenticate the owner of `code` and issue a session token.
    ///
    /// Each stage aborts the rest on failure; nothing partial is returned.
    #[tracing::instrument(skip_all)]
    pub async fn execute(&self, code: &str) -> Result<AuthenticatedSession, AuthError> {
        let result = self.run(code).await;
        match &result {
            Ok(session) => tracing::info!(user_id = %session.user.id, "user authenticated"),
            Err(e) => tracing::warn!(kind = e.kind(), error = %e, "authentication failed"),
        }
        result
    }

    async fn run(&self, code: &str) -> Result<AuthenticatedSession, AuthError> {
        let code = AuthorizationCode::new(code)?;
        let access_token = self.exchanger.exchange(&code).await?;
        let profile = self.fetcher.fetch_profile(&access_token).await?;
        tracing::debug!(provider_id = profile.provider_id, login = %profile.login, "fetched profile");
        self.reconciler.reconcile(&profile).await
    }
}
