//! # Reconciliation: provider profile to local user
//!
//! [`IdentityReconciler::reconcile`] looks the user up by GitHub id and creates the record
//! on first sign-in. Existing records are used as stored: a changed login, avatar or name
//! on GitHub is not copied over.
//!
//! If two first sign-ins for the same account race, the store's uniqueness constraint lets
//! exactly one insert through; the other sees [`RepositoryError::Conflict`] and continues
//! with the winner's row.
//!
//! The token is signed only after the user exists. When signing fails the user stays
//! persisted and the next sign-in takes the "found" branch.

use chrono::Duration;

use super::session::{SessionClaims, SigningSecret, TokenSigner, SESSION_TTL_HOURS};
use super::AuthenticatedSession;
use crate::db::{RepositoryError, UserRepository};
use crate::error::AuthError;
use crate::models::{NewUser, ProviderProfile, User};

/// Stage 3: find-or-create the local user and issue a session token.
pub struct IdentityReconciler<R, S> {
    repository: R,
    signer: S,
    secret: SigningSecret,
}

impl<R, S> IdentityReconciler<R, S>
where
    R: UserRepository,
    S: TokenSigner,
{
    pub fn new(repository: R, signer: S, secret: SigningSecret) -> Self {
        Self {
            repository,
            signer,
            secret,
        }
    }

    pub async fn reconcile(
        &self,
        profile: &ProviderProfile,
    ) -> Result<AuthenticatedSession, AuthError> {
        let user = self.find_or_create(profile).await?;
        let token = self.issue_token(&user)?;
        Ok(AuthenticatedSession { token, user })
    }

    async fn find_or_create(&self, profile: &ProviderProfile) -> Result<User, AuthError> {
        if let Some(user) = self
            .repository
            .find_by_provider_id(profile.provider_id)
            .await?
        {
            tracing::debug!(user_id = %user.id, provider_id = profile.provider_id, "existing user");
            return Ok(user);
        }

        match self.repository.create(NewUser::from(profile)).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, provider_id = profile.provider_id, "created user");
                Ok(user)
            }
            Err(RepositoryError::Conflict(provider_id)) => {
                tracing::debug!(provider_id, "lost concurrent insert, reading existing user");
                self.repository
                    .find_by_provider_id(provider_id)
                    .await?
                    .ok_or_else(|| {
                        AuthError::Persistence(format!(
                            "user with provider id {provider_id} conflicted on insert but was not found"
                        ))
                    })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let subject = user.id.to_string();
        let claims = SessionClaims {
            name: user.name.clone(),
            avatar_url: user.avatar_url.clone(),
            id: subject.clone(),
        };

        let token = self.signer.sign(
            &claims,
            &subject,
            &self.secret,
            Duration::hours(SESSION_TTL_HOURS),
        )?;
        Ok(token)
    }
}
