//! # Sign-in pipeline
//!
//! Three stages, strictly in order, each consuming the previous stage's output:
//!
//! 1. [`CodeExchanger`]: one-time authorization code → provider access token.
//! 2. [`IdentityFetcher`]: access token → [`ProviderProfile`](crate::models::ProviderProfile).
//! 3. [`IdentityReconciler`]: profile → local [`User`](crate::models::User) (find-or-create)
//!    plus a signed session token.
//!
//! [`AuthenticateUser`] runs them. None of the stages retries: authorization codes are
//! single-use, so the only valid retry is a whole new sign-in with a fresh code.
//!
//! [`GitHubOAuth`] implements the first two stages against GitHub, [`JwtSigner`] signs
//! session tokens as HS256 JWTs.

mod code;
mod github;
mod identity;
mod pipeline;
mod reconcile;
mod session;

pub use code::{AuthorizationCode, CodeExchanger, ProviderAccessToken};
pub use github::GitHubOAuth;
pub use identity::IdentityFetcher;
pub use pipeline::{AuthenticateUser, AuthenticatedSession, GitHubAuthenticator};
pub use reconcile::IdentityReconciler;
pub use session::{
    JwtPayload, JwtSigner, SessionClaims, SignError, SigningSecret, TokenSigner,
    SESSION_TTL_HOURS,
};
