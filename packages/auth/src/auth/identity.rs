use std::future::Future;

use super::ProviderAccessToken;
use crate::error::AuthError;
use crate::models::ProviderProfile;

/// Stage 2: resolve an access token to the provider's profile of its owner.
///
/// Transport failures and non-2xx answers are [`AuthError::UpstreamAuth`]; a payload
/// missing any required field is [`AuthError::MalformedProfile`]. No partial profiles.
pub trait IdentityFetcher: Send + Sync {
    fn fetch_profile(
        &self,
        token: &ProviderAccessToken,
    ) -> impl Future<Output = Result<ProviderProfile, AuthError>> + Send;
}
