/// Canonical GitHub profile of the principal who signed in.
///
/// `provider_id` is the stable numeric GitHub id and the only key used to find the local
/// user. The other fields may change between sign-ins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    pub provider_id: i64,
    pub login: String,
    pub avatar_url: String,
    pub display_name: String,
}
