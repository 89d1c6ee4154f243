use serde::Deserialize;

/// Secrets and lifetimes for the token service.
///
/// Deserialized from the `auth` section of the service configuration, e.g.
/// `AUTH__ACCESS_SECRET` / `AUTH__REFRESH_SECRET` in the environment.
#[derive(Clone, Deserialize)]
pub struct TokenConfig {
    pub access_secret: String,
    pub refresh_secret: String,

    #[serde(default = "default_access_token_ttl_secs")]
    pub access_token_ttl_secs: i64,

    #[serde(default = "default_refresh_token_ttl_secs")]
    pub refresh_token_ttl_secs: i64,
}

fn default_access_token_ttl_secs() -> i64 {
    2 * 60 * 60
}

fn default_refresh_token_ttl_secs() -> i64 {
    7 * 24 * 60 * 60
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("access_secret", &"<redacted>")
            .field("refresh_secret", &"<redacted>")
            .field("access_token_ttl_secs", &self.access_token_ttl_secs)
            .field("refresh_token_ttl_secs", &self.refresh_token_ttl_secs)
            .finish()
    }
}
