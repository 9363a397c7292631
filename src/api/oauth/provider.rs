//! OnlyFans OAuth provider endpoints and authorization URL construction.

pub const DEFAULT_AUTH_URL: &str = "https://onlyfans.com/oauth/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://onlyfans.com/oauth/token";
pub const DEFAULT_SCOPES: &[&str] = &["profile", "fans", "transactions", "messages"];

/// OAuth provider configuration
#[derive(Clone, Debug)]
pub struct OAuthProviderConfig {
    /// OAuth authorization endpoint URL
    pub auth_url: String,

    /// OAuth token exchange endpoint URL
    pub token_url: String,

    /// Requested scopes
    pub scopes: Vec<String>,

    pub client_id: String,

    pub client_secret: String,
}

impl OAuthProviderConfig {
    /// Provider config with the default OnlyFans endpoints and scopes.
    pub fn onlyfans(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Build the authorization URL. `state` is round-tripped untouched by the provider.
    pub fn build_auth_url(&self, state: &str, redirect_uri: &str) -> String {
        let scopes = self.scopes.join(" ");
        format!(
            "{}?client_id={}&redirect_uri={}&scope={}&state={}&response_type=code",
            self.auth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(&scopes),
            urlencoding::encode(state)
        )
    }
}
