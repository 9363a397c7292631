//! Service configuration: an optional TOML file plus environment overrides.

use crate::api::oauth::{OAuthProviderConfig, DEFAULT_AUTH_URL, DEFAULT_SCOPES, DEFAULT_TOKEN_URL};
use crate::onlyfans::DEFAULT_API_BASE_URL;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Path of the optional TOML config file.
pub const CONFIG_PATH_VAR: &str = "CRM_CONFIG";

/// Callback route the provider redirects back to.
pub const OAUTH_CALLBACK_PATH: &str = "/api/auth/onlyfans/callback";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration: {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Complete service configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub onlyfans: OnlyFansConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Externally visible origin, prefixed to redirects. Empty = relative redirects.
    #[serde(default)]
    pub public_url: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            public_url: String::new(),
        }
    }
}

/// OnlyFans API and OAuth settings
#[derive(Debug, Clone, Deserialize)]
pub struct OnlyFansConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Minimum spacing between outbound API calls (milliseconds)
    #[serde(default = "default_rate_limit_delay_ms")]
    pub rate_limit_delay_ms: u64,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    /// Overrides `{public_url}/api/auth/onlyfans/callback`
    #[serde(default)]
    pub redirect_uri: Option<String>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_rate_limit_delay_ms() -> u64 {
    1000
}

fn default_auth_url() -> String {
    DEFAULT_AUTH_URL.to_string()
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_scopes() -> Vec<String> {
    DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect()
}

impl Default for OnlyFansConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_key: None,
            rate_limit_delay_ms: default_rate_limit_delay_ms(),
            client_id: None,
            client_secret: None,
            auth_url: default_auth_url(),
            token_url: default_token_url(),
            scopes: default_scopes(),
            redirect_uri: None,
        }
    }
}

impl OnlyFansConfig {
    pub fn rate_limit_delay(&self) -> Duration {
        Duration::from_millis(self.rate_limit_delay_ms)
    }

    /// OAuth provider settings. Fails when client credentials are absent.
    pub fn oauth_provider(&self) -> Result<OAuthProviderConfig, ConfigError> {
        let client_id = self
            .client_id
            .clone()
            .ok_or(ConfigError::Missing("ONLYFANS_CLIENT_ID"))?;
        let client_secret = self
            .client_secret
            .clone()
            .ok_or(ConfigError::Missing("ONLYFANS_CLIENT_SECRET"))?;

        Ok(OAuthProviderConfig {
            auth_url: self.auth_url.clone(),
            token_url: self.token_url.clone(),
            scopes: self.scopes.clone(),
            client_id,
            client_secret,
        })
    }
}

/// Backend-as-a-service data store
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

impl StoreConfig {
    /// `(url, key)`, both required.
    pub fn require(&self) -> Result<(&str, &str), ConfigError> {
        let url = self.url.as_deref().ok_or(ConfigError::Missing("SUPABASE_URL"))?;
        let key = self.key.as_deref().ok_or(ConfigError::Missing("SUPABASE_KEY"))?;
        Ok((url, key))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AiConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    /// Force the mock AI path even when a key is configured
    #[serde(default)]
    pub use_mock: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_template_ttl_seconds")]
    pub template_ttl_seconds: u64,
}

fn default_template_ttl_seconds() -> u64 {
    3600
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            template_ttl_seconds: default_template_ttl_seconds(),
        }
    }
}

impl CacheConfig {
    pub fn template_ttl(&self) -> Duration {
        Duration::from_secs(self.template_ttl_seconds)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityConfig {
    /// Base64-encoded 32-byte key for sealing OAuth tokens
    #[serde(default)]
    pub encryption_key: Option<String>,
}

impl AppConfig {
    /// Load `CRM_CONFIG` (if set) and apply process environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) if !path.is_empty() => load_config(&path)?,
            _ => AppConfig::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Apply overrides from `lookup`. Empty values count as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("CRM_BIND_ADDR") {
            self.server.bind_addr = v;
        }
        if let Some(v) = get("CRM_PUBLIC_URL") {
            self.server.public_url = v.trim_end_matches('/').to_string();
        }

        if let Some(v) = get("ONLYFANS_API_URL") {
            self.onlyfans.api_base_url = v;
        }
        if let Some(v) = get("ONLYFANS_API_KEY") {
            self.onlyfans.api_key = Some(v);
        }
        if let Some(v) = get("ONLYFANS_CLIENT_ID") {
            self.onlyfans.client_id = Some(v);
        }
        if let Some(v) = get("ONLYFANS_CLIENT_SECRET") {
            self.onlyfans.client_secret = Some(v);
        }
        if let Some(v) = get("ONLYFANS_AUTH_URL") {
            self.onlyfans.auth_url = v;
        }
        if let Some(v) = get("ONLYFANS_TOKEN_URL") {
            self.onlyfans.token_url = v;
        }
        if let Some(v) = get("ONLYFANS_REDIRECT_URI") {
            self.onlyfans.redirect_uri = Some(v);
        }
        if let Some(v) = get("ONLYFANS_RATE_LIMIT_MS") {
            self.onlyfans.rate_limit_delay_ms =
                v.parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                    var: "ONLYFANS_RATE_LIMIT_MS",
                    reason: e.to_string(),
                })?;
        }

        if let Some(v) = get("SUPABASE_URL") {
            self.store.url = Some(v);
        }
        if let Some(v) = get("SUPABASE_KEY") {
            self.store.key = Some(v);
        }

        if let Some(v) = get("OPENAI_API_KEY") {
            self.ai.api_key = Some(v);
        }
        if let Some(v) = get("USE_MOCK_AI") {
            self.ai.use_mock = parse_bool("USE_MOCK_AI", &v)?;
        }

        if let Some(v) = get("TEMPLATE_CACHE_TTL_SECS") {
            self.cache.template_ttl_seconds =
                v.parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                    var: "TEMPLATE_CACHE_TTL_SECS",
                    reason: e.to_string(),
                })?;
        }

        if let Some(v) = get("ENCRYPTION_KEY") {
            self.security.encryption_key = Some(v);
        }

        Ok(())
    }

    /// Redirect URI registered with the OAuth provider.
    pub fn oauth_redirect_uri(&self) -> String {
        self.onlyfans
            .redirect_uri
            .clone()
            .unwrap_or_else(|| format!("{}{}", self.server.public_url, OAUTH_CALLBACK_PATH))
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::Invalid {
            var,
            reason: format!("expected a boolean, got '{}'", other),
        }),
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&contents)?;
    Ok(config)
}
