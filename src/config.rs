// ABOUTME: Startup configuration - credential, endpoint, and server identity.
// ABOUTME: Built once in main and passed explicitly into the client and server.

use crate::error::ConfigError;

/// Default Gemini REST endpoint.
pub const GEMINI_DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Name reported to MCP clients during `initialize`.
pub const DEFAULT_SERVER_NAME: &str = "gemini-mcp-server";

/// Process-wide configuration for the tool server.
#[derive(Clone)]
pub struct ServerConfig {
    pub api_key: String,
    pub base_url: String,
    pub server_name: String,
    pub server_version: String,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("server_name", &self.server_name)
            .field("server_version", &self.server_version)
            .finish()
    }
}

impl ServerConfig {
    /// Create a configuration with the given API key and default endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: GEMINI_DEFAULT_BASE_URL.to_string(),
            server_name: DEFAULT_SERVER_NAME.to_string(),
            server_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Build the configuration from environment variables.
    /// Checks GEMINI_API_KEY first, then falls back to GOOGLE_API_KEY.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_empty("GEMINI_API_KEY")
            .or_else(|| non_empty("GOOGLE_API_KEY"))
            .ok_or(ConfigError::MissingCredential)?;

        let mut config = Self::new(api_key);
        if let Some(url) = non_empty("GEMINI_BASE_URL") {
            config = config.with_base_url(url)?;
        }
        Ok(config)
    }

    /// Override the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "base URL must start with http:// or https://, got '{}'",
                url
            )));
        }
        self.base_url = url.trim_end_matches('/').to_string();
        Ok(self)
    }
}
