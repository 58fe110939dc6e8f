//! Client configuration.
//!
//! The client persists nothing locally, so there is no config file. Defaults
//! are baked in at compile time (the same build-time injection the hosted
//! bundle uses) and can be overridden per process with environment variables.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use url::Url;

/// Default Supabase URL (can be overridden at compile time via SUPABASE_URL env var).
pub const DEFAULT_SUPABASE_URL: &str = match option_env!("SUPABASE_URL") {
    Some(url) => url,
    None => "https://random.supabase.co",
};

/// Default Supabase publishable key (can be overridden at compile time via SUPABASE_PUBLISHABLE_KEY env var).
pub const DEFAULT_SUPABASE_PUBLISHABLE_KEY: &str = match option_env!("SUPABASE_PUBLISHABLE_KEY") {
    Some(key) => key,
    None => "random-key",
};

/// Default backend API base URL (can be overridden at compile time via API_BASE_URL env var).
pub const DEFAULT_API_BASE_URL: &str = match option_env!("API_BASE_URL") {
    Some(url) => url,
    None => "http://localhost:8000",
};

/// Default app origin, used as the redirect target in confirmation and
/// recovery emails (can be overridden at compile time via APP_ORIGIN env var).
pub const DEFAULT_APP_ORIGIN: &str = match option_env!("APP_ORIGIN") {
    Some(url) => url,
    None => "http://localhost:5173",
};

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Main client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Supabase project URL.
    #[serde(default = "default_supabase_url")]
    pub supabase_url: String,
    /// Supabase publishable API key (public, safe to expose).
    #[serde(default = "default_supabase_publishable_key")]
    pub supabase_publishable_key: String,
    /// Base URL of the ColdConnect backend API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// The app's own origin, where auth emails link back to.
    #[serde(default = "default_app_origin")]
    pub app_origin: String,
}

fn default_supabase_url() -> String {
    DEFAULT_SUPABASE_URL.to_string()
}

fn default_supabase_publishable_key() -> String {
    DEFAULT_SUPABASE_PUBLISHABLE_KEY.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_app_origin() -> String {
    DEFAULT_APP_ORIGIN.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            supabase_url: DEFAULT_SUPABASE_URL.to_string(),
            supabase_publishable_key: DEFAULT_SUPABASE_PUBLISHABLE_KEY.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            app_origin: DEFAULT_APP_ORIGIN.to_string(),
        }
    }
}

impl Config {
    /// Create a new Config with default values, then override from environment.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.load_from_env();
        config
    }

    /// Override configuration from environment variables.
    fn load_from_env(&mut self) {
        if let Ok(log_level) = std::env::var("COLDCONNECT_LOG_LEVEL") {
            self.log_level = log_level;
        }
        if let Ok(url) = std::env::var("COLDCONNECT_SUPABASE_URL") {
            self.supabase_url = url;
        }
        if let Ok(key) = std::env::var("COLDCONNECT_SUPABASE_PUBLISHABLE_KEY") {
            self.supabase_publishable_key = key;
        }
        if let Ok(url) = std::env::var("COLDCONNECT_API_BASE_URL") {
            self.api_base_url = url;
        }
        if let Ok(origin) = std::env::var("COLDCONNECT_APP_ORIGIN") {
            self.app_origin = origin;
        }
    }

    /// Get the Supabase URL as a parsed URL.
    pub fn supabase_url(&self) -> ConfigResult<Url> {
        Url::parse(&self.supabase_url).map_err(ConfigError::from)
    }

    /// Get the backend API base URL as a parsed URL.
    pub fn api_base_url(&self) -> ConfigResult<Url> {
        Url::parse(&self.api_base_url).map_err(ConfigError::from)
    }
}
