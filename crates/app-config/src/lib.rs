//! Configuration and logging for the ColdConnect client core.

mod config;
mod error;
mod logging;

pub use config::{
    Config, DEFAULT_API_BASE_URL, DEFAULT_APP_ORIGIN, DEFAULT_LOG_LEVEL,
    DEFAULT_SUPABASE_PUBLISHABLE_KEY, DEFAULT_SUPABASE_URL,
};
pub use error::{ConfigError, ConfigResult};
pub use logging::{init_logging, parse_level};
