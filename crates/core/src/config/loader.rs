use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for environment overrides, e.g. `MEDIACONV_AUDIO__BITRATE_KBPS=256`.
pub const ENV_PREFIX: &str = "MEDIACONV_";

fn env() -> Env {
    // Keys contain underscores, so nesting uses a double underscore.
    Env::prefixed(ENV_PREFIX).split("__")
}

fn extract(figment: Figment) -> Result<Config, ConfigError> {
    figment
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    extract(
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(env()),
    )
}

/// Load built-in defaults with environment variable overrides
pub fn load_config_from_env() -> Result<Config, ConfigError> {
    extract(Figment::from(Serialized::defaults(Config::default())).merge(env()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
