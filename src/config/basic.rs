use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Basic (core) configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BasicConfig {
    /// Log level for tracing subscriber initialization (e.g., "error", "warn", "info", "debug", "trace").
    /// TOML: `basic.loglevel`. Default: `info`.
    #[serde(default = "default_loglevel")]
    pub loglevel: String,

    /// JSON document holding `accessToken`, `refreshToken` and `userData`.
    /// TOML: `basic.session_file`. Unset keeps credentials in memory only.
    #[serde(default)]
    pub session_file: Option<PathBuf>,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            loglevel: default_loglevel(),
            session_file: None,
        }
    }
}

fn default_loglevel() -> String {
    "info".to_string()
}
