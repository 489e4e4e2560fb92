mod api;
mod basic;
mod retry;

pub use api::ApiConfig;
pub use basic::BasicConfig;
pub use retry::RetryConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Logging and local storage (see `basic` table in pathways.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Remote API settings (see `api` table in pathways.toml).
    #[serde(default)]
    pub api: ApiConfig,

    /// Transient-failure retry settings (see `retry` table in pathways.toml).
    #[serde(default)]
    pub retry: RetryConfig,
}

const DEFAULT_CONFIG_FILE: &str = "pathways.toml";

/// Shorthand variable for the API base URL, mirroring the web build's `*_API_URL`.
pub const API_URL_ENV: &str = "PATHWAYS_API_URL";

impl Config {
    /// Builds a Figment that merges defaults, an optional config TOML file and the environment.
    ///
    /// Precedence (lowest first): defaults, `pathways.toml`, `PATHWAYS_<TABLE>__<KEY>`,
    /// `PATHWAYS_API_URL`.
    pub fn figment() -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment = figment.merge(Toml::file(DEFAULT_CONFIG_FILE));
        }
        figment
            .merge(
                Env::prefixed("PATHWAYS_")
                    .ignore(&["API_URL", "EMAIL", "PASSWORD"])
                    .split("__"),
            )
            .merge(
                Env::raw()
                    .only(&[API_URL_ENV])
                    .map(|_| "api.base_url".into()),
            )
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }
}
