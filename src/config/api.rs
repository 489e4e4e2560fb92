use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

static DEFAULT_BASE_URL: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("http://localhost:3000").expect("invalid fixed default API base URL")
});

/// Remote API configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL every request path is resolved against.
    /// TOML: `api.base_url`. Env: `PATHWAYS_API_URL`. Default: `http://localhost:3000`.
    #[serde(default = "default_base_url")]
    pub base_url: Url,

    /// Whole-request timeout in milliseconds.
    /// TOML: `api.timeout_ms`. Default: `20000`.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// TCP connect timeout in milliseconds.
    /// TOML: `api.connect_timeout_ms`. Default: `5000`.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Optional HTTP proxy used for all requests.
    /// TOML: `api.proxy`. Example: `http://127.0.0.1:1080`.
    #[serde(default)]
    pub proxy: Option<Url>,

    /// TOML: `api.user_agent`.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ApiConfig {
    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            base_url,
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            proxy: None,
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> Url {
    DEFAULT_BASE_URL.clone()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_user_agent() -> String {
    concat!("pathways/", env!("CARGO_PKG_VERSION")).to_string()
}
