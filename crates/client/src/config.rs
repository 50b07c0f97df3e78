use std::path::Path;

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Base URL used when nothing usable is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Path prefix that routes requests to the service's mock engine.
pub const MOCK_PREFIX: &str = "/mock";

/// Environment variable prefix: `REGEX_LITE_BASE_URL`, `REGEX_LITE_USE_MOCK`.
pub const ENV_PREFIX: &str = "REGEX_LITE";

/// Optional config file name (extension picked by the `config` crate).
pub const CONFIG_FILE_NAME: &str = "regex-lite";

/// Client configuration, passed explicitly into [`RegexClient`](crate::RegexClient).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Service root. Unset, empty and whitespace-only values fall back to
    /// [`DEFAULT_API_BASE`].
    #[serde(default)]
    pub base_url: Option<String>,

    /// Route match/replace/split through [`MOCK_PREFIX`].
    #[serde(default)]
    pub use_mock: bool,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            use_mock: false,
        }
    }

    pub fn with_mock(mut self, use_mock: bool) -> Self {
        self.use_mock = use_mock;
        self
    }

    /// Load from an optional `regex-lite.{toml,yaml,json,...}` in the working
    /// directory, overridden by `REGEX_LITE_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::assemble(
            config::Config::builder()
                .add_source(File::with_name(CONFIG_FILE_NAME).required(false))
                .add_source(env_source()),
        )
    }

    /// Load from one explicit file; the file must exist.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::assemble(config::Config::builder().add_source(File::from(path.as_ref())))
    }

    fn assemble(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: ClientConfig = builder.build()?.try_deserialize()?;
        tracing::debug!(
            base_url = %config.base_url(),
            use_mock = config.use_mock,
            "client configuration loaded"
        );
        Ok(config)
    }

    /// Resolved service root, never ending in `/`.
    pub fn base_url(&self) -> String {
        resolve_base_url(self.base_url.as_deref())
    }

    /// Full URL for a service route such as `/regex/match`, honouring mock mode.
    pub fn route(&self, path: &str) -> String {
        let prefix = if self.use_mock { MOCK_PREFIX } else { "" };
        format!("{}{prefix}{path}", self.base_url())
    }

    /// Full URL for a route that is never mock-prefixed, such as `/healthz`.
    pub fn unprefixed_route(&self, path: &str) -> String {
        format!("{}{path}", self.base_url())
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX).try_parsing(true)
}

/// Trims a configured base URL and strips one trailing slash; blank or unset
/// values resolve to [`DEFAULT_API_BASE`].
pub fn resolve_base_url(configured: Option<&str>) -> String {
    match configured.map(str::trim) {
        Some(base) if !base.is_empty() => base.strip_suffix('/').unwrap_or(base).to_string(),
        _ => DEFAULT_API_BASE.to_string(),
    }
}
