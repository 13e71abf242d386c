//! Shared configuration used across the mentor crates.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the Gemini API key. Read directly, never from config files.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Version reported by `GET /`.
pub const API_VERSION: &str = "1.0";

/// Global application configuration (gateway + model). Load from TOML or env.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Company name shown in the root banner and the model prompt.
    pub app_name: String,
    /// Bind address for the gateway.
    pub host: String,
    /// HTTP port for the gateway.
    pub port: u16,
    /// LLM mode: "live" (Gemini), "mock" or "off".
    pub llm_mode: String,
    /// Gemini model id, e.g. `gemini-2.5-flash`.
    pub gemini_model: String,
    /// Gemini API root; requests go to `{base}/v1beta/models/{model}:generateContent`.
    pub gemini_base_url: String,
    /// Upper bound for a single model call.
    pub model_timeout_secs: u64,
    /// Knowledge base JSON on disk. When unset the bundled document is used.
    #[serde(default)]
    pub knowledge_base_path: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            app_name: "CompanyName".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            llm_mode: "live".to_string(),
            gemini_model: "gemini-2.5-flash".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            model_timeout_secs: 30,
            knowledge_base_path: None,
        }
    }
}

impl CoreConfig {
    pub fn model_timeout(&self) -> Duration {
        Duration::from_secs(self.model_timeout_secs.max(1))
    }

    /// `host:port` string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Load config from file and environment. Precedence: `MENTOR__*` env > `$MENTOR_CONFIG` file
    /// (default `config/gateway.toml`) > defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("MENTOR_CONFIG").unwrap_or_else(|_| "config/gateway.toml".to_string());
        Self::load_from(Path::new(&config_path))
    }

    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        let builder = config::Config::builder()
            .set_default("app_name", defaults.app_name)?
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("llm_mode", defaults.llm_mode)?
            .set_default("gemini_model", defaults.gemini_model)?
            .set_default("gemini_base_url", defaults.gemini_base_url)?
            .set_default("model_timeout_secs", defaults.model_timeout_secs as i64)?;

        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        let built = builder
            .add_source(
                config::Environment::with_prefix("MENTOR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        built.try_deserialize()
    }
}

/// Reads the model credential from the environment. Blank values count as missing.
pub fn gemini_api_key() -> Option<String> {
    std::env::var(GEMINI_API_KEY_ENV)
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
}
