use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const FINANCIAL_API_KEY_ENV: &str = "FINDASH_FINANCIAL_API_KEY";
pub const ALPHAVANTAGE_API_KEY_ENV: &str = "FINDASH_ALPHAVANTAGE_API_KEY";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct FinancialProviderConfig {
    /// Base for path-addressed endpoints (balance sheet)
    pub base_url: String,
    /// Base for query-addressed endpoints (income statement, cash flow)
    pub stable_base_url: String,
    pub api_key: String,
}

impl Default for FinancialProviderConfig {
    fn default() -> Self {
        FinancialProviderConfig {
            base_url: "https://financialmodelingprep.com/api/v3".to_string(),
            stable_base_url: "https://financialmodelingprep.com/stable".to_string(),
            api_key: default_api_key(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct AlphaVantageProviderConfig {
    pub base_url: String,
    pub api_key: String,
}

impl Default for AlphaVantageProviderConfig {
    fn default() -> Self {
        AlphaVantageProviderConfig {
            base_url: "https://www.alphavantage.co/query".to_string(),
            api_key: default_api_key(),
        }
    }
}

fn default_api_key() -> String {
    "demo".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub financial: FinancialProviderConfig,
    #[serde(default)]
    pub alphavantage: AlphaVantageProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Upper bound on a buffered upstream body; statement payloads can be several MiB
    pub max_body_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            user_agent: concat!("findash/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            max_body_bytes: 16 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

impl AppConfig {
    /// Loads the default config file, falling back to built-in defaults when
    /// none has been created yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default().with_env_overrides());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "findash", "findash")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config.with_env_overrides())
    }

    /// API keys from the environment take precedence over the file.
    pub fn with_env_overrides(self) -> Self {
        self.with_api_keys(
            std::env::var(FINANCIAL_API_KEY_ENV).ok(),
            std::env::var(ALPHAVANTAGE_API_KEY_ENV).ok(),
        )
    }

    fn with_api_keys(mut self, financial: Option<String>, alphavantage: Option<String>) -> Self {
        if let Some(key) = financial.filter(|k| !k.trim().is_empty()) {
            self.providers.financial.api_key = key;
        }
        if let Some(key) = alphavantage.filter(|k| !k.trim().is_empty()) {
            self.providers.alphavantage.api_key = key;
        }
        self
    }
}
