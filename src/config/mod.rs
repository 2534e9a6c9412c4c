//! Configuration for the reputation engine and its data providers

use crate::analysis::DEFAULT_DEFI_CONTRACTS;
use crate::utils::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Configuration file version
    pub version: String,

    /// General application settings
    #[serde(default)]
    pub app: AppConfig,

    /// Wallet-activity provider
    pub moralis: MoralisConfig,

    /// Chain-data provider (balances and transactions)
    pub covalent: CovalentConfig,

    /// Governance / airdrop participation provider
    #[serde(default)]
    pub participation: ParticipationConfig,

    /// Transaction classification tables
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// HTTP API settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Application-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log level (debug, info, warn, error)
    pub log_level: String,
}

/// Moralis deep-index API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoralisConfig {
    /// API key sent as `X-API-Key`
    #[serde(default)]
    pub api_key: String,

    /// Base URL of the deep-index API
    pub base_url: String,

    /// Chain label used when the chain id is not in the registry
    #[serde(default = "default_moralis_chain_label")]
    pub default_chain_label: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// Covalent API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CovalentConfig {
    /// API key sent as the `key` query parameter
    #[serde(default)]
    pub api_key: String,

    /// Base URL of the v1 API
    pub base_url: String,

    /// Quote currency for balances
    #[serde(default = "default_quote_currency")]
    pub quote_currency: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// Participation provider configuration.
///
/// Without a `subgraph_url` the synthetic placeholder provider is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipationConfig {
    /// GraphQL endpoint of an airdrop / governance subgraph
    #[serde(default)]
    pub subgraph_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Pin the synthetic governance vote count instead of drawing it
    #[serde(default)]
    pub governance_votes: Option<u64>,

    /// Seed for the synthetic governance draw
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Transaction analyzer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Known DeFi / DEX router addresses
    pub defi_contracts: Vec<String>,
}

/// HTTP API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the `serve` command binds to
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            app: AppConfig::default(),
            moralis: MoralisConfig::default(),
            covalent: CovalentConfig::default(),
            participation: ParticipationConfig::default(),
            analysis: AnalysisConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { log_level: "info".to_string() }
    }
}

impl Default for MoralisConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://deep-index.moralis.io/api/v2".to_string(),
            default_chain_label: default_moralis_chain_label(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for CovalentConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.covalenthq.com/v1".to_string(),
            quote_currency: default_quote_currency(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for ParticipationConfig {
    fn default() -> Self {
        Self {
            subgraph_url: None,
            timeout_seconds: default_timeout_seconds(),
            governance_votes: None,
            seed: None,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { defi_contracts: DEFAULT_DEFI_CONTRACTS.iter().map(|s| s.to_string()).collect() }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_addr: "127.0.0.1:8888".to_string() }
    }
}

// --------- Helper default functions for serde ---------
fn default_timeout_seconds() -> u64 {
    10
}
fn default_moralis_chain_label() -> String {
    "sepolia".to_string()
}
fn default_quote_currency() -> String {
    "USD".to_string()
}

impl MoralisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl CovalentConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl ParticipationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Config {
    /// Serialize default config to TOML string
    pub fn default_toml() -> String {
        // Plain structs of strings and integers always serialize.
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }

    /// Load configuration from a specific file path
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Error::ConfigError(format!("Failed to read config file {:?}: {}", path.as_ref(), e))
        })?;
        let mut cfg: Self = toml::from_str(&content)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config file: {}", e)))?;
        cfg.merge_env()?;
        Ok(cfg)
    }

    /// Save the configuration to a file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {}", e)))?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::ConfigError(format!("Failed to create directory {:?}: {}", parent, e))
                })?;
            }
        }
        std::fs::write(path, content).map_err(|e| {
            Error::ConfigError(format!("Failed to write config file {:?}: {}", path, e))
        })?;
        Ok(())
    }

    /// Validate the configuration for required fields and reasonable values
    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(Error::ConfigError(
                "Config version must be set (e.g., '0.1.0')".to_string(),
            ));
        }
        url::Url::parse(&self.moralis.base_url)
            .map_err(|e| Error::ConfigError(format!("moralis.base_url: {}", e)))?;
        url::Url::parse(&self.covalent.base_url)
            .map_err(|e| Error::ConfigError(format!("covalent.base_url: {}", e)))?;
        if let Some(subgraph) = &self.participation.subgraph_url {
            url::Url::parse(subgraph)
                .map_err(|e| Error::ConfigError(format!("participation.subgraph_url: {}", e)))?;
        }
        if self.moralis.timeout_seconds == 0
            || self.covalent.timeout_seconds == 0
            || self.participation.timeout_seconds == 0
        {
            return Err(Error::ConfigError("provider timeout_seconds must be > 0".to_string()));
        }
        if self.moralis.default_chain_label.trim().is_empty() {
            return Err(Error::ConfigError("moralis.default_chain_label must be set".to_string()));
        }
        for addr in &self.analysis.defi_contracts {
            if !is_hex_address(addr) {
                return Err(Error::ConfigError(format!(
                    "analysis.defi_contracts: {:?} is not a 0x-prefixed 20-byte address",
                    addr
                )));
            }
        }
        self.server
            .bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|e| Error::ConfigError(format!("server.bind_addr: {}", e)))?;
        Ok(())
    }

    /// Load configuration from default locations: `./proofbadge.toml`, then
    /// `<config dir>/proofbadge/config.toml`, else defaults plus environment.
    pub fn load() -> Result<Self> {
        let user_path = dirs::config_dir().map(|dir| dir.join("proofbadge").join("config.toml"));
        Self::load_from(std::path::Path::new("proofbadge.toml"), user_path.as_deref())
    }

    /// The first candidate that exists is read; its parse errors propagate.
    fn load_from(local: &std::path::Path, user: Option<&std::path::Path>) -> Result<Self> {
        if local.exists() {
            return Self::from_file(local);
        }

        if let Some(path) = user.filter(|p| p.exists()) {
            return Self::from_file(path);
        }

        let mut config = Self::default();
        config.merge_env()?;
        Ok(config)
    }

    /// Merge environment variables into the configuration
    pub fn merge_env(&mut self) -> Result<()> {
        if let Ok(key) = env::var("MORALIS_API_KEY") {
            self.moralis.api_key = key;
        }

        if let Ok(url) = env::var("MORALIS_BASE_URL") {
            self.moralis.base_url = url;
        }

        if let Ok(key) = env::var("COVALENT_API_KEY") {
            self.covalent.api_key = key;
        }

        if let Ok(url) = env::var("COVALENT_BASE_URL") {
            self.covalent.base_url = url;
        }

        if let Ok(url) = env::var("PARTICIPATION_SUBGRAPH_URL") {
            self.participation.subgraph_url = Some(url);
        }

        Ok(())
    }
}

fn is_hex_address(s: &str) -> bool {
    s.len() == 42
        && (s.starts_with("0x") || s.starts_with("0X"))
        && s[2..].chars().all(|c| c.is_ascii_hexdigit())
}
