//! Multi-network deployment configuration.
//!
//! Typed configuration for talking to Soroban networks and the deployed
//! OpenCourse contracts. Values are resolved in priority order:
//!
//! 1. Environment variables (SOROBAN_* for the network, OPENCOURSE_* for
//!    contract ids)
//! 2. The matching profile in opencourse.toml
//! 3. Built-in network defaults
//!
//! # Examples
//!
//! ```rust,no_run
//! use opencourse_tools::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! println!("Network: {}", config.network);
//! println!("RPC URL: {}", config.rpc_url);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid network: {0}. Must be: testnet, mainnet, or sandbox")]
    InvalidNetwork(String),

    #[error("Missing SOROBAN_NETWORK environment variable and opencourse.toml not found")]
    MissingNetworkConfig,

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Soroban supported networks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Stellar Testnet - for testing before mainnet
    Testnet,
    /// Stellar Mainnet - production
    Mainnet,
    /// Local Soroban Sandbox - for local development
    Sandbox,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
            Network::Sandbox => "sandbox",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "testnet" => Ok(Network::Testnet),
            "mainnet" => Ok(Network::Mainnet),
            "sandbox" => Ok(Network::Sandbox),
            other => Err(ConfigError::InvalidNetwork(other.to_string())),
        }
    }

    /// Default RPC URL for this network
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Network::Testnet => "https://soroban-testnet.stellar.org",
            Network::Mainnet => "https://mainnet.sorobanrpc.com",
            Network::Sandbox => "http://localhost:8000",
        }
    }

    /// Network passphrase for transaction signing
    pub fn passphrase(&self) -> &'static str {
        match self {
            Network::Testnet => "Test SDF Network ; September 2015",
            Network::Mainnet => "Public Global Stellar Network ; September 2015",
            Network::Sandbox => "Standalone Network ; February 2017",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Deployed contract addresses for one network.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractIds {
    #[serde(default)]
    pub registry: Option<String>,
    #[serde(default)]
    pub enrollment: Option<String>,
    #[serde(default)]
    pub payment: Option<String>,
}

/// One network profile from opencourse.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkProfile {
    pub rpc_url: String,
    pub network_passphrase: String,
    #[serde(default)]
    pub contracts: ContractIds,
    #[serde(default)]
    pub description: Option<String>,
}

/// opencourse.toml file layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpencourseToml {
    #[serde(default)]
    pub default: Option<DefaultProfile>,
    #[serde(default)]
    pub profile: std::collections::HashMap<String, NetworkProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultProfile {
    pub network: Option<String>,
}

/// Resolved runtime configuration with all required fields
#[derive(Debug, Clone)]
pub struct Config {
    /// Active network
    pub network: Network,
    /// RPC endpoint URL
    pub rpc_url: String,
    /// Network passphrase for signing
    pub network_passphrase: String,
    /// Deployer account address (optional)
    pub account: Option<String>,
    /// Deployed contract ids, if any
    pub contracts: ContractIds,
    /// RPC timeout in milliseconds
    pub rpc_timeout_ms: u64,
    /// Debug mode
    pub debug: bool,
}

impl Config {
    /// Load configuration from the environment and `opencourse.toml` in the
    /// current directory.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (non-fatal)
        let _ = dotenvy::dotenv();
        Self::load_from(Path::new("opencourse.toml"))
    }

    /// Same as [`Config::load`], against an explicit TOML path.
    ///
    /// # Resolution Order
    ///
    /// 1. SOROBAN_NETWORK, else the TOML default profile, else testnet
    /// 2. SOROBAN_RPC_URL / SOROBAN_NETWORK_PASSPHRASE env overrides
    /// 3. The TOML profile matching the active network
    /// 4. Built-in network defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        // A missing file falls back to env vars and built-in defaults; a
        // file that exists but does not parse is an error.
        let toml_config = match Self::load_toml(path) {
            Ok(toml_config) => Some(toml_config),
            Err(ConfigError::MissingNetworkConfig) => None,
            Err(e) => return Err(e),
        };

        let network_name = std::env::var("SOROBAN_NETWORK")
            .ok()
            .or_else(|| {
                toml_config
                    .as_ref()
                    .and_then(|t| t.default.as_ref())
                    .and_then(|d| d.network.clone())
            })
            .unwrap_or_else(|| "testnet".to_string());

        let network = Network::from_str(&network_name)?;
        let profile = toml_config
            .as_ref()
            .and_then(|t| t.profile.get(network.as_str()));

        let rpc_url = std::env::var("SOROBAN_RPC_URL")
            .ok()
            .or_else(|| profile.map(|p| p.rpc_url.clone()))
            .unwrap_or_else(|| network.default_rpc_url().to_string());

        let network_passphrase = std::env::var("SOROBAN_NETWORK_PASSPHRASE")
            .ok()
            .or_else(|| profile.map(|p| p.network_passphrase.clone()))
            .unwrap_or_else(|| network.passphrase().to_string());

        let toml_contracts = profile.map(|p| p.contracts.clone()).unwrap_or_default();
        let contracts = ContractIds {
            registry: std::env::var("OPENCOURSE_REGISTRY_ID")
                .ok()
                .or(toml_contracts.registry),
            enrollment: std::env::var("OPENCOURSE_ENROLLMENT_ID")
                .ok()
                .or(toml_contracts.enrollment),
            payment: std::env::var("OPENCOURSE_PAYMENT_ID")
                .ok()
                .or(toml_contracts.payment),
        };

        let account = std::env::var("SOROBAN_ACCOUNT").ok();
        let rpc_timeout_ms = std::env::var("SOROBAN_RPC_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30000);
        let debug = std::env::var("SOROBAN_DEBUG")
            .ok()
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self::validate(&rpc_url, &network_passphrase)?;

        Ok(Config {
            network,
            rpc_url,
            network_passphrase,
            account,
            contracts,
            rpc_timeout_ms,
            debug,
        })
    }

    fn load_toml(path: &Path) -> Result<OpencourseToml, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingNetworkConfig);
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(ConfigError::TomlError)
    }

    fn validate(rpc_url: &str, passphrase: &str) -> Result<(), ConfigError> {
        if rpc_url.is_empty() {
            return Err(ConfigError::MissingField("rpc_url".to_string()));
        }

        if passphrase.is_empty() {
            return Err(ConfigError::MissingField("network_passphrase".to_string()));
        }

        if !rpc_url.starts_with("http://") && !rpc_url.starts_with("https://") {
            return Err(ConfigError::ValidationError(format!(
                "RPC URL must start with http:// or https://: {}",
                rpc_url
            )));
        }

        Ok(())
    }

    /// Print the resolved configuration
    pub fn print_summary(&self) {
        println!("OpenCourse network configuration");
        println!("  Network:             {}", self.network);
        println!("  RPC URL:             {}", self.rpc_url);
        println!("  Network Passphrase:  {}", self.network_passphrase);
        println!(
            "  Account:             {}",
            self.account.as_deref().unwrap_or("(not configured)")
        );
        println!(
            "  Course Registry:     {}",
            self.contracts.registry.as_deref().unwrap_or("(not deployed)")
        );
        println!(
            "  Enrollment:          {}",
            self.contracts.enrollment.as_deref().unwrap_or("(not deployed)")
        );
        println!(
            "  Payment:             {}",
            self.contracts.payment.as_deref().unwrap_or("(not deployed)")
        );
        println!("  RPC Timeout:         {}ms", self.rpc_timeout_ms);
        if self.debug {
            println!("  Debug Mode:          ENABLED");
        }
    }

    /// Get configuration as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for Config {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(7))?;
        map.serialize_entry("network", &self.network.to_string())?;
        map.serialize_entry("rpc_url", &self.rpc_url)?;
        map.serialize_entry("network_passphrase", &self.network_passphrase)?;
        map.serialize_entry("account", &self.account)?;
        map.serialize_entry("contracts", &self.contracts)?;
        map.serialize_entry("rpc_timeout_ms", &self.rpc_timeout_ms)?;
        map.serialize_entry("debug", &self.debug)?;
        map.end()
    }
}
