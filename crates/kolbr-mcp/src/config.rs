//! Configuration management for the KOLBR MCP server

use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
}

/// KOLBR API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Root of the KOLBR API (recent trades, analyze, health)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Timeout for trade fetches and wallet lookups, in seconds
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_seconds: u64,
    /// Timeout for analysis requests, in seconds
    #[serde(default = "default_analyze_timeout")]
    pub analyze_timeout_seconds: u64,
    /// How many trades a "latest trade" query asks for
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
    /// How many recent trades a wallet lookup scans
    #[serde(default = "default_wallet_scan_limit")]
    pub wallet_scan_limit: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            fetch_timeout_seconds: default_fetch_timeout(),
            analyze_timeout_seconds: default_analyze_timeout(),
            recent_limit: default_recent_limit(),
            wallet_scan_limit: default_wallet_scan_limit(),
        }
    }
}

/// Production KOLBR API; override with `KOLBR__API__BASE_URL`
pub const DEFAULT_BASE_URL: &str = "https://kolbr-entry.up.railway.app";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_fetch_timeout() -> u64 {
    10
}

fn default_analyze_timeout() -> u64 {
    30
}

fn default_recent_limit() -> usize {
    5
}

fn default_wallet_scan_limit() -> usize {
    50
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            // Start with defaults
            .set_default("api.base_url", default_base_url())?
            .set_default("api.fetch_timeout_seconds", default_fetch_timeout() as i64)?
            .set_default("api.analyze_timeout_seconds", default_analyze_timeout() as i64)?
            .set_default("api.recent_limit", default_recent_limit() as i64)?
            .set_default("api.wallet_scan_limit", default_wallet_scan_limit() as i64)?
            // Load from file if present
            .add_source(config::File::with_name("kolbr-mcp").required(false))
            // Override with environment variables (KOLBR__API__BASE_URL, etc.)
            .add_source(
                config::Environment::with_prefix("KOLBR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
