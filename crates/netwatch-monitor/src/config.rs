//! Configuration for the netwatch monitor.
//!
//! Loaded from `netwatch.toml` plus `NETWATCH__`-prefixed environment
//! variables. The `setup` subcommand writes the same file back, so every
//! struct here is serializable in both directions.

use netwatch_store::StoreConfig;
use serde::{Deserialize, Serialize};

/// Top-level monitor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Path to the nmap binary (default: "nmap").
    #[serde(default = "default_nmap_path")]
    pub nmap_path: String,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub scan: ScanConfig,
}

/// Inventory database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL, e.g. `sqlite://netwatch.db`.
    #[serde(default = "default_db_url")]
    pub url: String,
}

/// Helper API process settings.
///
/// The helper is an opaque external service; the monitor only launches it
/// with these parameters and terminates it on shutdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Command to launch the helper process.
    #[serde(default = "default_api_command")]
    pub command: String,

    /// HTTP bind host passed to the helper.
    #[serde(default = "default_api_host")]
    pub host: String,

    /// HTTP bind port passed to the helper.
    #[serde(default = "default_api_port")]
    pub port: u16,

    /// Debug flag passed to the helper.
    #[serde(default)]
    pub debug: bool,
}

/// Default scan parameters, overridable per run from the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Target network: CIDR, single address, or nmap range expression.
    #[serde(default = "default_network")]
    pub network: String,

    /// Port list in nmap syntax, e.g. "22,80,443" or "1-1024".
    #[serde(default = "default_ports")]
    pub ports: String,

    /// Fixed sleep between scan cycles, in seconds.
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Wall-clock limit for one nmap run, in seconds.
    #[serde(default = "default_scan_timeout")]
    pub timeout_secs: u64,
}

impl MonitorConfig {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            url: self.database.url.clone(),
        }
    }
}

fn default_nmap_path() -> String {
    "nmap".to_string()
}

fn default_db_url() -> String {
    "sqlite://netwatch.db".to_string()
}

fn default_api_command() -> String {
    "netwatch-api".to_string()
}

fn default_api_host() -> String {
    "127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
    5000
}

fn default_network() -> String {
    "192.168.1.0/24".to_string()
}

fn default_ports() -> String {
    "1-1024".to_string()
}

fn default_interval() -> u64 {
    300
}

fn default_scan_timeout() -> u64 {
    1200
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            nmap_path: default_nmap_path(),
            database: DatabaseConfig::default(),
            api: ApiConfig::default(),
            scan: ScanConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_db_url(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            command: default_api_command(),
            host: default_api_host(),
            port: default_api_port(),
            debug: false,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            ports: default_ports(),
            interval_secs: default_interval(),
            timeout_secs: default_scan_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.nmap_path, "nmap");
        assert_eq!(config.database.url, "sqlite://netwatch.db");
        assert_eq!(config.api.port, 5000);
        assert!(!config.api.debug);
        assert_eq!(config.scan.interval_secs, 300);
        assert_eq!(config.scan.timeout_secs, 1200);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = MonitorConfig::default();
        let rendered = toml::to_string_pretty(&config).unwrap();
        let parsed: MonitorConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.scan.network, config.scan.network);
        assert_eq!(parsed.database.url, config.database.url);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let parsed: MonitorConfig = toml::from_str(
            r#"
            [scan]
            network = "10.0.0.0/16"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.scan.network, "10.0.0.0/16");
        assert_eq!(parsed.scan.ports, "1-1024");
        assert_eq!(parsed.nmap_path, "nmap");
    }
}
