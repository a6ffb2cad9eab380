use std::path::PathBuf;

use bitcoin::Network;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::domain::status::DEFAULT_PAGE_SIZE;

/// Gas-station API used when neither `--api-url` nor `GAS_STATION_API_URL`
/// is given.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Get the data directory for the application.
pub fn get_data_dir() -> PathBuf {
    if let Ok(s) = std::env::var("TC_GAS_STATION_DATA") {
        PathBuf::from(s)
    } else if let Some(proj_dirs) = ProjectDirs::from("computer", "trustless", "tc-gas-station") {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub name: String,
    /// Network BTC receiving addresses must belong to.
    pub btc_network: Network,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub page_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub network: NetworkConfig,
    pub api: ApiConfig,
    pub history: HistoryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self::mainnet()
    }
}

impl Config {
    /// Create config from CLI args.
    pub fn new(network: &str, api_url: Option<&str>, page_size: Option<usize>) -> Self {
        let mut config = Self::from_network(network);
        if let Some(url) = api_url {
            config.api.base_url = url.to_string();
        }
        if let Some(size) = page_size {
            config.history.page_size = size.max(1);
        }
        config
    }

    pub fn mainnet() -> Self {
        Self::with_network("mainnet", Network::Bitcoin)
    }

    pub fn testnet() -> Self {
        Self::with_network("testnet", Network::Testnet)
    }

    pub fn regtest() -> Self {
        Self::with_network("regtest", Network::Regtest)
    }

    pub fn from_network(network: &str) -> Self {
        match network {
            "testnet" => Self::testnet(),
            "regtest" => Self::regtest(),
            _ => Self::mainnet(),
        }
    }

    fn with_network(name: &str, btc_network: Network) -> Self {
        Self {
            network: NetworkConfig {
                name: name.to_string(),
                btc_network,
            },
            api: ApiConfig {
                base_url: DEFAULT_API_URL.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
            history: HistoryConfig {
                page_size: DEFAULT_PAGE_SIZE,
            },
        }
    }
}
