use std::time::Duration;

use alloy::primitives::{address, Address};
use holders_engine::{
    fetcher::{FetchConfig, DEFAULT_CHUNK_SIZE},
    retry::RetryPolicy,
    timeseries::{HistoryConfig, BLOCKS_PER_DAY},
};
use serde::{Deserialize, Serialize};

use crate::disk_storage::DiskStorageInterface;

pub const DEFAULT_RPC_URL: &str = "https://mainnet.infura.io/v3/{}";

/// Placeholder in `rpc_url` that is replaced by the API key.
const KEY_PLACEHOLDER: &str = "{}";

/// MKR balances that are not held by users and are left out of the Gini.
pub const MKR_EXCLUDED: [Address; 5] = [
    // foundation multisig
    address!("0x7bb0b08587b8a6b8945e09f1baca426558b0f06a"),
    // redeemer
    address!("0x642ae78fafbb8032da552d619ad43f1d81e4dd7c"),
    // DSChief
    address!("0x8e2a84d6ade1e7fffee039a35ef5f19f13057152"),
    // MKR creation
    address!("0x731c6f8c754fa404cfcc2ed8035ef79262f65702"),
    // MKR_OLD creation
    address!("0xe02640be68df835aa3327ea6473c02c8f6c3815a"),
];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub rpc_url: String,
    pub api_key: Option<String>,
    pub chunk_size: u64,
    pub retries: usize,
    pub retry_delay_ms: u64,
    pub step: u64,
    pub excluded_addresses: Vec<Address>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            api_key: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            retries: RetryPolicy::default().retries,
            retry_delay_ms: 0,
            step: BLOCKS_PER_DAY,
            excluded_addresses: MKR_EXCLUDED.to_vec(),
        }
    }
}

impl DiskStorageInterface for Config {
    const FILE_NAME: &'static str = "config";
}

impl Config {
    /// The endpoint with the API key filled in. `api_key` overrides the stored key.
    pub fn resolve_rpc_url(&self, api_key: Option<&str>) -> crate::Result<String> {
        if !self.rpc_url.contains(KEY_PLACEHOLDER) {
            return Ok(self.rpc_url.clone());
        }

        let key = api_key
            .or(self.api_key.as_deref())
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| crate::Error::ApiKeyNotSet(self.rpc_url.clone()))?;
        Ok(self.rpc_url.replace(KEY_PLACEHOLDER, key))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            retries: self.retries,
            delay: Duration::from_millis(self.retry_delay_ms),
        }
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            chunk_size: self.chunk_size,
            retry: self.retry_policy(),
        }
    }

    pub fn history_config(&self) -> HistoryConfig {
        HistoryConfig {
            step: self.step,
            excluded: self.excluded_addresses.iter().copied().collect(),
            ..Default::default()
        }
    }

    pub fn set_api_key(api_key: String) -> crate::Result<()> {
        let mut config = Config::load()?;
        config.api_key = Some(api_key);
        config.save()
    }

    pub fn set_rpc_url(rpc_url: String) -> crate::Result<()> {
        let mut config = Config::load()?;
        config.rpc_url = rpc_url;
        config.save()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_resolve_rpc_url() {
        let config = Config::default();
        assert!(matches!(
            config.resolve_rpc_url(None),
            Err(crate::Error::ApiKeyNotSet(_))
        ));
        assert!(config.resolve_rpc_url(Some("  ")).is_err());
        assert_eq!(
            config.resolve_rpc_url(Some("abc")).unwrap(),
            "https://mainnet.infura.io/v3/abc"
        );

        let stored = Config {
            api_key: Some("stored".to_string()),
            ..Default::default()
        };
        assert_eq!(
            stored.resolve_rpc_url(None).unwrap(),
            "https://mainnet.infura.io/v3/stored"
        );
        assert_eq!(
            stored.resolve_rpc_url(Some("flag")).unwrap(),
            "https://mainnet.infura.io/v3/flag"
        );

        let local = Config {
            rpc_url: "http://localhost:8545".to_string(),
            ..Default::default()
        };
        assert_eq!(local.resolve_rpc_url(None).unwrap(), "http://localhost:8545");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("chunk_size = 1000\nretries = 5\n").unwrap();
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.fetch_config().retry.attempts(), 6);
        assert_eq!(config.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(config.excluded_addresses, MKR_EXCLUDED.to_vec());
        assert_eq!(config.history_config().excluded.len(), 5);
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("holders-config-{}", std::process::id()));
        let path = dir.join("nested").join("config.toml");

        let missing = Config::load_from(&path).unwrap();
        assert_eq!(missing, Config::default());

        let config = Config {
            api_key: Some("abc".to_string()),
            retry_delay_ms: 250,
            excluded_addresses: vec![],
            ..Default::default()
        };
        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.retry_policy().delay, Duration::from_millis(250));

        fs::write(&path, "chunk_size = \"lots\"").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(crate::Error::TomlParsingFailed(..))
        ));

        fs::remove_dir_all(dir).unwrap();
    }
}
