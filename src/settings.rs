use config::{Config, ConfigError, File};
use ethers::types::Address;
use log::warn;
use serde::Deserialize;
use std::env;
use std::str::FromStr;

use crate::dispatcher::PoolFamily;

const DEFAULT_CONFIG_PATH: &str = "Config.toml";

/// Largest `n_coins` accepted for a configured pool.
pub const MAX_N_COINS: u32 = 8;

// Aave V1 LendingPoolAddressesProvider on Ethereum mainnet
const AAVE_V1_ADDRESSES_PROVIDER: &str = "0x24a42fD28C976A61Df5D00D0599C34c4f90748c8";

#[derive(Debug, Deserialize, Clone)]
pub struct Rpc {
    pub http_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Indexer {
    #[serde(default)]
    pub from_block: u64,
    /// Defaults to the chain head at startup
    #[serde(default)]
    pub to_block: Option<u64>,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u64,
}

fn default_chunk_size() -> u64 {
    2_000
}

impl Default for Indexer {
    fn default() -> Self {
        Self {
            from_block: 0,
            to_block: None,
            chunk_size: default_chunk_size(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Store {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Falls back to `DATABASE_URL` when unset
    #[serde(default)]
    pub database_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AaveV1 {
    #[serde(default = "default_aave_v1_addresses_provider")]
    pub addresses_provider: Address,
    /// aTokens whose `MintOnDeposit` / `BurnOnLiquidation` events are indexed
    #[serde(default)]
    pub tokens: Vec<Address>,
}

fn default_aave_v1_addresses_provider() -> Address {
    Address::from_str(AAVE_V1_ADDRESSES_PROVIDER).unwrap_or_else(|_| Address::zero())
}

impl Default for AaveV1 {
    fn default() -> Self {
        Self {
            addresses_provider: default_aave_v1_addresses_provider(),
            tokens: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CurvePoolSource {
    pub address: Address,
    pub n_coins: u32,
    /// `Curve2Pool`, `Curve3Pool` or `Curve4Pool`
    pub pool_type: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Curve {
    #[serde(default)]
    pub gauge_controller: Option<Address>,
    #[serde(default)]
    pub pools: Vec<CurvePoolSource>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub rpc: Rpc,
    #[serde(default)]
    pub indexer: Indexer,
    #[serde(default)]
    pub store: Store,
    #[serde(default)]
    pub aave_v1: AaveV1,
    #[serde(default)]
    pub curve: Curve,
    #[serde(default)]
    pub curve_v1: Curve,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_path(DEFAULT_CONFIG_PATH)
    }

    pub fn from_path(path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name(path))
            .build()?;

        let mut settings: Self = s.try_deserialize()?;
        settings.apply_env_overrides()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (section, curve) in [("curve", &self.curve), ("curve_v1", &self.curve_v1)] {
            for pool in &curve.pools {
                if pool.n_coins > MAX_N_COINS {
                    return Err(ConfigError::Message(format!(
                        "{}.pools: n_coins {} for {:?} exceeds {}",
                        section, pool.n_coins, pool.address, MAX_N_COINS
                    )));
                }
                // Unknown pool types are reported when the pool is first snapshotted
                if let Ok(family) = PoolFamily::from_str(&pool.pool_type) {
                    if family.n_coins() != pool.n_coins {
                        warn!(
                            "{}.pools: {:?} is a {} but configured with n_coins = {}",
                            section, pool.address, family, pool.n_coins
                        );
                    }
                }
            }
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = env::var("SDK_RPC_HTTP_URL") {
            let trimmed = url.trim();
            if !trimmed.is_empty() {
                self.rpc.http_url = trimmed.to_string();
            }
        }

        if let Ok(raw) = env::var("SDK_AAVE_V1_ADDRESSES_PROVIDER") {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                self.aave_v1.addresses_provider = Address::from_str(trimmed).map_err(|e| {
                    ConfigError::Message(format!(
                        "SDK_AAVE_V1_ADDRESSES_PROVIDER is not an address: {}",
                        e
                    ))
                })?;
            }
        }

        if self.store.database_url.is_none() {
            if let Ok(url) = env::var("DATABASE_URL") {
                if !url.trim().is_empty() {
                    self.store.database_url = Some(url);
                }
            }
        }

        Ok(())
    }
}
