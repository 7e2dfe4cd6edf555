//! # Contract Readers
//!
//! Read-only capabilities over the external contracts a snapshot depends on.
//! Every method returns a [`CallOutcome`]; implementations must never panic or
//! propagate errors.
//!
//! A *binding set* ([`CurveContracts`], [`AaveV1Contracts`]) hands out readers
//! bound to an address and pinned to the block of the triggering event. The
//! ethers-backed binding set lives in [`ethers_reader`]; tests provide their
//! own scripted implementation.

pub mod ethers_reader;

pub use ethers_reader::EthersContracts;

use async_trait::async_trait;
use ethers::types::{Address, U256};

use crate::call_outcome::CallOutcome;
use crate::dispatcher::PoolFamily;

/// ERC-20 `decimals()`, used to scale pool balances.
#[async_trait]
pub trait Erc20Reader: Send + Sync {
    async fn decimals(&self) -> CallOutcome<u8>;
}

/// Uniform read surface over the Curve pool shapes.
#[async_trait]
pub trait CurvePoolReader: Send + Sync {
    /// The concrete shape this reader addresses.
    fn family(&self) -> PoolFamily;
    async fn balance_of(&self, coin_index: u32) -> CallOutcome<U256>;
    async fn token_at(&self, coin_index: u32) -> CallOutcome<Address>;
    async fn virtual_price(&self) -> CallOutcome<U256>;
}

#[async_trait]
pub trait GaugeControllerReader: Send + Sync {
    async fn gauge_weight(&self, gauge: Address) -> CallOutcome<U256>;
    async fn total_weight(&self) -> CallOutcome<U256>;
}

#[async_trait]
pub trait ATokenReader: Send + Sync {
    async fn symbol(&self) -> CallOutcome<String>;
    async fn decimals(&self) -> CallOutcome<u8>;
    async fn underlying_asset_address(&self) -> CallOutcome<Address>;
}

/// Aave V1 `LendingPoolAddressesProvider`, the registry of pool components.
#[async_trait]
pub trait AddressesProviderReader: Send + Sync {
    async fn lending_pool_data_provider(&self) -> CallOutcome<Address>;
}

#[async_trait]
pub trait LendingPoolDataProviderReader: Send + Sync {
    async fn reserve_configuration(&self, reserve: Address) -> CallOutcome<ReserveConfiguration>;
    async fn reserve_data(&self, reserve: Address) -> CallOutcome<ReserveData>;
}

/// Raw result of `getReserveConfigurationData(address)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReserveConfiguration {
    pub ltv: U256,
    pub liquidation_threshold: U256,
    pub liquidation_bonus: U256,
    pub interest_rate_strategy_address: Address,
    pub usage_as_collateral_enabled: bool,
    pub borrowing_enabled: bool,
    pub stable_borrow_rate_enabled: bool,
    pub is_active: bool,
}

/// Raw result of `getReserveData(address)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReserveData {
    pub total_liquidity: U256,
    pub available_liquidity: U256,
    pub total_borrows_stable: U256,
    pub total_borrows_variable: U256,
    pub liquidity_rate: U256,
    pub variable_borrow_rate: U256,
    pub stable_borrow_rate: U256,
    pub average_stable_borrow_rate: U256,
    pub utilization_rate: U256,
    pub liquidity_index: U256,
    pub variable_borrow_index: U256,
    pub a_token_address: Address,
    pub last_update_timestamp: u64,
}

/// Contract bindings used by the Curve assembler.
pub trait CurveContracts: Send + Sync {
    fn pool(&self, family: PoolFamily, address: Address, block: u64) -> Box<dyn CurvePoolReader>;
    fn erc20(&self, address: Address, block: u64) -> Box<dyn Erc20Reader>;
    fn gauge_controller(&self, address: Address, block: u64) -> Box<dyn GaugeControllerReader>;
}

/// Contract bindings used by the Aave V1 assembler.
pub trait AaveV1Contracts: Send + Sync {
    fn a_token(&self, address: Address, block: u64) -> Box<dyn ATokenReader>;
    fn addresses_provider(&self, address: Address, block: u64) -> Box<dyn AddressesProviderReader>;
    fn data_provider(&self, address: Address, block: u64)
        -> Box<dyn LendingPoolDataProviderReader>;
}
