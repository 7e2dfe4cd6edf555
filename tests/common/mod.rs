//! Scripted chain double shared by the integration tests.
//!
//! Every read answers from a table keyed by `(contract, call)`; a missing
//! entry behaves like a revert. All reads are recorded so tests can assert
//! which calls were (or were not) issued and at which block.

#![allow(dead_code)]

use async_trait::async_trait;
use defi_snapshot_sdk::call_outcome::CallOutcome;
use defi_snapshot_sdk::dispatcher::PoolFamily;
use defi_snapshot_sdk::events::EventContext;
use defi_snapshot_sdk::readers::{
    AaveV1Contracts, ATokenReader, AddressesProviderReader, CurveContracts, CurvePoolReader,
    Erc20Reader, GaugeControllerReader, LendingPoolDataProviderReader, ReserveConfiguration,
    ReserveData,
};
use ethers::types::{Address, H256, U256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
enum Answer {
    Address(Address),
    Uint(U256),
    Decimals(u8),
    Text(String),
    Configuration(ReserveConfiguration),
    Data(ReserveData),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub address: Address,
    pub call: String,
    pub block: u64,
}

#[derive(Default)]
struct Script {
    answers: HashMap<(Address, String), Answer>,
    calls: Vec<RecordedCall>,
    bound_pools: Vec<(Address, PoolFamily)>,
}

#[derive(Clone, Default)]
pub struct ScriptedChain {
    script: Arc<Mutex<Script>>,
}

impl ScriptedChain {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&self, address: Address, call: String, answer: Answer) {
        self.script
            .lock()
            .unwrap()
            .answers
            .insert((address, call), answer);
    }

    /// Make a previously scripted call revert from now on.
    pub fn revert(&self, address: Address, call: &str) {
        self.script
            .lock()
            .unwrap()
            .answers
            .remove(&(address, call.to_string()));
    }

    fn answer(&self, address: Address, call: String, block: u64) -> Option<Answer> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(RecordedCall {
            address,
            call: call.clone(),
            block,
        });
        script.answers.get(&(address, call)).cloned()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.script.lock().unwrap().calls.clone()
    }

    pub fn calls_to(&self, address: Address) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.address == address)
            .map(|c| c.call)
            .collect()
    }

    pub fn was_called(&self, address: Address, call: &str) -> bool {
        self.calls_to(address).iter().any(|c| c == call)
    }

    pub fn bound_pools(&self) -> Vec<(Address, PoolFamily)> {
        self.script.lock().unwrap().bound_pools.clone()
    }

    // Curve pool

    pub fn set_coin(&self, pool: Address, index: u32, token: Address) {
        self.set(pool, format!("coins({})", index), Answer::Address(token));
    }

    pub fn set_balance(&self, pool: Address, index: u32, balance: U256) {
        self.set(pool, format!("balances({})", index), Answer::Uint(balance));
    }

    pub fn set_virtual_price(&self, pool: Address, price: U256) {
        self.set(pool, "get_virtual_price()".to_string(), Answer::Uint(price));
    }

    // ERC-20 / aToken metadata

    pub fn set_decimals(&self, token: Address, decimals: u8) {
        self.set(token, "decimals()".to_string(), Answer::Decimals(decimals));
    }

    pub fn set_symbol(&self, token: Address, symbol: &str) {
        self.set(token, "symbol()".to_string(), Answer::Text(symbol.to_string()));
    }

    // Gauge controller

    pub fn set_gauge_weight(&self, controller: Address, gauge: Address, weight: U256) {
        self.set(controller, gauge_weight_call(gauge), Answer::Uint(weight));
    }

    pub fn set_total_weight(&self, controller: Address, weight: U256) {
        self.set(controller, "get_total_weight()".to_string(), Answer::Uint(weight));
    }

    // Aave V1

    pub fn set_underlying(&self, a_token: Address, reserve: Address) {
        self.set(
            a_token,
            "underlyingAssetAddress()".to_string(),
            Answer::Address(reserve),
        );
    }

    pub fn set_data_provider(&self, addresses_provider: Address, data_provider: Address) {
        self.set(
            addresses_provider,
            "getLendingPoolDataProvider()".to_string(),
            Answer::Address(data_provider),
        );
    }

    pub fn set_reserve_configuration(
        &self,
        data_provider: Address,
        reserve: Address,
        configuration: ReserveConfiguration,
    ) {
        self.set(
            data_provider,
            reserve_configuration_call(reserve),
            Answer::Configuration(configuration),
        );
    }

    pub fn set_reserve_data(&self, data_provider: Address, reserve: Address, data: ReserveData) {
        self.set(data_provider, reserve_data_call(reserve), Answer::Data(data));
    }
}

pub fn gauge_weight_call(gauge: Address) -> String {
    format!("get_gauge_weight({:?})", gauge)
}

pub fn reserve_configuration_call(reserve: Address) -> String {
    format!("getReserveConfigurationData({:?})", reserve)
}

pub fn reserve_data_call(reserve: Address) -> String {
    format!("getReserveData({:?})", reserve)
}

struct ScriptedReader {
    chain: ScriptedChain,
    address: Address,
    block: u64,
}

impl ScriptedReader {
    fn read<T>(&self, call: String, pick: impl FnOnce(Answer) -> Option<T>) -> CallOutcome<T> {
        self.chain
            .answer(self.address, call, self.block)
            .and_then(pick)
            .into()
    }

    fn uint(&self, call: String) -> CallOutcome<U256> {
        self.read(call, |a| match a {
            Answer::Uint(v) => Some(v),
            _ => None,
        })
    }

    fn address(&self, call: String) -> CallOutcome<Address> {
        self.read(call, |a| match a {
            Answer::Address(v) => Some(v),
            _ => None,
        })
    }

    fn read_symbol(&self) -> CallOutcome<String> {
        self.read("symbol()".to_string(), |a| match a {
            Answer::Text(v) => Some(v),
            _ => None,
        })
    }

    fn read_decimals(&self) -> CallOutcome<u8> {
        self.read("decimals()".to_string(), |a| match a {
            Answer::Decimals(v) => Some(v),
            _ => None,
        })
    }
}

struct ScriptedPool {
    reader: ScriptedReader,
    family: PoolFamily,
}

#[async_trait]
impl CurvePoolReader for ScriptedPool {
    fn family(&self) -> PoolFamily {
        self.family
    }

    async fn balance_of(&self, coin_index: u32) -> CallOutcome<U256> {
        self.reader.uint(format!("balances({})", coin_index))
    }

    async fn token_at(&self, coin_index: u32) -> CallOutcome<Address> {
        self.reader.address(format!("coins({})", coin_index))
    }

    async fn virtual_price(&self) -> CallOutcome<U256> {
        self.reader.uint("get_virtual_price()".to_string())
    }
}

#[async_trait]
impl Erc20Reader for ScriptedReader {
    async fn decimals(&self) -> CallOutcome<u8> {
        self.read_decimals()
    }
}

#[async_trait]
impl GaugeControllerReader for ScriptedReader {
    async fn gauge_weight(&self, gauge: Address) -> CallOutcome<U256> {
        self.uint(gauge_weight_call(gauge))
    }

    async fn total_weight(&self) -> CallOutcome<U256> {
        self.uint("get_total_weight()".to_string())
    }
}

#[async_trait]
impl ATokenReader for ScriptedReader {
    async fn symbol(&self) -> CallOutcome<String> {
        self.read_symbol()
    }

    async fn decimals(&self) -> CallOutcome<u8> {
        self.read_decimals()
    }

    async fn underlying_asset_address(&self) -> CallOutcome<Address> {
        self.address("underlyingAssetAddress()".to_string())
    }
}

#[async_trait]
impl AddressesProviderReader for ScriptedReader {
    async fn lending_pool_data_provider(&self) -> CallOutcome<Address> {
        self.address("getLendingPoolDataProvider()".to_string())
    }
}

#[async_trait]
impl LendingPoolDataProviderReader for ScriptedReader {
    async fn reserve_configuration(&self, reserve: Address) -> CallOutcome<ReserveConfiguration> {
        self.read(reserve_configuration_call(reserve), |a| match a {
            Answer::Configuration(v) => Some(v),
            _ => None,
        })
    }

    async fn reserve_data(&self, reserve: Address) -> CallOutcome<ReserveData> {
        self.read(reserve_data_call(reserve), |a| match a {
            Answer::Data(v) => Some(v),
            _ => None,
        })
    }
}

impl ScriptedChain {
    fn reader(&self, address: Address, block: u64) -> ScriptedReader {
        ScriptedReader {
            chain: self.clone(),
            address,
            block,
        }
    }
}

impl CurveContracts for ScriptedChain {
    fn pool(&self, family: PoolFamily, address: Address, block: u64) -> Box<dyn CurvePoolReader> {
        self.script
            .lock()
            .unwrap()
            .bound_pools
            .push((address, family));
        Box::new(ScriptedPool {
            reader: self.reader(address, block),
            family,
        })
    }

    fn erc20(&self, address: Address, block: u64) -> Box<dyn Erc20Reader> {
        Box::new(self.reader(address, block))
    }

    fn gauge_controller(&self, address: Address, block: u64) -> Box<dyn GaugeControllerReader> {
        Box::new(self.reader(address, block))
    }
}

impl AaveV1Contracts for ScriptedChain {
    fn a_token(&self, address: Address, block: u64) -> Box<dyn ATokenReader> {
        Box::new(self.reader(address, block))
    }

    fn addresses_provider(&self, address: Address, block: u64) -> Box<dyn AddressesProviderReader> {
        Box::new(self.reader(address, block))
    }

    fn data_provider(
        &self,
        address: Address,
        block: u64,
    ) -> Box<dyn LendingPoolDataProviderReader> {
        Box::new(self.reader(address, block))
    }
}

pub fn addr(n: u64) -> Address {
    Address::from_low_u64_be(n)
}

pub fn context(tx: u64, block_number: u64, address: Address) -> EventContext {
    EventContext {
        transaction_hash: H256::from_low_u64_be(tx),
        block_number,
        block_timestamp: 1_600_000_000 + block_number,
        address,
    }
}

/// `value * 10^exp` as a raw uint256.
pub fn raw(value: u64, exp: usize) -> U256 {
    U256::from(value) * U256::exp10(exp)
}
