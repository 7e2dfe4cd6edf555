use bigdecimal::BigDecimal;
use ethers::types::{Address, H256, U256};
use num::Zero;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::ZERO_ADDRESS;

/// A point-in-time record keyed by the hash of the transaction that triggered it.
pub trait Snapshot: Serialize + DeserializeOwned + Send + Sync {
    /// Fresh record with every field at its documented default.
    fn new(id: String) -> Self;
    fn id(&self) -> &str;
    fn block_number(&self) -> u64;
    fn block_timestamp(&self) -> u64;
}

/// Aave V1 aToken with its reserve configuration and runtime data.
///
/// Reserve descriptor fields are `None` whenever the read chain that feeds them
/// did not complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AaveV1TokenSnapshot {
    pub id: String,
    pub transaction_hash: H256,
    pub block_number: u64,
    pub block_timestamp: u64,
    pub address: Address,
    pub symbol: Option<String>,
    pub decimals: Option<u8>,

    // getReserveConfigurationData
    pub ltv: Option<BigDecimal>,
    pub liquidation_threshold: Option<BigDecimal>,
    pub liquidation_bonus: Option<BigDecimal>,
    pub interest_rate_strategy_address: Option<Address>,
    pub usage_as_collateral_enabled: Option<bool>,
    pub borrowing_enabled: Option<bool>,
    pub stable_borrow_rate_enabled: Option<bool>,
    pub is_active: Option<bool>,

    // getReserveData
    pub total_liquidity: Option<BigDecimal>,
    pub available_liquidity: Option<BigDecimal>,
    pub total_borrows_stable: Option<BigDecimal>,
    pub total_borrows_variable: Option<BigDecimal>,
    pub liquidity_rate: Option<BigDecimal>,
    pub variable_borrow_rate: Option<BigDecimal>,
    pub stable_borrow_rate: Option<BigDecimal>,
    pub average_stable_borrow_rate: Option<BigDecimal>,
    pub utilization_rate: Option<BigDecimal>,
    pub liquidity_index: Option<U256>,
    pub variable_borrow_index: Option<U256>,
    pub a_token_address: Option<Address>,
    pub last_update_timestamp: Option<u64>,
}

impl AaveV1TokenSnapshot {
    pub fn clear_reserve_configuration(&mut self) {
        self.ltv = None;
        self.liquidation_threshold = None;
        self.liquidation_bonus = None;
        self.interest_rate_strategy_address = None;
        self.usage_as_collateral_enabled = None;
        self.borrowing_enabled = None;
        self.stable_borrow_rate_enabled = None;
        self.is_active = None;
    }

    pub fn clear_reserve_data(&mut self) {
        self.total_liquidity = None;
        self.available_liquidity = None;
        self.total_borrows_stable = None;
        self.total_borrows_variable = None;
        self.liquidity_rate = None;
        self.variable_borrow_rate = None;
        self.stable_borrow_rate = None;
        self.average_stable_borrow_rate = None;
        self.utilization_rate = None;
        self.liquidity_index = None;
        self.variable_borrow_index = None;
        self.a_token_address = None;
        self.last_update_timestamp = None;
    }
}

impl Snapshot for AaveV1TokenSnapshot {
    fn new(id: String) -> Self {
        Self {
            id,
            transaction_hash: H256::zero(),
            block_number: 0,
            block_timestamp: 0,
            address: ZERO_ADDRESS,
            symbol: None,
            decimals: None,
            ltv: None,
            liquidation_threshold: None,
            liquidation_bonus: None,
            interest_rate_strategy_address: None,
            usage_as_collateral_enabled: None,
            borrowing_enabled: None,
            stable_borrow_rate_enabled: None,
            is_active: None,
            total_liquidity: None,
            available_liquidity: None,
            total_borrows_stable: None,
            total_borrows_variable: None,
            liquidity_rate: None,
            variable_borrow_rate: None,
            stable_borrow_rate: None,
            average_stable_borrow_rate: None,
            utilization_rate: None,
            liquidity_index: None,
            variable_borrow_index: None,
            a_token_address: None,
            last_update_timestamp: None,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn block_number(&self) -> u64 {
        self.block_number
    }

    fn block_timestamp(&self) -> u64 {
        self.block_timestamp
    }
}

/// Curve pool balances. `tokens[i]` and `balances[i]` describe coin `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePoolSnapshot {
    pub id: String,
    pub block_number: u64,
    pub block_timestamp: u64,
    pub vault: Address,
    pub tokens: Vec<Address>,
    pub balances: Vec<BigDecimal>,
    pub virtual_price: BigDecimal,
}

impl Snapshot for CurvePoolSnapshot {
    fn new(id: String) -> Self {
        Self {
            id,
            block_number: 0,
            block_timestamp: 0,
            vault: ZERO_ADDRESS,
            tokens: Vec::new(),
            balances: Vec::new(),
            virtual_price: BigDecimal::zero(),
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn block_number(&self) -> u64 {
        self.block_number
    }

    fn block_timestamp(&self) -> u64 {
        self.block_timestamp
    }
}

/// Curve gauge controller weights for one liquidity gauge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveGaugeSnapshot {
    pub id: String,
    pub block_number: u64,
    pub block_timestamp: u64,
    pub gauge_controller: Address,
    pub liquidity_gauge: Address,
    pub gauge_weight: BigDecimal,
    pub total_weight: BigDecimal,
}

impl Snapshot for CurveGaugeSnapshot {
    fn new(id: String) -> Self {
        Self {
            id,
            block_number: 0,
            block_timestamp: 0,
            gauge_controller: ZERO_ADDRESS,
            liquidity_gauge: ZERO_ADDRESS,
            gauge_weight: BigDecimal::zero(),
            total_weight: BigDecimal::zero(),
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn block_number(&self) -> u64 {
        self.block_number
    }

    fn block_timestamp(&self) -> u64 {
        self.block_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_new_snapshots_hold_defaults() {
        let pool = CurvePoolSnapshot::new("0x01".to_string());
        assert!(pool.tokens.is_empty() && pool.balances.is_empty());
        assert!(pool.virtual_price.is_zero());
        assert_eq!(pool.vault, ZERO_ADDRESS);

        let token = AaveV1TokenSnapshot::new("0x02".to_string());
        assert_eq!(token.id(), "0x02");
        assert!(token.ltv.is_none() && token.total_liquidity.is_none());
    }

    #[test]
    fn test_snapshot_json_keeps_decimal_precision() {
        let mut gauge = CurveGaugeSnapshot::new("0x03".to_string());
        gauge.gauge_weight = BigDecimal::from_str("0.123456789012345678").unwrap();
        let json = serde_json::to_value(&gauge).unwrap();
        let back: CurveGaugeSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, gauge);
    }
}
