//! # Inbound Events
//!
//! Typed notifications consumed by the assemblers, plus decoding from raw
//! `ethers` logs. Every event carries an [`EventContext`] identifying the
//! triggering transaction, its block and the emitting contract.

use ethers::contract::{parse_log, EthEvent};
use ethers::types::{Address, Log, H256, U256};

use crate::contracts::{
    BurnOnLiquidationFilter, MintOnDepositFilter, NewGaugeWeightFilter, VoteForGaugeFilter,
};
use crate::types::conversions::tx_hash_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventContext {
    pub transaction_hash: H256,
    pub block_number: u64,
    pub block_timestamp: u64,
    /// Contract that emitted the event
    pub address: Address,
}

impl EventContext {
    /// Build the context of a mined log. Pending logs (no hash or block) yield `None`.
    pub fn from_log(log: &Log, block_timestamp: u64) -> Option<Self> {
        Some(Self {
            transaction_hash: log.transaction_hash?,
            block_number: log.block_number?.as_u64(),
            block_timestamp,
            address: log.address,
        })
    }

    /// Store key: hex-encoded transaction hash.
    pub fn key(&self) -> String {
        tx_hash_key(self.transaction_hash)
    }
}

/// Gauge controller weight observation.
///
/// `gauge_weight` / `total_weight` equal to zero mean "not supplied" and make
/// the assembler read the value from the controller instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaugeWeightEvent {
    pub context: EventContext,
    pub gauge: Option<Address>,
    pub gauge_weight: U256,
    pub total_weight: U256,
}

impl GaugeWeightEvent {
    pub fn from_new_gauge_weight(context: EventContext, event: NewGaugeWeightFilter) -> Self {
        Self {
            context,
            gauge: Some(event.gauge_address),
            gauge_weight: event.weight,
            total_weight: event.total_weight,
        }
    }

    // The vote weight is the user's allocation, not the gauge weight.
    pub fn from_vote_for_gauge(context: EventContext, event: VoteForGaugeFilter) -> Self {
        Self {
            context,
            gauge: Some(event.gauge_addr),
            gauge_weight: U256::zero(),
            total_weight: U256::zero(),
        }
    }
}

/// Any activity on a Curve pool. `n_coins` and `pool_type` come from the
/// data-source configuration, not from the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolEvent {
    pub context: EventContext,
    pub n_coins: u32,
    pub pool_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ATokenEventKind {
    MintOnDeposit,
    BurnOnLiquidation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ATokenEvent {
    pub context: EventContext,
    pub kind: ATokenEventKind,
    pub account: Address,
    pub value: U256,
}

impl ATokenEvent {
    pub fn from_mint_on_deposit(context: EventContext, event: MintOnDepositFilter) -> Self {
        Self {
            context,
            kind: ATokenEventKind::MintOnDeposit,
            account: event.from,
            value: event.value,
        }
    }

    pub fn from_burn_on_liquidation(context: EventContext, event: BurnOnLiquidationFilter) -> Self {
        Self {
            context,
            kind: ATokenEventKind::BurnOnLiquidation,
            account: event.from,
            value: event.value,
        }
    }
}

fn topic0(log: &Log) -> Option<H256> {
    log.topics.first().copied()
}

/// Decode a gauge controller log into a weight observation.
pub fn decode_gauge_event(log: &Log, context: EventContext) -> Option<GaugeWeightEvent> {
    let signature = topic0(log)?;
    if signature == NewGaugeWeightFilter::signature() {
        let event = parse_log::<NewGaugeWeightFilter>(log.clone()).ok()?;
        Some(GaugeWeightEvent::from_new_gauge_weight(context, event))
    } else if signature == VoteForGaugeFilter::signature() {
        let event = parse_log::<VoteForGaugeFilter>(log.clone()).ok()?;
        Some(GaugeWeightEvent::from_vote_for_gauge(context, event))
    } else {
        None
    }
}

/// Decode an aToken log. Only deposit mints and liquidation burns trigger snapshots.
pub fn decode_a_token_event(log: &Log, context: EventContext) -> Option<ATokenEvent> {
    let signature = topic0(log)?;
    if signature == MintOnDepositFilter::signature() {
        let event = parse_log::<MintOnDepositFilter>(log.clone()).ok()?;
        Some(ATokenEvent::from_mint_on_deposit(context, event))
    } else if signature == BurnOnLiquidationFilter::signature() {
        let event = parse_log::<BurnOnLiquidationFilter>(log.clone()).ok()?;
        Some(ATokenEvent::from_burn_on_liquidation(context, event))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::abi::{encode, Token};
    use ethers::types::{Bytes, U64};

    fn mined_log(address: Address, topics: Vec<H256>, data: Vec<u8>) -> Log {
        Log {
            address,
            topics,
            data: Bytes::from(data),
            transaction_hash: Some(H256::from_low_u64_be(0xfeed)),
            block_number: Some(U64::from(100u64)),
            ..Default::default()
        }
    }

    #[test]
    fn test_context_from_pending_log_is_none() {
        let log = Log::default();
        assert!(EventContext::from_log(&log, 0).is_none());
    }

    #[test]
    fn test_decode_new_gauge_weight() {
        let controller = Address::from_low_u64_be(0xc0);
        let gauge = Address::from_low_u64_be(0x9a);
        let data = encode(&[
            Token::Address(gauge),
            Token::Uint(U256::from(1_600_000_000u64)),
            Token::Uint(U256::from(5u64)),
            Token::Uint(U256::from(50u64)),
        ]);
        let log = mined_log(controller, vec![NewGaugeWeightFilter::signature()], data);
        let ctx = EventContext::from_log(&log, 1_600_000_000).unwrap();
        assert_eq!(ctx.block_number, 100);
        assert_eq!(ctx.address, controller);

        let event = decode_gauge_event(&log, ctx).unwrap();
        assert_eq!(event.gauge, Some(gauge));
        assert_eq!(event.gauge_weight, U256::from(5u64));
        assert_eq!(event.total_weight, U256::from(50u64));
    }

    #[test]
    fn test_decode_vote_for_gauge_leaves_weights_unsupplied() {
        let controller = Address::from_low_u64_be(0xc0);
        let gauge = Address::from_low_u64_be(0x9b);
        let data = encode(&[
            Token::Uint(U256::from(1u64)),
            Token::Address(Address::from_low_u64_be(0x01)),
            Token::Address(gauge),
            Token::Uint(U256::from(10_000u64)),
        ]);
        let log = mined_log(controller, vec![VoteForGaugeFilter::signature()], data);
        let ctx = EventContext::from_log(&log, 0).unwrap();
        let event = decode_gauge_event(&log, ctx).unwrap();
        assert_eq!(event.gauge, Some(gauge));
        assert!(event.gauge_weight.is_zero() && event.total_weight.is_zero());
    }

    #[test]
    fn test_decode_mint_on_deposit() {
        let a_token = Address::from_low_u64_be(0xa7);
        let account = Address::from_low_u64_be(0x42);
        let data = encode(&[
            Token::Uint(U256::from(1_000u64)),
            Token::Uint(U256::zero()),
            Token::Uint(U256::zero()),
        ]);
        let log = mined_log(
            a_token,
            vec![MintOnDepositFilter::signature(), H256::from(account)],
            data,
        );
        let ctx = EventContext::from_log(&log, 0).unwrap();
        let event = decode_a_token_event(&log, ctx).unwrap();
        assert_eq!(event.kind, ATokenEventKind::MintOnDeposit);
        assert_eq!(event.account, account);
        assert_eq!(event.value, U256::from(1_000u64));
    }

    #[test]
    fn test_decode_unrelated_topic() {
        let log = mined_log(Address::zero(), vec![H256::from_low_u64_be(1)], vec![]);
        let ctx = EventContext::from_log(&log, 0).unwrap();
        assert!(decode_gauge_event(&log, ctx).is_none());
        assert!(decode_a_token_event(&log, ctx).is_none());
    }
}
