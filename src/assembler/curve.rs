use anyhow::Result;
use bigdecimal::BigDecimal;
use ethers::types::{Address, U256};
use log::{debug, error, info};
use num::Zero;
use std::sync::Arc;

use crate::call_outcome::CallOutcome;
use crate::dispatcher;
use crate::events::{GaugeWeightEvent, PoolEvent};
use crate::metrics;
use crate::normalization::{rescale_u256, WAD_SCALE};
use crate::readers::{CurveContracts, CurvePoolReader};
use crate::store::{self, SnapshotStore};
use crate::types::{CurveGaugeSnapshot, CurvePoolSnapshot, ZERO_ADDRESS};

/// Curve deployments whose contracts share one ABI set but are indexed
/// under distinct entity names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveNamespace {
    Curve,
    CurveV1,
}

impl CurveNamespace {
    pub fn pool_entity(&self) -> &'static str {
        match self {
            CurveNamespace::Curve => "CurvePoolData",
            CurveNamespace::CurveV1 => "CurveV1PoolData",
        }
    }

    pub fn gauge_entity(&self) -> &'static str {
        match self {
            CurveNamespace::Curve => "CurveGaugeData",
            CurveNamespace::CurveV1 => "CurveV1GaugeData",
        }
    }
}

/// An event-supplied weight of zero counts as "not supplied".
///
/// A genuine on-chain zero is indistinguishable here and takes the read path.
pub fn supplied(value: U256) -> Option<U256> {
    if value.is_zero() {
        None
    } else {
        Some(value)
    }
}

/// Assembles pool and gauge snapshots for one Curve deployment.
pub struct CurveSnapshotter<C, S: ?Sized> {
    namespace: CurveNamespace,
    contracts: C,
    store: Arc<S>,
}

impl<C, S> CurveSnapshotter<C, S>
where
    C: CurveContracts,
    S: SnapshotStore + ?Sized,
{
    pub fn new(namespace: CurveNamespace, contracts: C, store: Arc<S>) -> Self {
        Self {
            namespace,
            contracts,
            store,
        }
    }

    /// `NewGaugeWeight` / `VoteForGauge` on the gauge controller.
    pub async fn handle_gauge(&self, event: &GaugeWeightEvent) -> Result<CurveGaugeSnapshot> {
        let ctx = &event.context;
        let entity = self.namespace.gauge_entity();
        let mut snapshot: CurveGaugeSnapshot =
            store::load_or_create(self.store.as_ref(), entity, &ctx.key()).await?;

        debug!("Saving Gauge Controller at {:?}", ctx.address);

        snapshot.block_number = ctx.block_number;
        snapshot.block_timestamp = ctx.block_timestamp;
        snapshot.gauge_controller = ctx.address;

        let gauge = event.gauge.unwrap_or(ZERO_ADDRESS);
        snapshot.liquidity_gauge = gauge;

        let controller = self
            .contracts
            .gauge_controller(ctx.address, ctx.block_number);

        snapshot.gauge_weight = match supplied(event.gauge_weight) {
            Some(weight) => rescale_u256(weight, WAD_SCALE),
            None => match controller
                .gauge_weight(gauge)
                .await
                .on_revert(ctx.address, "get_gauge_weight(address)")
            {
                CallOutcome::Success(weight) => rescale_u256(weight, WAD_SCALE),
                CallOutcome::Reverted => BigDecimal::zero(),
            },
        };

        snapshot.total_weight = match supplied(event.total_weight) {
            Some(weight) => rescale_u256(weight, WAD_SCALE),
            None => match controller
                .total_weight()
                .await
                .on_revert(ctx.address, "get_total_weight()")
            {
                CallOutcome::Success(weight) => rescale_u256(weight, WAD_SCALE),
                CallOutcome::Reverted => BigDecimal::zero(),
            },
        };

        store::persist(self.store.as_ref(), entity, &snapshot).await?;
        info!(
            "Saved {} for gauge {:?} at controller {:?}",
            entity, gauge, ctx.address
        );
        Ok(snapshot)
    }

    /// Any event emitted by a configured pool.
    pub async fn handle_pool(&self, event: &PoolEvent) -> Result<CurvePoolSnapshot> {
        let ctx = &event.context;
        let entity = self.namespace.pool_entity();
        let mut snapshot: CurvePoolSnapshot =
            store::load_or_create(self.store.as_ref(), entity, &ctx.key()).await?;

        debug!("Saving {} at {:?}", event.pool_type, ctx.address);

        snapshot.block_number = ctx.block_number;
        snapshot.block_timestamp = ctx.block_timestamp;
        snapshot.vault = ctx.address;

        let pool = match dispatcher::bind_pool(
            &self.contracts,
            &event.pool_type,
            ctx.address,
            ctx.block_number,
        ) {
            Ok(pool) => Some(pool),
            Err(e) => {
                error!("{} (pool {:?})", e, ctx.address);
                metrics::increment_unknown_variant();
                None
            }
        };

        let mut tokens = Vec::new();
        let mut balances = Vec::new();
        for coin_index in 0..event.n_coins {
            let (token, balance) = match &pool {
                Some(pool) => {
                    self.read_coin(pool.as_ref(), ctx.address, coin_index, ctx.block_number)
                        .await
                }
                None => (ZERO_ADDRESS, BigDecimal::zero()),
            };
            tokens.push(token);
            balances.push(balance);
        }
        snapshot.tokens = tokens;
        snapshot.balances = balances;

        snapshot.virtual_price = match &pool {
            Some(pool) => match pool
                .virtual_price()
                .await
                .on_revert(ctx.address, "get_virtual_price()")
            {
                CallOutcome::Success(price) => rescale_u256(price, WAD_SCALE),
                CallOutcome::Reverted => BigDecimal::zero(),
            },
            None => BigDecimal::zero(),
        };

        store::persist(self.store.as_ref(), entity, &snapshot).await?;
        info!(
            "Saved {} {} at {:?} ({} coins)",
            entity, event.pool_type, ctx.address, event.n_coins
        );
        Ok(snapshot)
    }

    /// Address and scaled balance of coin `coin_index`.
    ///
    /// The balance needs both the balance and the coin read; it is scaled by the
    /// coin's decimals, or stored unscaled when `decimals()` reverts.
    async fn read_coin(
        &self,
        pool: &dyn CurvePoolReader,
        vault: Address,
        coin_index: u32,
        block: u64,
    ) -> (Address, BigDecimal) {
        let family = pool.family();
        let token = pool
            .token_at(coin_index)
            .await
            .on_revert(vault, family.coins_call());
        let raw_balance = pool
            .balance_of(coin_index)
            .await
            .on_revert(vault, family.balances_call());

        let balance = match (&token, raw_balance) {
            (CallOutcome::Success(coin), CallOutcome::Success(raw)) => {
                match self
                    .contracts
                    .erc20(*coin, block)
                    .decimals()
                    .await
                    .on_revert(*coin, "decimals()")
                {
                    CallOutcome::Success(decimals) => rescale_u256(raw, u32::from(decimals)),
                    CallOutcome::Reverted => rescale_u256(raw, 0),
                }
            }
            _ => BigDecimal::zero(),
        };

        let token = match token {
            CallOutcome::Success(coin) => coin,
            CallOutcome::Reverted => ZERO_ADDRESS,
        };
        (token, balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supplied_treats_zero_as_absent() {
        assert_eq!(supplied(U256::zero()), None);
        assert_eq!(supplied(U256::one()), Some(U256::one()));
    }

    #[test]
    fn test_namespaces_use_distinct_entities() {
        assert_eq!(CurveNamespace::Curve.pool_entity(), "CurvePoolData");
        assert_eq!(CurveNamespace::CurveV1.pool_entity(), "CurveV1PoolData");
        assert_ne!(
            CurveNamespace::Curve.gauge_entity(),
            CurveNamespace::CurveV1.gauge_entity()
        );
    }
}
