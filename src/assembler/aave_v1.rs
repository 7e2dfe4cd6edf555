use anyhow::Result;
use ethers::types::Address;
use log::{debug, info};
use std::sync::Arc;

use crate::call_outcome::CallOutcome;
use crate::events::{ATokenEvent, EventContext};
use crate::normalization::{rescale_u256, PERCENT_SCALE, RAY_SCALE};
use crate::readers::{AaveV1Contracts, ATokenReader, ReserveConfiguration, ReserveData};
use crate::store::{self, SnapshotStore};
use crate::types::AaveV1TokenSnapshot;

pub const AAVE_V1_TOKEN_ENTITY: &str = "AaveV1TokenData";

/// Assembles `AaveV1TokenData` snapshots for aToken activity.
///
/// Reserve fields come from a chain of reads: the aToken's underlying asset,
/// then the data provider registered in the `LendingPoolAddressesProvider`,
/// then two bulk reads on that data provider. A failed stage leaves every
/// field downstream of it absent; `symbol` and `decimals` do not depend on
/// the chain.
pub struct AaveV1Snapshotter<C, S: ?Sized> {
    contracts: C,
    store: Arc<S>,
    addresses_provider: Address,
}

impl<C, S> AaveV1Snapshotter<C, S>
where
    C: AaveV1Contracts,
    S: SnapshotStore + ?Sized,
{
    pub fn new(contracts: C, store: Arc<S>, addresses_provider: Address) -> Self {
        Self {
            contracts,
            store,
            addresses_provider,
        }
    }

    pub async fn handle_mint_on_deposit(&self, event: &ATokenEvent) -> Result<AaveV1TokenSnapshot> {
        debug!(
            "MintOnDeposit of {} for {:?} on {:?}",
            event.value, event.account, event.context.address
        );
        self.handle_a_token(&event.context).await
    }

    pub async fn handle_burn_on_liquidation(
        &self,
        event: &ATokenEvent,
    ) -> Result<AaveV1TokenSnapshot> {
        debug!(
            "BurnOnLiquidation of {} from {:?} on {:?}",
            event.value, event.account, event.context.address
        );
        self.handle_a_token(&event.context).await
    }

    pub async fn handle_a_token(&self, ctx: &EventContext) -> Result<AaveV1TokenSnapshot> {
        let mut snapshot: AaveV1TokenSnapshot =
            store::load_or_create(self.store.as_ref(), AAVE_V1_TOKEN_ENTITY, &ctx.key()).await?;

        snapshot.transaction_hash = ctx.transaction_hash;
        snapshot.block_number = ctx.block_number;
        snapshot.block_timestamp = ctx.block_timestamp;
        snapshot.address = ctx.address;

        let token = self.contracts.a_token(ctx.address, ctx.block_number);
        snapshot.symbol = token.symbol().await.on_revert(ctx.address, "symbol()").ok();
        snapshot.decimals = token
            .decimals()
            .await
            .on_revert(ctx.address, "decimals()")
            .ok();

        debug!(
            "Saving AaveV1 Token {} at address {:?} in block {} with txHash {:?}",
            snapshot.symbol.as_deref().unwrap_or("<unknown>"),
            ctx.address,
            ctx.block_number,
            ctx.transaction_hash
        );

        self.populate_reserve(&mut snapshot, token.as_ref(), ctx)
            .await;

        store::persist(self.store.as_ref(), AAVE_V1_TOKEN_ENTITY, &snapshot).await?;
        info!(
            "Saved {} {} at {:?}",
            AAVE_V1_TOKEN_ENTITY,
            snapshot.symbol.as_deref().unwrap_or("<unknown>"),
            ctx.address
        );
        Ok(snapshot)
    }

    async fn populate_reserve(
        &self,
        snapshot: &mut AaveV1TokenSnapshot,
        token: &dyn ATokenReader,
        ctx: &EventContext,
    ) {
        let reserve = match token
            .underlying_asset_address()
            .await
            .on_revert(ctx.address, "underlyingAssetAddress()")
        {
            CallOutcome::Success(reserve) => reserve,
            CallOutcome::Reverted => {
                snapshot.clear_reserve_configuration();
                snapshot.clear_reserve_data();
                return;
            }
        };

        let data_provider_address = match self
            .contracts
            .addresses_provider(self.addresses_provider, ctx.block_number)
            .lending_pool_data_provider()
            .await
            .on_revert(self.addresses_provider, "getLendingPoolDataProvider()")
        {
            CallOutcome::Success(address) => address,
            CallOutcome::Reverted => {
                snapshot.clear_reserve_configuration();
                snapshot.clear_reserve_data();
                return;
            }
        };

        let data_provider = self
            .contracts
            .data_provider(data_provider_address, ctx.block_number);

        match data_provider
            .reserve_configuration(reserve)
            .await
            .on_revert(data_provider_address, "getReserveConfigurationData(address)")
        {
            CallOutcome::Success(configuration) => apply_configuration(snapshot, &configuration),
            CallOutcome::Reverted => snapshot.clear_reserve_configuration(),
        }

        match data_provider
            .reserve_data(reserve)
            .await
            .on_revert(data_provider_address, "getReserveData(address)")
        {
            CallOutcome::Success(data) => apply_reserve_data(snapshot, &data),
            CallOutcome::Reverted => snapshot.clear_reserve_data(),
        }
    }
}

fn apply_configuration(snapshot: &mut AaveV1TokenSnapshot, configuration: &ReserveConfiguration) {
    snapshot.ltv = Some(rescale_u256(configuration.ltv, PERCENT_SCALE));
    snapshot.liquidation_threshold = Some(rescale_u256(
        configuration.liquidation_threshold,
        PERCENT_SCALE,
    ));
    snapshot.liquidation_bonus = Some(rescale_u256(configuration.liquidation_bonus, PERCENT_SCALE));
    snapshot.interest_rate_strategy_address = Some(configuration.interest_rate_strategy_address);
    snapshot.usage_as_collateral_enabled = Some(configuration.usage_as_collateral_enabled);
    snapshot.borrowing_enabled = Some(configuration.borrowing_enabled);
    snapshot.stable_borrow_rate_enabled = Some(configuration.stable_borrow_rate_enabled);
    snapshot.is_active = Some(configuration.is_active);
}

// Liquidity is denominated in the token; without its decimals it stays absent.
fn apply_reserve_data(snapshot: &mut AaveV1TokenSnapshot, data: &ReserveData) {
    let token_scale = snapshot.decimals.map(u32::from);
    snapshot.total_liquidity = token_scale.map(|scale| rescale_u256(data.total_liquidity, scale));
    snapshot.available_liquidity =
        token_scale.map(|scale| rescale_u256(data.available_liquidity, scale));
    snapshot.total_borrows_stable = Some(rescale_u256(data.total_borrows_stable, RAY_SCALE));
    snapshot.total_borrows_variable = Some(rescale_u256(data.total_borrows_variable, RAY_SCALE));
    snapshot.liquidity_rate = Some(rescale_u256(data.liquidity_rate, RAY_SCALE));
    snapshot.variable_borrow_rate = Some(rescale_u256(data.variable_borrow_rate, RAY_SCALE));
    snapshot.stable_borrow_rate = Some(rescale_u256(data.stable_borrow_rate, RAY_SCALE));
    snapshot.average_stable_borrow_rate =
        Some(rescale_u256(data.average_stable_borrow_rate, RAY_SCALE));
    snapshot.utilization_rate = Some(rescale_u256(data.utilization_rate, RAY_SCALE));
    snapshot.liquidity_index = Some(data.liquidity_index);
    snapshot.variable_borrow_index = Some(data.variable_borrow_index);
    snapshot.a_token_address = Some(data.a_token_address);
    snapshot.last_update_timestamp = Some(data.last_update_timestamp);
}
