use async_trait::async_trait;
use ethers::prelude::*;
use std::sync::Arc;

use super::{
    AaveV1Contracts, ATokenReader, AddressesProviderReader, CurveContracts, CurvePoolReader,
    Erc20Reader, GaugeControllerReader, LendingPoolDataProviderReader, ReserveConfiguration,
    ReserveData,
};
use crate::call_outcome::{try_call, CallOutcome};
use crate::contracts::{
    AaveV1AToken, AaveV1LendingPoolAddressesProvider, AaveV1LendingPoolDataProvider,
    CurveGaugeController, CurvePoolX2, CurvePoolX3, CurvePoolX4, Erc20,
};
use crate::dispatcher::PoolFamily;

/// Binding set backed by an ethers `Middleware`. Every reader it hands out
/// issues `eth_call`s pinned to the requested block.
pub struct EthersContracts<M> {
    client: Arc<M>,
}

impl<M> Clone for EthersContracts<M> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<M: Middleware + 'static> EthersContracts<M> {
    pub fn new(client: Arc<M>) -> Self {
        Self { client }
    }
}

impl<M: Middleware + 'static> CurveContracts for EthersContracts<M> {
    fn pool(&self, family: PoolFamily, address: Address, block: u64) -> Box<dyn CurvePoolReader> {
        let client = Arc::clone(&self.client);
        let binding = match family {
            PoolFamily::TwoCoin => PoolBinding::TwoCoin(CurvePoolX2::new(address, client)),
            PoolFamily::ThreeCoin => PoolBinding::ThreeCoin(CurvePoolX3::new(address, client)),
            PoolFamily::FourCoin => PoolBinding::FourCoin(CurvePoolX4::new(address, client)),
        };
        Box::new(EthersCurvePool {
            binding,
            block: BlockId::from(block),
        })
    }

    fn erc20(&self, address: Address, block: u64) -> Box<dyn Erc20Reader> {
        Box::new(EthersErc20 {
            contract: Erc20::new(address, Arc::clone(&self.client)),
            block: BlockId::from(block),
        })
    }

    fn gauge_controller(&self, address: Address, block: u64) -> Box<dyn GaugeControllerReader> {
        Box::new(EthersGaugeController {
            contract: CurveGaugeController::new(address, Arc::clone(&self.client)),
            block: BlockId::from(block),
        })
    }
}

impl<M: Middleware + 'static> AaveV1Contracts for EthersContracts<M> {
    fn a_token(&self, address: Address, block: u64) -> Box<dyn ATokenReader> {
        Box::new(EthersAToken {
            contract: AaveV1AToken::new(address, Arc::clone(&self.client)),
            block: BlockId::from(block),
        })
    }

    fn addresses_provider(&self, address: Address, block: u64) -> Box<dyn AddressesProviderReader> {
        Box::new(EthersAddressesProvider {
            contract: AaveV1LendingPoolAddressesProvider::new(address, Arc::clone(&self.client)),
            block: BlockId::from(block),
        })
    }

    fn data_provider(
        &self,
        address: Address,
        block: u64,
    ) -> Box<dyn LendingPoolDataProviderReader> {
        Box::new(EthersDataProvider {
            contract: AaveV1LendingPoolDataProvider::new(address, Arc::clone(&self.client)),
            block: BlockId::from(block),
        })
    }
}

enum PoolBinding<M> {
    TwoCoin(CurvePoolX2<M>),
    ThreeCoin(CurvePoolX3<M>),
    FourCoin(CurvePoolX4<M>),
}

struct EthersCurvePool<M> {
    binding: PoolBinding<M>,
    block: BlockId,
}

#[async_trait]
impl<M: Middleware + 'static> CurvePoolReader for EthersCurvePool<M> {
    fn family(&self) -> PoolFamily {
        match self.binding {
            PoolBinding::TwoCoin(_) => PoolFamily::TwoCoin,
            PoolBinding::ThreeCoin(_) => PoolFamily::ThreeCoin,
            PoolBinding::FourCoin(_) => PoolFamily::FourCoin,
        }
    }

    async fn balance_of(&self, coin_index: u32) -> CallOutcome<U256> {
        match &self.binding {
            PoolBinding::TwoCoin(c) => {
                let call = c.balances(i128::from(coin_index)).block(self.block);
                try_call(call.call()).await
            }
            PoolBinding::ThreeCoin(c) => {
                let call = c.balances(U256::from(coin_index)).block(self.block);
                try_call(call.call()).await
            }
            PoolBinding::FourCoin(c) => {
                let call = c.balances(i128::from(coin_index)).block(self.block);
                try_call(call.call()).await
            }
        }
    }

    async fn token_at(&self, coin_index: u32) -> CallOutcome<Address> {
        match &self.binding {
            PoolBinding::TwoCoin(c) => {
                let call = c.coins(i128::from(coin_index)).block(self.block);
                try_call(call.call()).await
            }
            PoolBinding::ThreeCoin(c) => {
                let call = c.coins(U256::from(coin_index)).block(self.block);
                try_call(call.call()).await
            }
            PoolBinding::FourCoin(c) => {
                let call = c.coins(i128::from(coin_index)).block(self.block);
                try_call(call.call()).await
            }
        }
    }

    async fn virtual_price(&self) -> CallOutcome<U256> {
        match &self.binding {
            PoolBinding::TwoCoin(c) => {
                let call = c.get_virtual_price().block(self.block);
                try_call(call.call()).await
            }
            PoolBinding::ThreeCoin(c) => {
                let call = c.get_virtual_price().block(self.block);
                try_call(call.call()).await
            }
            PoolBinding::FourCoin(c) => {
                let call = c.get_virtual_price().block(self.block);
                try_call(call.call()).await
            }
        }
    }
}

struct EthersErc20<M> {
    contract: Erc20<M>,
    block: BlockId,
}

#[async_trait]
impl<M: Middleware + 'static> Erc20Reader for EthersErc20<M> {
    async fn decimals(&self) -> CallOutcome<u8> {
        let call = self.contract.decimals().block(self.block);
        try_call(call.call()).await
    }
}

struct EthersGaugeController<M> {
    contract: CurveGaugeController<M>,
    block: BlockId,
}

#[async_trait]
impl<M: Middleware + 'static> GaugeControllerReader for EthersGaugeController<M> {
    async fn gauge_weight(&self, gauge: Address) -> CallOutcome<U256> {
        let call = self.contract.get_gauge_weight(gauge).block(self.block);
        try_call(call.call()).await
    }

    async fn total_weight(&self) -> CallOutcome<U256> {
        let call = self.contract.get_total_weight().block(self.block);
        try_call(call.call()).await
    }
}

struct EthersAToken<M> {
    contract: AaveV1AToken<M>,
    block: BlockId,
}

#[async_trait]
impl<M: Middleware + 'static> ATokenReader for EthersAToken<M> {
    async fn symbol(&self) -> CallOutcome<String> {
        let call = self.contract.symbol().block(self.block);
        try_call(call.call()).await
    }

    async fn decimals(&self) -> CallOutcome<u8> {
        let call = self.contract.decimals().block(self.block);
        try_call(call.call()).await
    }

    async fn underlying_asset_address(&self) -> CallOutcome<Address> {
        let call = self.contract.underlying_asset_address().block(self.block);
        try_call(call.call()).await
    }
}

struct EthersAddressesProvider<M> {
    contract: AaveV1LendingPoolAddressesProvider<M>,
    block: BlockId,
}

#[async_trait]
impl<M: Middleware + 'static> AddressesProviderReader for EthersAddressesProvider<M> {
    async fn lending_pool_data_provider(&self) -> CallOutcome<Address> {
        let call = self.contract.get_lending_pool_data_provider().block(self.block);
        try_call(call.call()).await
    }
}

struct EthersDataProvider<M> {
    contract: AaveV1LendingPoolDataProvider<M>,
    block: BlockId,
}

#[async_trait]
impl<M: Middleware + 'static> LendingPoolDataProviderReader for EthersDataProvider<M> {
    async fn reserve_configuration(&self, reserve: Address) -> CallOutcome<ReserveConfiguration> {
        let call = self
            .contract
            .get_reserve_configuration_data(reserve)
            .block(self.block);
        try_call(call.call()).await.map(
            |(
                ltv,
                liquidation_threshold,
                liquidation_bonus,
                interest_rate_strategy_address,
                usage_as_collateral_enabled,
                borrowing_enabled,
                stable_borrow_rate_enabled,
                is_active,
            )| ReserveConfiguration {
                ltv,
                liquidation_threshold,
                liquidation_bonus,
                interest_rate_strategy_address,
                usage_as_collateral_enabled,
                borrowing_enabled,
                stable_borrow_rate_enabled,
                is_active,
            },
        )
    }

    async fn reserve_data(&self, reserve: Address) -> CallOutcome<ReserveData> {
        let call = self.contract.get_reserve_data(reserve).block(self.block);
        try_call(call.call()).await.map(
            |(
                total_liquidity,
                available_liquidity,
                total_borrows_stable,
                total_borrows_variable,
                liquidity_rate,
                variable_borrow_rate,
                stable_borrow_rate,
                average_stable_borrow_rate,
                utilization_rate,
                liquidity_index,
                variable_borrow_index,
                a_token_address,
                last_update_timestamp,
            )| ReserveData {
                total_liquidity,
                available_liquidity,
                total_borrows_stable,
                total_borrows_variable,
                liquidity_rate,
                variable_borrow_rate,
                stable_borrow_rate,
                average_stable_borrow_rate,
                utilization_rate,
                liquidity_index,
                variable_borrow_index,
                a_token_address,
                last_update_timestamp,
            },
        )
    }
}
