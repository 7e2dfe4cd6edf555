// Contracts Module - Read-only ABIs for the snapshotted protocols

pub mod aave_v1;
pub mod curve_gauge_controller;
pub mod curve_pool;
pub mod erc20;

// Public exports
pub use aave_v1::{
    AaveV1AToken, AaveV1LendingPoolAddressesProvider, AaveV1LendingPoolDataProvider,
    BurnOnLiquidationFilter, MintOnDepositFilter,
};
pub use curve_gauge_controller::{CurveGaugeController, NewGaugeWeightFilter, VoteForGaugeFilter};
pub use curve_pool::{CurvePoolX2, CurvePoolX3, CurvePoolX4};
pub use erc20::Erc20;
