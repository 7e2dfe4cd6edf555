//! # Contract Variant Dispatcher
//!
//! Curve pools come in structurally distinct shapes. The two-coin (compound
//! style) and four-coin (y style) pools index coins with `int128`, the
//! three-coin pool with `uint256`. [`PoolFamily`] is the closed set of shapes;
//! the only place an unknown discriminator can show up is when a pool type
//! string is parsed, after which dispatch is an exhaustive match.

use ethers::types::Address;
use std::fmt;
use std::str::FromStr;

use crate::readers::{CurveContracts, CurvePoolReader};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolFamily {
    TwoCoin,
    ThreeCoin,
    FourCoin,
}

impl PoolFamily {
    /// Pool type identifier as it appears in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolFamily::TwoCoin => "Curve2Pool",
            PoolFamily::ThreeCoin => "Curve3Pool",
            PoolFamily::FourCoin => "Curve4Pool",
        }
    }

    /// Coins held by pools of this shape.
    pub fn n_coins(&self) -> u32 {
        match self {
            PoolFamily::TwoCoin => 2,
            PoolFamily::ThreeCoin => 3,
            PoolFamily::FourCoin => 4,
        }
    }

    pub fn coins_call(&self) -> &'static str {
        match self {
            PoolFamily::TwoCoin | PoolFamily::FourCoin => "coins(int128)",
            PoolFamily::ThreeCoin => "coins(uint256)",
        }
    }

    pub fn balances_call(&self) -> &'static str {
        match self {
            PoolFamily::TwoCoin | PoolFamily::FourCoin => "balances(int128)",
            PoolFamily::ThreeCoin => "balances(uint256)",
        }
    }
}

impl fmt::Display for PoolFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PoolFamily {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Curve2Pool" => Ok(PoolFamily::TwoCoin),
            "Curve3Pool" => Ok(PoolFamily::ThreeCoin),
            "Curve4Pool" => Ok(PoolFamily::FourCoin),
            other => Err(DispatchError::UnknownPoolType(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Unknown poolType {0}")]
    UnknownPoolType(String),
}

/// Bind a pool reader for `pool_type` at `address`, pinned to `block`.
pub fn bind_pool<C: CurveContracts + ?Sized>(
    contracts: &C,
    pool_type: &str,
    address: Address,
    block: u64,
) -> Result<Box<dyn CurvePoolReader>, DispatchError> {
    let family = PoolFamily::from_str(pool_type)?;
    Ok(contracts.pool(family, address, block))
}
