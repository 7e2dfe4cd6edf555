// src/normalization.rs
//
// Fixed-point rescaling of raw on-chain integers into canonical decimals.
// A raw integer `r` read at source scale `s` represents `r / 10^s`.

use bigdecimal::BigDecimal;
use ethers::types::U256;
use num::BigInt;

use crate::types::conversions::{u256_to_bigint, ConversionError};

/// Aave V1 percentages (ltv, liquidation threshold/bonus) are expressed in 1e4
pub const PERCENT_SCALE: u32 = 4;
/// WAD precision (1e18): Curve virtual price, gauge weights
pub const WAD_SCALE: u32 = 18;
/// RAY precision (1e27): Aave V1 rates and stable/variable borrow totals
pub const RAY_SCALE: u32 = 27;

/// Rescale an arbitrary-precision integer expressed at `source_scale` into a
/// canonical decimal of the same magnitude.
///
/// No precision is lost: the result carries every digit of `raw`. Negative
/// scales are rejected.
pub fn rescale(raw: &BigInt, source_scale: i64) -> Result<BigDecimal, ConversionError> {
    if source_scale < 0 {
        return Err(ConversionError::NegativeScale(source_scale));
    }
    Ok(BigDecimal::new(raw.clone(), source_scale).normalized())
}

/// Rescale a raw `uint256` contract result. Total, since `u32` scales are never negative.
pub fn rescale_u256(raw: U256, source_scale: u32) -> BigDecimal {
    BigDecimal::new(u256_to_bigint(raw), i64::from(source_scale)).normalized()
}
