use ethers::types::{H256, U256};
use num::bigint::Sign;
use num::BigInt;

// Lossless: U256 always fits in an unsigned BigInt
pub fn u256_to_bigint(value: U256) -> BigInt {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    BigInt::from_bytes_be(Sign::Plus, &bytes)
}

pub fn u256_to_u64(value: U256) -> Result<u64, ConversionError> {
    if value > U256::from(u64::MAX) {
        return Err(ConversionError::Overflow);
    }
    Ok(value.as_u64())
}

/// Hex key (`0x`-prefixed, lowercase) under which snapshots are stored.
pub fn tx_hash_key(hash: H256) -> String {
    format!("0x{}", hex::encode(hash.as_bytes()))
}

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("Negative source scale: {0}")]
    NegativeScale(i64),
    #[error("Overflow in conversion")]
    Overflow,
}
