// Common types shared by readers, assemblers and stores

pub mod conversions;
pub mod snapshots;

pub use conversions::ConversionError;
pub use snapshots::{AaveV1TokenSnapshot, CurveGaugeSnapshot, CurvePoolSnapshot, Snapshot};

use ethers::types::{Address, H160};

/// Sentinel written to address fields whose backing read failed.
pub const ZERO_ADDRESS: Address = H160([0u8; 20]);
