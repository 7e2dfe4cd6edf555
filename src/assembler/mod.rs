//! # Snapshot Assemblers
//!
//! One assembler per protocol family. Each handler follows the same shape:
//! load-or-create the record by transaction hash, write the call-free fields,
//! populate every derived field through a fault-isolated read (falling back to
//! the field's default on revert, without skipping later fields), then persist
//! exactly once.
//!
//! A handler only fails when the store does; contract failures end up as
//! defaulted fields and error logs.

pub mod aave_v1;
pub mod curve;

pub use aave_v1::{AaveV1Snapshotter, AAVE_V1_TOKEN_ENTITY};
pub use curve::{CurveNamespace, CurveSnapshotter};
