//! # DeFi Snapshot SDK
//!
//! Turns on-chain events from lending and AMM protocols into normalized,
//! point-in-time snapshot records. Each triggering event yields exactly one
//! record, keyed by its transaction hash, with every derived field read from
//! the chain at the event's block.
//!
//! ## Overview
//!
//! - **Aave V1**: aToken reserve configuration and runtime data
//! - **Curve / Curve V1**: pool balances, coins and virtual price
//! - **Curve gauges**: gauge and total weights from the gauge controller
//!
//! ## Architecture
//!
//! ### Read Layer
//! Typed contract readers over `ethers` bindings. Every read is fault
//! isolated: a revert becomes [`CallOutcome::Reverted`] and the field falls
//! back to its default instead of aborting the snapshot.
//!
//! ### Normalization Layer
//! Fixed-point integers are rescaled into arbitrary-precision decimals
//! (percent at scale 4, wad at 18, ray at 27, token amounts at the token's
//! own decimals).
//!
//! ### Assembly Layer
//! Per-protocol assemblers load or create the record, populate it field by
//! field and persist it once. Curve pool shapes are resolved by the variant
//! dispatcher.
//!
//! ### Storage Layer
//! Keyed upsert store, in memory or PostgreSQL.

// Core Types
/// Snapshot records and conversions
pub mod types;
/// Decimal rescaling of fixed-point integers
pub mod normalization;
/// Fault-isolated contract call outcome
pub mod call_outcome;

// Read Layer
/// Smart contract ABIs (read-only)
pub mod contracts;
/// Contract reader traits and the ethers-backed binding set
pub mod readers;
/// Curve pool variant dispatch
pub mod dispatcher;

// Assembly Layer
/// Inbound event types and log decoding
pub mod events;
/// Per-protocol snapshot assemblers
pub mod assembler;
/// Log routing from watched contracts to assemblers
pub mod indexer;

// Infrastructure
/// Snapshot persistence (memory and PostgreSQL)
pub mod store;
/// Metrics and observability
pub mod metrics;
/// General utilities
pub mod utils;

// Settings & Configuration
/// Configuration management
pub mod settings;

// Re-exports for convenience
pub use assembler::{AaveV1Snapshotter, CurveNamespace, CurveSnapshotter};
pub use call_outcome::{try_call, CallOutcome};
pub use dispatcher::{DispatchError, PoolFamily};
pub use indexer::SnapshotIndexer;
pub use normalization::rescale;
pub use readers::EthersContracts;
pub use settings::Settings;
pub use store::{MemorySnapshotStore, PgSnapshotStore, SnapshotStore};
