//! # Snapshot Indexer
//!
//! Routes raw logs from configured contracts to the matching assembler.
//!
//! ## Data sources
//!
//! - **Aave V1 aTokens**: `MintOnDeposit` and `BurnOnLiquidation`
//! - **Curve pools**: any log emitted by the pool address
//! - **Curve gauge controllers**: `NewGaugeWeight` and `VoteForGauge`
//!
//! Logs must be fed in chain order (see [`crate::utils::sort_logs`]); the
//! indexer never reorders them.

use anyhow::Result;
use ethers::types::{Address, Log};
use log::debug;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::assembler::{AaveV1Snapshotter, CurveNamespace, CurveSnapshotter};
use crate::events::{
    decode_a_token_event, decode_gauge_event, ATokenEventKind, EventContext, PoolEvent,
};
use crate::readers::{AaveV1Contracts, CurveContracts};
use crate::settings::{CurvePoolSource, Settings};
use crate::store::SnapshotStore;
use crate::types::{AaveV1TokenSnapshot, CurveGaugeSnapshot, CurvePoolSnapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    AaveV1AToken,
    CurvePool {
        namespace: CurveNamespace,
        n_coins: u32,
        pool_type: String,
    },
    CurveGaugeController {
        namespace: CurveNamespace,
    },
}

/// Snapshot written in response to one log.
#[derive(Debug, Clone, PartialEq)]
pub enum Handled {
    AaveV1Token(AaveV1TokenSnapshot),
    CurvePool(CurveNamespace, CurvePoolSnapshot),
    CurveGauge(CurveNamespace, CurveGaugeSnapshot),
}

/// Progress through one batch of logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchProgress {
    /// Logs fully handled, in order from the start of the batch
    pub logs: usize,
    pub snapshots: usize,
    /// Set when `stop` cut the batch short
    pub stopped: bool,
}

pub struct SnapshotIndexer<C, S: ?Sized> {
    sources: HashMap<Address, Vec<DataSource>>,
    aave_v1: AaveV1Snapshotter<C, S>,
    curve: CurveSnapshotter<C, S>,
    curve_v1: CurveSnapshotter<C, S>,
}

impl<C, S> SnapshotIndexer<C, S>
where
    C: CurveContracts + AaveV1Contracts + Clone,
    S: SnapshotStore + ?Sized,
{
    pub fn new(contracts: C, store: Arc<S>, aave_addresses_provider: Address) -> Self {
        Self {
            sources: HashMap::new(),
            aave_v1: AaveV1Snapshotter::new(
                contracts.clone(),
                Arc::clone(&store),
                aave_addresses_provider,
            ),
            curve: CurveSnapshotter::new(
                CurveNamespace::Curve,
                contracts.clone(),
                Arc::clone(&store),
            ),
            curve_v1: CurveSnapshotter::new(CurveNamespace::CurveV1, contracts, store),
        }
    }

    /// Build an indexer watching every contract listed in `settings`.
    pub fn from_settings(settings: &Settings, contracts: C, store: Arc<S>) -> Self {
        let mut indexer = Self::new(contracts, store, settings.aave_v1.addresses_provider);
        for &token in &settings.aave_v1.tokens {
            indexer.watch_a_token(token);
        }
        for (namespace, curve) in [
            (CurveNamespace::Curve, &settings.curve),
            (CurveNamespace::CurveV1, &settings.curve_v1),
        ] {
            if let Some(controller) = curve.gauge_controller {
                indexer.watch_gauge_controller(namespace, controller);
            }
            for pool in &curve.pools {
                indexer.watch_curve_pool(namespace, pool);
            }
        }
        indexer
    }

    pub fn watch_a_token(&mut self, address: Address) {
        self.add_source(address, DataSource::AaveV1AToken);
    }

    pub fn watch_curve_pool(&mut self, namespace: CurveNamespace, pool: &CurvePoolSource) {
        self.add_source(
            pool.address,
            DataSource::CurvePool {
                namespace,
                n_coins: pool.n_coins,
                pool_type: pool.pool_type.clone(),
            },
        );
    }

    pub fn watch_gauge_controller(&mut self, namespace: CurveNamespace, address: Address) {
        self.add_source(address, DataSource::CurveGaugeController { namespace });
    }

    fn add_source(&mut self, address: Address, source: DataSource) {
        let sources = self.sources.entry(address).or_default();
        if !sources.contains(&source) {
            sources.push(source);
        }
    }

    /// Every watched contract address, for the log filter.
    pub fn addresses(&self) -> Vec<Address> {
        let mut addresses: Vec<Address> = self.sources.keys().copied().collect();
        addresses.sort();
        addresses
    }

    fn curve(&self, namespace: CurveNamespace) -> &CurveSnapshotter<C, S> {
        match namespace {
            CurveNamespace::Curve => &self.curve,
            CurveNamespace::CurveV1 => &self.curve_v1,
        }
    }

    /// Handle one mined log. Returns the snapshots written (possibly none).
    pub async fn handle_log(&self, log: &Log, block_timestamp: u64) -> Result<Vec<Handled>> {
        let Some(sources) = self.sources.get(&log.address) else {
            return Ok(Vec::new());
        };
        let Some(context) = EventContext::from_log(log, block_timestamp) else {
            debug!("Skipping pending log from {:?}", log.address);
            return Ok(Vec::new());
        };

        let mut handled = Vec::new();
        for source in sources {
            match source {
                DataSource::AaveV1AToken => match decode_a_token_event(log, context) {
                    Some(event) => {
                        let snapshot = match event.kind {
                            ATokenEventKind::MintOnDeposit => {
                                self.aave_v1.handle_mint_on_deposit(&event).await?
                            }
                            ATokenEventKind::BurnOnLiquidation => {
                                self.aave_v1.handle_burn_on_liquidation(&event).await?
                            }
                        };
                        handled.push(Handled::AaveV1Token(snapshot));
                    }
                    None => debug!("Ignoring aToken log from {:?}", log.address),
                },
                DataSource::CurvePool {
                    namespace,
                    n_coins,
                    pool_type,
                } => {
                    let event = PoolEvent {
                        context,
                        n_coins: *n_coins,
                        pool_type: pool_type.clone(),
                    };
                    let snapshot = self.curve(*namespace).handle_pool(&event).await?;
                    handled.push(Handled::CurvePool(*namespace, snapshot));
                }
                DataSource::CurveGaugeController { namespace } => {
                    match decode_gauge_event(log, context) {
                        Some(event) => {
                            let snapshot = self.curve(*namespace).handle_gauge(&event).await?;
                            handled.push(Handled::CurveGauge(*namespace, snapshot));
                        }
                        None => debug!("Ignoring gauge controller log from {:?}", log.address),
                    }
                }
            }
        }
        Ok(handled)
    }

    /// Handle `logs` in order, checking `stop` before each one so a log is
    /// never left half handled. Timestamps are looked up by block number; a
    /// missing block falls back to 0.
    pub async fn handle_logs(
        &self,
        logs: &[Log],
        timestamps: &HashMap<u64, u64>,
        stop: &AtomicBool,
    ) -> Result<BatchProgress> {
        let mut progress = BatchProgress::default();
        for log in logs {
            if stop.load(Ordering::SeqCst) {
                progress.stopped = true;
                break;
            }
            let timestamp = log
                .block_number
                .and_then(|block| timestamps.get(&block.as_u64()).copied())
                .unwrap_or_default();
            progress.snapshots += self.handle_log(log, timestamp).await?.len();
            progress.logs += 1;
        }
        Ok(progress)
    }
}
