//! # Snapshot Indexer
//!
//! Replays a block range, fetches the logs of every configured contract and
//! writes one snapshot per handled event.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin snapshot_indexer -- --config Config.toml --from-block 9241022
//! ```
//!
//! Ctrl+C stops the run once the log being handled has been written.

use anyhow::{Context, Result};
use clap::Parser;
use defi_snapshot_sdk::{
    indexer::SnapshotIndexer,
    metrics,
    readers::EthersContracts,
    settings::{Settings, StoreBackend},
    store::{MemorySnapshotStore, PgSnapshotStore, SnapshotStore},
    types::conversions::u256_to_u64,
    utils::{create_block_chunks, sort_logs},
};
use ethers::prelude::{Filter, Http, Middleware, Provider};
use log::{info, warn};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::signal;

#[derive(Parser, Debug)]
#[command(name = "snapshot_indexer", about = "Index DeFi protocol snapshots over a block range")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "Config.toml")]
    config: String,

    /// Overrides `indexer.from_block`
    #[arg(long)]
    from_block: Option<u64>,

    /// Overrides `indexer.to_block` (defaults to the chain head)
    #[arg(long)]
    to_block: Option<u64>,

    /// Prometheus listen address, e.g. 0.0.0.0:9000
    #[cfg(feature = "observability")]
    #[arg(long)]
    metrics_addr: Option<std::net::SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    init_metrics(&args)?;

    let settings = Settings::from_path(&args.config)
        .with_context(|| format!("loading settings from {}", args.config))?;
    info!("Settings loaded from {}", args.config);

    let provider = Arc::new(Provider::<Http>::try_from(settings.rpc.http_url.as_str())?);
    let contracts = EthersContracts::new(Arc::clone(&provider));

    let store: Arc<dyn SnapshotStore> = match settings.store.backend {
        StoreBackend::Memory => {
            warn!("Using the in-memory store; snapshots are dropped on exit");
            Arc::new(MemorySnapshotStore::new())
        }
        StoreBackend::Postgres => {
            Arc::new(PgSnapshotStore::connect(settings.store.database_url.as_deref()).await?)
        }
    };

    let indexer = SnapshotIndexer::from_settings(&settings, contracts, store);
    let addresses = indexer.addresses();
    if addresses.is_empty() {
        warn!("No contracts configured; nothing to index");
        return Ok(());
    }

    let from_block = args.from_block.unwrap_or(settings.indexer.from_block);
    let to_block = match args.to_block.or(settings.indexer.to_block) {
        Some(block) => block,
        None => provider.get_block_number().await?.as_u64(),
    };
    info!(
        "Indexing {} contracts from block {} to {}",
        addresses.len(),
        from_block,
        to_block
    );

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                info!("Ctrl+C received, stopping after the current log");
                stop.store(true, Ordering::SeqCst);
            }
        });
    }

    let chunk_size = settings.indexer.chunk_size;
    let stopped_at = run(
        &indexer,
        provider.as_ref(),
        addresses,
        from_block,
        to_block,
        chunk_size,
        &stop,
    )
    .await?;
    match stopped_at {
        Some(block) => info!("Stopped at block {}", block),
        None => info!("Reached block {}", to_block),
    }

    Ok(())
}

#[cfg(feature = "observability")]
fn init_metrics(args: &Args) -> Result<()> {
    match args.metrics_addr {
        Some(addr) => {
            metrics::install_prometheus_exporter(addr)?;
            info!("Prometheus exporter listening on {}", addr);
        }
        None => metrics::describe_metrics(),
    }
    Ok(())
}

#[cfg(not(feature = "observability"))]
fn init_metrics(_args: &Args) -> Result<()> {
    metrics::describe_metrics();
    Ok(())
}

/// Returns the block of the last handled log when stopped early.
async fn run<S>(
    indexer: &SnapshotIndexer<EthersContracts<Provider<Http>>, S>,
    provider: &Provider<Http>,
    addresses: Vec<ethers::types::Address>,
    from_block: u64,
    to_block: u64,
    chunk_size: u64,
    stop: &AtomicBool,
) -> Result<Option<u64>>
where
    S: SnapshotStore + ?Sized,
{
    let mut written = 0usize;
    for (start, end) in create_block_chunks(from_block, to_block, chunk_size) {
        if stop.load(Ordering::SeqCst) {
            return Ok(Some(start.saturating_sub(1)));
        }
        let filter = Filter::new()
            .address(addresses.clone())
            .from_block(start)
            .to_block(end);
        let mut logs = provider.get_logs(&filter).await?;
        sort_logs(&mut logs);

        let mut timestamps: HashMap<u64, u64> = HashMap::new();
        for block in logs.iter().filter_map(|log| log.block_number) {
            let block = block.as_u64();
            if timestamps.contains_key(&block) {
                continue;
            }
            match provider.get_block(block).await? {
                Some(b) => {
                    timestamps.insert(block, u256_to_u64(b.timestamp)?);
                }
                None => warn!("Block {} not found, using timestamp 0", block),
            }
        }

        let progress = indexer.handle_logs(&logs, &timestamps, stop).await?;
        written += progress.snapshots;
        info!(
            "Blocks {}..={}: {} of {} logs, {} snapshots written so far",
            start,
            end,
            progress.logs,
            logs.len(),
            written
        );
        if progress.stopped {
            let last_block = progress
                .logs
                .checked_sub(1)
                .and_then(|i| logs.get(i))
                .and_then(|log| log.block_number)
                .map(|b| b.as_u64())
                .unwrap_or_else(|| start.saturating_sub(1));
            return Ok(Some(last_block));
        }
    }
    Ok(None)
}
