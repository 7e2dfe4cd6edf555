// src/utils.rs
// Block-range and log-ordering helpers for the indexer loop

use ethers::types::{Log, U256, U64};

/// Split `[from_block, to_block]` into inclusive `(start, end)` chunks of at most `chunk_size` blocks.
/// A zero `chunk_size` is treated as 1.
pub fn create_block_chunks(from_block: u64, to_block: u64, chunk_size: u64) -> Vec<(u64, u64)> {
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::new();
    let mut current_from = from_block;
    while current_from <= to_block {
        let current_to = current_from
            .saturating_add(chunk_size - 1)
            .min(to_block);
        chunks.push((current_from, current_to));
        if current_to == u64::MAX {
            break;
        }
        current_from = current_to + 1;
    }
    chunks
}

/// Order logs the way the chain emitted them: by block, then by log index.
pub fn sort_logs(logs: &mut [Log]) {
    logs.sort_by_key(|log| {
        (
            log.block_number.unwrap_or_else(U64::zero),
            log.log_index.unwrap_or_else(U256::zero),
        )
    });
}
