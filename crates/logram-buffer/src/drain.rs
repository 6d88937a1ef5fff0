// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Popping and decoding a batch.

use logram_core::{Batch, LogramError, PendingQueue, decode_entry};
use tracing::warn;

/// Pops up to `max_count` payloads, oldest first.
///
/// Payloads that fail to decode are consumed, counted in `dropped`, and never
/// retried. A queue error after some slots were popped ends the drain early
/// and returns what was collected; a queue error on the first pop is returned.
pub async fn drain(queue: &dyn PendingQueue, max_count: usize) -> Result<Batch, LogramError> {
    let mut batch = Batch::default();

    while batch.consumed < max_count {
        let payload = match queue.pop().await {
            Ok(Some(payload)) => payload,
            Ok(None) => break,
            Err(e) if batch.consumed == 0 => return Err(e),
            Err(e) => {
                warn!(error = %e, consumed = batch.consumed, "queue pop failed mid-drain, flushing partial batch");
                break;
            }
        };
        batch.consumed += 1;

        match decode_entry(&payload) {
            Ok(entry) => batch.entries.push(entry),
            Err(e) => {
                batch.dropped += 1;
                warn!(error = %e, "dropping undecodable queue entry");
            }
        }
    }

    Ok(batch)
}
