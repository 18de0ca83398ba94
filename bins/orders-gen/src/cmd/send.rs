use std::time::Instant;

use serde_json::Value;

use stream_api::{Payload, StreamEntry};

use super::config::Effective;
use super::domain::{fake, partition_key, Rng};
use super::error::OrdersGenError;
use super::sequence::{FileSequenceStore, SequenceStore};
use super::stream::{StreamPublisher, TcpStreamPublisher};

// ═══════════════════════════════════════════════════════════════
//  Entry point
// ═══════════════════════════════════════════════════════════════

pub async fn run(eff: &Effective) -> Result<(), OrdersGenError> {
    let store = FileSequenceStore::new(&eff.id_file);
    let mut publisher = TcpStreamPublisher::new(&eff.endpoint, &eff.stream_name);
    let mut rng = Rng::new(eff.seed);
    run_loop(eff, &store, &mut publisher, &mut rng).await
}

// ═══════════════════════════════════════════════════════════════
//  Send loop
// ═══════════════════════════════════════════════════════════════

/// Drive `count` record creations through the stream in batches.
///
/// The id horizon advances on *attempt*: after every submission (full
/// success, partial failure or hard error) the next unused id is committed
/// before the following batch, so a restart never re-issues an id. A
/// failed batch does not stop the remaining batches; only a store commit
/// failure ends the run.
pub async fn run_loop(
    eff: &Effective,
    store: &dyn SequenceStore,
    publisher: &mut dyn StreamPublisher,
    rng: &mut Rng,
) -> Result<(), OrdersGenError> {
    let mut next_id = store.read_current();
    let start = Instant::now();
    let mut sent = 0u64;
    let mut failed = 0u64;

    let mut remaining = eff.count;
    while remaining > 0 {
        let chunk = remaining.min(eff.batch_size as u64) as usize;
        let first_id = next_id;

        let mut batch = Vec::with_capacity(chunk);
        for _ in 0..chunk {
            let record = fake(next_id, rng);
            next_id += 1;
            let key = partition_key(&record);
            let data = Payload::from_json(&Value::Object(record))?;
            batch.push(StreamEntry { data, partition_key: key });
        }

        match publisher.put_batch(&batch) {
            Ok(outcome) if outcome.fully_successful() => {
                sent += chunk as u64;
                tracing::info!(records = chunk, first_id, last_id = next_id - 1, "put batch");
            }
            Ok(outcome) => {
                sent += (chunk - outcome.failed_count) as u64;
                failed += outcome.failed_count as u64;
                for (pos, entry) in outcome.failures() {
                    tracing::warn!(
                        id = first_id + pos as u64,
                        code = entry.error_code.as_deref().unwrap_or("unknown"),
                        detail = entry.error_message.as_deref().unwrap_or(""),
                        "entry rejected"
                    );
                }
                tracing::warn!(
                    records = chunk,
                    rejected = outcome.failed_count,
                    first_id,
                    last_id = next_id - 1,
                    "partial batch failure"
                );
            }
            Err(e) => {
                failed += chunk as u64;
                tracing::error!(error = %e, first_id, last_id = next_id - 1, "batch submission failed");
            }
        }

        store.commit(next_id)?;

        remaining -= chunk as u64;
        if remaining > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(eff.pause_ms)).await;
        }
    }

    let elapsed = start.elapsed();
    tracing::info!(
        sent,
        failed,
        elapsed_s = format_args!("{:.1}", elapsed.as_secs_f64()),
        "run complete"
    );

    Ok(())
}
