//! Feeding one report from several workers at once.
use crate::{IngestError, ReportAggregate};
use perfreport_core::SampleRecord;
use std::sync::Arc;
use tokio::task::JoinHandle;
#[allow(unused_imports)]
use tracing::{debug, error, info, trace, warn};

/// Ingest every batch on its own blocking task and wait for all of them.
///
/// Returns the number of samples submitted, including any dropped for lacking an identifier.
/// Must be called from within a tokio runtime.
pub async fn ingest_concurrently<I>(
    report: Arc<ReportAggregate>,
    batches: I,
) -> Result<usize, IngestError>
where
    I: IntoIterator<Item = Vec<SampleRecord>>,
{
    let workers: Vec<JoinHandle<usize>> = batches
        .into_iter()
        .map(|batch| {
            let report = report.clone();
            tokio::task::spawn_blocking(move || {
                for sample in &batch {
                    report.add_sample(sample);
                }
                batch.len()
            })
        })
        .collect();

    let worker_count = workers.len();
    let mut submitted = 0;
    for worker in workers {
        submitted += worker.await?;
    }

    debug!(
        "Ingested {submitted} samples into {} with {worker_count} workers",
        report.identifier()
    );
    Ok(submitted)
}
