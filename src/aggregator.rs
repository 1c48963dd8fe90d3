// Snapshot aggregation: query every source concurrently, isolate failures per field.

use crate::models::{Reading, Snapshot};
use crate::sources::{Source, Sources};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::instrument;

const SOURCE_COUNT: usize = 6;

pub struct SnapshotAggregator {
    sources: Sources,
    /// Per-source "failed last cycle" flags, so a persistently absent source warns once.
    failing: [AtomicBool; SOURCE_COUNT],
}

impl SnapshotAggregator {
    pub fn new(sources: Sources) -> Self {
        Self {
            sources,
            failing: Default::default(),
        }
    }

    /// Always returns a snapshot; a failed source yields `Unavailable` for its field only.
    #[instrument(skip(self))]
    pub async fn collect(&self) -> Snapshot {
        let s = &self.sources;
        let (cpu_name, cpu_temperature_celsius, per_core, ram, storage, gpus) = tokio::join!(
            sample(&*s.cpu_name, &self.failing[0]),
            sample(&*s.cpu_temperature, &self.failing[1]),
            sample(&*s.cpu_cores, &self.failing[2]),
            sample(&*s.memory, &self.failing[3]),
            sample(&*s.storage, &self.failing[4]),
            sample(&*s.gpu, &self.failing[5]),
        );

        Snapshot {
            timestamp: now_millis(),
            cpu_name,
            cpu_temperature_celsius,
            per_core,
            ram,
            storage,
            gpus,
        }
    }
}

async fn sample<T: Send>(source: &dyn Source<Output = T>, failing: &AtomicBool) -> Reading<T> {
    match source.query().await {
        Ok(value) => {
            if failing.swap(false, Ordering::Relaxed) {
                tracing::info!(source = source.name(), "source recovered");
            }
            Reading::Available(value)
        }
        Err(e) => {
            if failing.swap(true, Ordering::Relaxed) {
                tracing::debug!(source = source.name(), error = %e, "source still unavailable");
            } else {
                tracing::warn!(source = source.name(), error = %e, "source unavailable");
            }
            Reading::Unavailable
        }
    }
}

fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, operation = "get_timestamp", "system time error");
            0
        })
}
