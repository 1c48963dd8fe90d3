// CPU, RAM and full snapshot models

use serde::{Deserialize, Serialize};

use super::{GpuEntry, PartitionUsage, Reading, percent_of};

/// One logical core, paired index-for-index from the utilization and frequency arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreStat {
    pub index: usize,
    pub utilization_percent: f64,
    pub frequency_ghz: f64,
}

/// Used/total byte counts with a guarded percentage (RAM, partitions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    pub used_bytes: u64,
    pub total_bytes: u64,
    pub used_percent: Reading<f64>,
}

impl Usage {
    pub fn from_totals(used_bytes: u64, total_bytes: u64) -> Self {
        Self {
            used_bytes,
            total_bytes,
            used_percent: percent_of(used_bytes as f64, total_bytes as f64),
        }
    }
}

/// One refresh cycle's telemetry. Built fresh by the aggregator and handed to the
/// renderer by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub cpu_name: Reading<String>,
    pub cpu_temperature_celsius: Reading<f64>,
    pub per_core: Reading<Vec<CoreStat>>,
    pub ram: Reading<Usage>,
    pub storage: Reading<Vec<PartitionUsage>>,
    pub gpus: Reading<Vec<GpuEntry>>,
}

impl Snapshot {
    pub fn unavailable(timestamp: u64) -> Self {
        Self {
            timestamp,
            cpu_name: Reading::Unavailable,
            cpu_temperature_celsius: Reading::Unavailable,
            per_core: Reading::Unavailable,
            ram: Reading::Unavailable,
            storage: Reading::Unavailable,
            gpus: Reading::Unavailable,
        }
    }

    /// Number of top-level sections whose source failed this cycle.
    pub fn unavailable_sections(&self) -> usize {
        [
            self.cpu_name.is_available(),
            self.cpu_temperature_celsius.is_available(),
            self.per_core.is_available(),
            self.ram.is_available(),
            self.storage.is_available(),
            self.gpus.is_available(),
        ]
        .iter()
        .filter(|ok| !**ok)
        .count()
    }
}
