// GPU models (one entry per line of the GPU tool's output)

use serde::{Deserialize, Serialize};

use super::Reading;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpuEntry {
    pub name: String,
    pub driver_version: String,
    pub utilization_gpu_percent: Reading<f64>,
    pub utilization_memory_percent: Reading<f64>,
    pub total_memory_mb: u64,
    pub free_memory_mb: u64,
    pub used_memory_mb: u64,
    pub memory_used_percent: Reading<f64>,
    pub temperature_celsius: Reading<f64>,
}
