// Storage / partition models

use serde::{Deserialize, Serialize};

use super::{Reading, Usage};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionUsage {
    pub device_name: String,
    pub mount_point: String,
    pub file_system: String,
    /// Unavailable when this partition's usage query failed.
    pub usage: Reading<Usage>,
}
