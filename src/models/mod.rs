// Snapshot data model

mod gpu;
mod reading;
mod storage;
mod system;

pub use gpu::GpuEntry;
pub use reading::{NOT_AVAILABLE, Reading, percent_of};
pub use storage::PartitionUsage;
pub use system::{CoreStat, Snapshot, Usage};
