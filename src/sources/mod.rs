// Telemetry sources: OS sensors via sysinfo and /sys, GPU via an external tool.

mod cpu;
mod gpu;
mod linux;
mod memory;
mod storage;

pub use cpu::{CpuCoresSource, CpuNameSource, CpuTemperatureSource, pair_cores};
pub use gpu::{
    ExternalTool, GPU_QUERY_FIELDS, GpuSource, parse_gpu_line, parse_gpu_output,
};
pub use linux::{parse_cpu_model, parse_millidegrees};
pub use memory::MemorySource;
pub use storage::{
    PartitionInfo, StorageSource, assemble_partitions, mount_usage, probe_partitions,
};

use crate::config::AppConfig;
use crate::error::SourceError;
use crate::models::{CoreStat, GpuEntry, PartitionUsage, Usage};
use futures_util::future::BoxFuture;
use std::marker::PhantomData;
use std::time::Duration;

/// Uniform capability shared by every provider the aggregator queries.
pub trait Source: Send + Sync {
    type Output: Send;

    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    fn query(&self) -> BoxFuture<'_, Result<Self::Output, SourceError>>;
}

/// A source that is switched off in configuration; always unavailable.
pub struct Disabled<T> {
    name: &'static str,
    _output: PhantomData<fn() -> T>,
}

impl<T> Disabled<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            _output: PhantomData,
        }
    }
}

impl<T: Send> Source for Disabled<T> {
    type Output = T;

    fn name(&self) -> &'static str {
        self.name
    }

    fn query(&self) -> BoxFuture<'_, Result<T, SourceError>> {
        let name = self.name;
        Box::pin(async move { Err(SourceError::unavailable(name, "disabled in configuration")) })
    }
}

/// The six sources feeding one snapshot.
pub struct Sources {
    pub cpu_name: Box<dyn Source<Output = String>>,
    pub cpu_temperature: Box<dyn Source<Output = f64>>,
    pub cpu_cores: Box<dyn Source<Output = Vec<CoreStat>>>,
    pub memory: Box<dyn Source<Output = Usage>>,
    pub storage: Box<dyn Source<Output = Vec<PartitionUsage>>>,
    pub gpu: Box<dyn Source<Output = Vec<GpuEntry>>>,
}

impl Sources {
    pub fn from_config(config: &AppConfig) -> Self {
        let gpu: Box<dyn Source<Output = Vec<GpuEntry>>> = if config.gpu.enabled {
            Box::new(GpuSource::new(
                &config.gpu.command,
                Duration::from_millis(config.gpu.timeout_ms),
            ))
        } else {
            Box::new(Disabled::<Vec<GpuEntry>>::new(gpu::NAME))
        };
        Self {
            cpu_name: Box::new(CpuNameSource::new(&config.sensors.cpuinfo_path)),
            cpu_temperature: Box::new(CpuTemperatureSource::new(&config.sensors)),
            cpu_cores: Box::new(CpuCoresSource::new(Duration::from_millis(
                config.monitoring.cpu_sample_window_ms,
            ))),
            memory: Box::new(MemorySource::new()),
            storage: Box::new(StorageSource::new()),
            gpu,
        }
    }
}
