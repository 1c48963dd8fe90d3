// Shared test helpers: scripted sources for the aggregator and scheduler.

#![allow(dead_code)]

use futures_util::future::BoxFuture;
use hwpulse::error::SourceError;
use hwpulse::models::{CoreStat, GpuEntry, PartitionUsage, Usage};
use hwpulse::sources::{Source, Sources};
use std::time::Duration;

/// Returns a fixed value, optionally after blocking a worker thread for `delay`.
pub struct FixedSource<T> {
    pub name: &'static str,
    pub value: T,
    pub delay: Duration,
}

impl<T: Clone + Send + Sync + 'static> Source for FixedSource<T> {
    type Output = T;

    fn name(&self) -> &'static str {
        self.name
    }

    fn query(&self) -> BoxFuture<'_, Result<T, SourceError>> {
        let value = self.value.clone();
        let delay = self.delay;
        Box::pin(async move {
            if !delay.is_zero() {
                tokio::task::spawn_blocking(move || std::thread::sleep(delay)).await?;
            }
            Ok::<T, SourceError>(value)
        })
    }
}

pub struct FailingSource<T> {
    name: &'static str,
    _t: std::marker::PhantomData<fn() -> T>,
}

impl<T: Send> Source for FailingSource<T> {
    type Output = T;

    fn name(&self) -> &'static str {
        self.name
    }

    fn query(&self) -> BoxFuture<'_, Result<T, SourceError>> {
        let name = self.name;
        Box::pin(async move { Err(SourceError::unavailable(name, "scripted failure")) })
    }
}

/// Source that panics inside its blocking task.
pub struct PanickingSource;

impl Source for PanickingSource {
    type Output = Usage;

    fn name(&self) -> &'static str {
        "memory"
    }

    fn query(&self) -> BoxFuture<'_, Result<Usage, SourceError>> {
        Box::pin(async move {
            tokio::task::spawn_blocking(|| -> Usage { panic!("sensor driver exploded") })
                .await
                .map_err(SourceError::from)
        })
    }
}

pub fn fixed<T: Clone + Send + Sync + 'static>(
    name: &'static str,
    value: T,
) -> Box<dyn Source<Output = T>> {
    Box::new(FixedSource {
        name,
        value,
        delay: Duration::ZERO,
    })
}

pub fn failing<T: Send + 'static>(name: &'static str) -> Box<dyn Source<Output = T>> {
    Box::new(FailingSource::<T> {
        name,
        _t: std::marker::PhantomData,
    })
}

pub fn sample_cores() -> Vec<CoreStat> {
    vec![
        CoreStat {
            index: 0,
            utilization_percent: 12.5,
            frequency_ghz: 3.6,
        },
        CoreStat {
            index: 1,
            utilization_percent: 40.0,
            frequency_ghz: 4.1,
        },
    ]
}

pub fn sample_gpu() -> GpuEntry {
    hwpulse::sources::parse_gpu_line("RTX 4090, 535.86, 10, 5, 24576, 20480, 4096, 62").unwrap()
}

pub fn all_failing() -> Sources {
    Sources {
        cpu_name: failing("cpu_name"),
        cpu_temperature: failing("cpu_temperature"),
        cpu_cores: failing("cpu_cores"),
        memory: failing("memory"),
        storage: failing("storage"),
        gpu: failing("gpu"),
    }
}

pub fn all_healthy() -> Sources {
    Sources {
        cpu_name: fixed("cpu_name", "AMD Ryzen 9 7950X".to_string()),
        cpu_temperature: fixed("cpu_temperature", 47.5),
        cpu_cores: fixed("cpu_cores", sample_cores()),
        memory: fixed("memory", Usage::from_totals(4 << 30, 16 << 30)),
        storage: fixed("storage", Vec::<PartitionUsage>::new()),
        gpu: fixed("gpu", vec![sample_gpu()]),
    }
}
