// CPU sources: model name (cpuinfo), temperature (hwmon), per-core usage/frequency (sysinfo).

use super::{Source, linux};
use crate::config::SensorsConfig;
use crate::error::SourceError;
use crate::models::CoreStat;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use sysinfo::System;
use tracing::instrument;

pub struct CpuNameSource {
    cpuinfo_path: PathBuf,
}

impl CpuNameSource {
    pub fn new(cpuinfo_path: impl Into<PathBuf>) -> Self {
        Self {
            cpuinfo_path: cpuinfo_path.into(),
        }
    }

    #[instrument(skip(self), fields(source = "cpu_name"))]
    async fn read_cpu_name(&self) -> Result<String, SourceError> {
        let content = tokio::fs::read_to_string(&self.cpuinfo_path)
            .await
            .map_err(|e| SourceError::io(&self.cpuinfo_path, e))?;
        linux::parse_cpu_model(&content).ok_or_else(|| {
            SourceError::unavailable(
                "cpu_name",
                format!("no \"model name\" line in {}", self.cpuinfo_path.display()),
            )
        })
    }
}

impl Source for CpuNameSource {
    type Output = String;

    fn name(&self) -> &'static str {
        "cpu_name"
    }

    fn query(&self) -> BoxFuture<'_, Result<String, SourceError>> {
        self.read_cpu_name().boxed()
    }
}

/// CPU temperature from a hwmon input file. The path is either fixed in config or
/// discovered once and cached until a read through it fails.
pub struct CpuTemperatureSource {
    sensor: Arc<TemperatureSensor>,
}

struct TemperatureSensor {
    fixed_path: Option<PathBuf>,
    hwmon_dir: PathBuf,
    chips: Vec<String>,
    resolved: Mutex<Option<PathBuf>>,
}

impl CpuTemperatureSource {
    pub fn new(config: &SensorsConfig) -> Self {
        match &config.temperature_path {
            Some(path) => Self::with_fixed_path(path),
            None => Self::discovering(&config.hwmon_dir, config.temperature_chips.clone()),
        }
    }

    pub fn with_fixed_path(path: impl Into<PathBuf>) -> Self {
        Self::build(Some(path.into()), PathBuf::new(), Vec::new())
    }

    pub fn discovering(hwmon_dir: impl Into<PathBuf>, chips: Vec<String>) -> Self {
        Self::build(None, hwmon_dir.into(), chips)
    }

    fn build(fixed_path: Option<PathBuf>, hwmon_dir: PathBuf, chips: Vec<String>) -> Self {
        Self {
            sensor: Arc::new(TemperatureSensor {
                fixed_path,
                hwmon_dir,
                chips,
                resolved: Mutex::new(None),
            }),
        }
    }

    #[instrument(skip(self), fields(source = "cpu_temperature"))]
    async fn read_cpu_temperature(&self) -> Result<f64, SourceError> {
        let sensor = self.sensor.clone();
        tokio::task::spawn_blocking(move || sensor.read()).await?
    }
}

impl TemperatureSensor {
    fn read(&self) -> Result<f64, SourceError> {
        let path = self.resolve()?;
        let result = std::fs::read_to_string(&path)
            .map_err(|e| SourceError::io(&path, e))
            .and_then(|content| {
                linux::parse_millidegrees(&content)
                    .ok_or_else(|| SourceError::parse("millidegrees", content.trim().to_string()))
            });
        if result.is_err() {
            self.invalidate();
        }
        result
    }

    fn resolve(&self) -> Result<PathBuf, SourceError> {
        if let Some(path) = &self.fixed_path {
            return Ok(path.clone());
        }
        let mut cached = self.resolved.lock().map_err(|e| {
            SourceError::unavailable("cpu_temperature", format!("sensor cache lock poisoned: {}", e))
        })?;
        if let Some(path) = cached.as_ref() {
            return Ok(path.clone());
        }
        let path = linux::discover_cpu_sensor(&self.hwmon_dir, &self.chips)?;
        tracing::info!(path = %path.display(), "CPU temperature sensor resolved");
        *cached = Some(path.clone());
        Ok(path)
    }

    fn invalidate(&self) {
        if self.fixed_path.is_some() {
            return;
        }
        if let Ok(mut cached) = self.resolved.lock()
            && let Some(path) = cached.take()
        {
            tracing::debug!(path = %path.display(), "CPU temperature sensor cache invalidated");
        }
    }
}

impl Source for CpuTemperatureSource {
    type Output = f64;

    fn name(&self) -> &'static str {
        "cpu_temperature"
    }

    fn query(&self) -> BoxFuture<'_, Result<f64, SourceError>> {
        self.read_cpu_temperature().boxed()
    }
}

/// Per-core utilization and frequency. Each query blocks a worker thread for the
/// sample window.
pub struct CpuCoresSource {
    sys: Arc<Mutex<System>>,
    window: Duration,
}

impl CpuCoresSource {
    pub fn new(window: Duration) -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_all();
        Self {
            sys: Arc::new(Mutex::new(sys)),
            window: window.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL),
        }
    }

    #[instrument(skip(self), fields(source = "cpu_cores"))]
    async fn read_cpu_info(&self) -> Result<Vec<CoreStat>, SourceError> {
        let sys = self.sys.clone();
        let window = self.window;
        tokio::task::spawn_blocking(move || {
            let mut sys = sys.lock().map_err(|e| {
                SourceError::unavailable("cpu_cores", format!("sysinfo lock poisoned: {}", e))
            })?;
            sys.refresh_cpu_usage();
            std::thread::sleep(window);
            sys.refresh_cpu_usage();
            sys.refresh_cpu_frequency();

            let utilization: Vec<f32> = sys.cpus().iter().map(|c| c.cpu_usage()).collect();
            let frequency_mhz: Vec<u64> = sys.cpus().iter().map(|c| c.frequency()).collect();
            let cores = pair_cores(&utilization, &frequency_mhz);
            if cores.is_empty() {
                return Err(SourceError::unavailable("cpu_cores", "no logical cores reported"));
            }
            Ok(cores)
        })
        .await?
    }
}

impl Source for CpuCoresSource {
    type Output = Vec<CoreStat>;

    fn name(&self) -> &'static str {
        "cpu_cores"
    }

    fn query(&self) -> BoxFuture<'_, Result<Vec<CoreStat>, SourceError>> {
        self.read_cpu_info().boxed()
    }
}

/// Pairs per-core utilization with frequency (MHz) by index, truncating to the
/// shorter array.
pub fn pair_cores(utilization: &[f32], frequency_mhz: &[u64]) -> Vec<CoreStat> {
    utilization
        .iter()
        .zip(frequency_mhz)
        .enumerate()
        .map(|(index, (usage, mhz))| CoreStat {
            index,
            utilization_percent: f64::from(*usage).clamp(0.0, 100.0),
            frequency_ghz: *mhz as f64 / 1000.0,
        })
        .collect()
}
