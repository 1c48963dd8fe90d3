use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub sensors: SensorsConfig,
    #[serde(default)]
    pub gpu: GpuConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    /// Delay between the end of one refresh cycle and the start of the next.
    pub refresh_interval_ms: u64,
    /// Blocking window for the per-core utilization sample.
    pub cpu_sample_window_ms: u64,
    /// How often to log refresh stats at INFO level.
    pub stats_log_interval_secs: u64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 100,
            cpu_sample_window_ms: 1000,
            stats_log_interval_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SensorsConfig {
    pub cpuinfo_path: String,
    pub hwmon_dir: String,
    /// hwmon chip names accepted as the CPU sensor, in preference order.
    pub temperature_chips: Vec<String>,
    /// Fixed sensor file; skips hwmon discovery when set.
    pub temperature_path: Option<String>,
}

impl Default for SensorsConfig {
    fn default() -> Self {
        Self {
            cpuinfo_path: "/proc/cpuinfo".into(),
            hwmon_dir: "/sys/class/hwmon".into(),
            temperature_chips: ["k10temp", "coretemp", "zenpower", "cpu_thermal", "acpitz"]
                .into_iter()
                .map(String::from)
                .collect(),
            temperature_path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GpuConfig {
    pub enabled: bool,
    pub command: String,
    pub timeout_ms: u64,
}

impl Default for GpuConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: "nvidia-smi".into(),
            timeout_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Clear the terminal before each text redraw.
    pub clear_screen: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            clear_screen: true,
        }
    }
}

impl AppConfig {
    /// Loads `$CONFIG_FILE` (must exist), else `config.toml` if present, else defaults.
    pub fn load() -> anyhow::Result<Self> {
        if let Ok(path) = std::env::var("CONFIG_FILE") {
            let s = std::fs::read_to_string(&path)
                .map_err(|e| anyhow::anyhow!("config file {}: {}", path, e))?;
            return Self::load_from_str(&s);
        }
        let default_path = Path::new("config.toml");
        if default_path.exists() {
            let s = std::fs::read_to_string(default_path)?;
            return Self::load_from_str(&s);
        }
        tracing::info!("no config.toml found, using defaults");
        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.monitoring.refresh_interval_ms > 0,
            "monitoring.refresh_interval_ms must be > 0, got {}",
            self.monitoring.refresh_interval_ms
        );
        anyhow::ensure!(
            self.monitoring.cpu_sample_window_ms > 0,
            "monitoring.cpu_sample_window_ms must be > 0, got {}",
            self.monitoring.cpu_sample_window_ms
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        anyhow::ensure!(
            !self.sensors.cpuinfo_path.is_empty(),
            "sensors.cpuinfo_path must be non-empty"
        );
        anyhow::ensure!(
            !self.sensors.hwmon_dir.is_empty(),
            "sensors.hwmon_dir must be non-empty"
        );
        anyhow::ensure!(
            !self.sensors.temperature_chips.is_empty(),
            "sensors.temperature_chips must list at least one chip name"
        );
        anyhow::ensure!(
            !self.gpu.command.is_empty(),
            "gpu.command must be non-empty"
        );
        anyhow::ensure!(
            self.gpu.timeout_ms > 0,
            "gpu.timeout_ms must be > 0, got {}",
            self.gpu.timeout_ms
        );
        Ok(())
    }
}
