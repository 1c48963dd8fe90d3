// GPU status via nvidia-smi, run as an external process and parsed from CSV.

use super::Source;
use crate::error::SourceError;
use crate::models::{GpuEntry, Reading, percent_of};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::instrument;

pub(super) const NAME: &str = "gpu";

/// Fields requested from the tool, in output column order.
pub const GPU_QUERY_FIELDS: [&str; 8] = [
    "name",
    "driver_version",
    "utilization.gpu",
    "utilization.memory",
    "memory.total",
    "memory.free",
    "memory.used",
    "temperature.gpu",
];

/// An external command treated as a data provider: run with a timeout, return
/// trimmed stdout on success.
#[derive(Debug, Clone)]
pub struct ExternalTool {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ExternalTool {
    pub fn new<I, S>(program: impl Into<String>, args: I, timeout: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            timeout,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Missing binary, non-zero exit, timeout and empty output all map to
    /// `SourceError::ToolInvocation`.
    pub async fn run(&self) -> Result<String, SourceError> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(self.failure(e.to_string())),
            Err(_) => {
                return Err(self.failure(format!("timed out after {:?}", self.timeout)));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.failure(format!("{} ({})", output.status, stderr.trim())));
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if stdout.is_empty() {
            return Err(self.failure("empty output"));
        }
        Ok(stdout)
    }

    fn failure(&self, reason: impl Into<String>) -> SourceError {
        SourceError::ToolInvocation {
            tool: self.program.clone(),
            reason: reason.into(),
        }
    }
}

pub struct GpuSource {
    tool: ExternalTool,
}

impl GpuSource {
    /// `command` is the nvidia-smi executable (name on PATH or absolute path).
    pub fn new(command: &str, timeout: Duration) -> Self {
        let args = [
            format!("--query-gpu={}", GPU_QUERY_FIELDS.join(",")),
            "--format=csv,noheader,nounits".to_string(),
        ];
        Self::with_tool(ExternalTool::new(command, args, timeout))
    }

    pub fn with_tool(tool: ExternalTool) -> Self {
        Self { tool }
    }

    #[instrument(skip(self), fields(source = "gpu", tool = %self.tool.program()))]
    async fn read_gpu_info(&self) -> Result<Vec<GpuEntry>, SourceError> {
        let stdout = self.tool.run().await?;
        parse_gpu_output(&stdout)
    }
}

impl Source for GpuSource {
    type Output = Vec<GpuEntry>;

    fn name(&self) -> &'static str {
        NAME
    }

    fn query(&self) -> BoxFuture<'_, Result<Vec<GpuEntry>, SourceError>> {
        self.read_gpu_info().boxed()
    }
}

/// Parses every non-empty line, skipping malformed ones. Fails only when no line
/// is well-formed.
pub fn parse_gpu_output(stdout: &str) -> Result<Vec<GpuEntry>, SourceError> {
    let mut skipped = 0usize;
    let gpus: Vec<GpuEntry> = stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match parse_gpu_line(line) {
            Ok(gpu) => Some(gpu),
            Err(e) => {
                tracing::debug!(error = %e, line, "skipping GPU line");
                skipped += 1;
                None
            }
        })
        .collect();

    if gpus.is_empty() {
        return Err(SourceError::parse(
            "gpu output",
            format!("no well-formed lines ({} skipped)", skipped),
        ));
    }
    Ok(gpus)
}

/// One CSV line in `GPU_QUERY_FIELDS` order, fields separated by ", ".
pub fn parse_gpu_line(line: &str) -> Result<GpuEntry, SourceError> {
    let fields: Vec<&str> = line.trim().split(", ").collect();
    if fields.len() != GPU_QUERY_FIELDS.len() {
        return Err(SourceError::parse(
            "gpu line",
            format!(
                "expected {} fields, got {}",
                GPU_QUERY_FIELDS.len(),
                fields.len()
            ),
        ));
    }

    let total_memory_mb = parse_mb(fields[4], "memory.total")?;
    let free_memory_mb = parse_mb(fields[5], "memory.free")?;
    let used_memory_mb = parse_mb(fields[6], "memory.used")?;

    Ok(GpuEntry {
        name: fields[0].trim().to_string(),
        driver_version: fields[1].trim().to_string(),
        utilization_gpu_percent: parse_metric(fields[2]),
        utilization_memory_percent: parse_metric(fields[3]),
        total_memory_mb,
        free_memory_mb,
        used_memory_mb,
        memory_used_percent: percent_of(used_memory_mb as f64, total_memory_mb as f64),
        temperature_celsius: parse_metric(fields[7]),
    })
}

fn parse_mb(field: &str, what: &'static str) -> Result<u64, SourceError> {
    field
        .trim()
        .parse::<u64>()
        .map_err(|e| SourceError::parse(what, format!("{:?}: {}", field, e)))
}

/// Numeric metric the tool may report as "[N/A]" on some boards.
fn parse_metric(field: &str) -> Reading<f64> {
    field.trim().parse::<f64>().ok().filter(|v| v.is_finite()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RTX_4090: &str = "RTX 4090, 535.86, 10, 5, 24576, 20480, 4096, 62";

    #[test]
    fn parse_gpu_line_reads_all_fields() {
        let gpu = parse_gpu_line(RTX_4090).unwrap();
        assert_eq!(gpu.name, "RTX 4090");
        assert_eq!(gpu.driver_version, "535.86");
        assert_eq!(gpu.utilization_gpu_percent, Reading::Available(10.0));
        assert_eq!(gpu.utilization_memory_percent, Reading::Available(5.0));
        assert_eq!(gpu.total_memory_mb, 24576);
        assert_eq!(gpu.free_memory_mb, 20480);
        assert_eq!(gpu.used_memory_mb, 4096);
        assert_eq!(gpu.temperature_celsius, Reading::Available(62.0));
        let pct = gpu.memory_used_percent.value().unwrap();
        assert!((pct - 16.6667).abs() < 0.01, "got {pct}");
    }

    #[test]
    fn parse_gpu_line_rejects_wrong_field_count() {
        let err = parse_gpu_line("RTX 4090, 535.86, 10").unwrap_err();
        assert!(matches!(err, SourceError::Parse { .. }));
    }

    #[test]
    fn parse_gpu_line_rejects_non_numeric_memory() {
        assert!(parse_gpu_line("RTX 4090, 535.86, 10, 5, lots, 20480, 4096, 62").is_err());
    }

    #[test]
    fn parse_gpu_line_tolerates_na_metrics() {
        let gpu =
            parse_gpu_line("Tesla T4, 470.57, [N/A], [N/A], 15360, 15000, 360, [N/A]").unwrap();
        assert_eq!(gpu.utilization_gpu_percent, Reading::Unavailable);
        assert_eq!(gpu.temperature_celsius, Reading::Unavailable);
        assert_eq!(gpu.used_memory_mb, 360);
    }

    #[test]
    fn parse_gpu_line_zero_total_memory() {
        let gpu = parse_gpu_line("Virtual GPU, 1.0, 0, 0, 0, 0, 0, 30").unwrap();
        assert_eq!(gpu.memory_used_percent, Reading::Unavailable);
    }

    #[test]
    fn parse_gpu_output_skips_malformed_lines() {
        let out = format!("{RTX_4090}\ngarbage line\r\nRTX 3060, 535.86, 1, 1, 12288, 12000, 288, 41\r\n");
        let gpus = parse_gpu_output(&out).unwrap();
        assert_eq!(gpus.len(), 2);
        assert_eq!(gpus[1].name, "RTX 3060");
        assert_eq!(gpus[1].temperature_celsius, Reading::Available(41.0));
    }

    #[test]
    fn parse_gpu_output_all_malformed_is_error() {
        assert!(parse_gpu_output("oops\nstill, wrong").is_err());
        assert!(parse_gpu_output("").is_err());
    }
}
