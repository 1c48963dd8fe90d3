// Linux-specific helpers: /proc/cpuinfo parsing and hwmon sensor discovery.

use crate::error::SourceError;
use std::fs;
use std::path::{Path, PathBuf};

/// hwmon labels that identify the CPU package/die reading on common chips.
const PREFERRED_TEMP_LABELS: [&str; 3] = ["Tctl", "Tdie", "Package id 0"];

/// Value of the first `model name` line in cpuinfo text, trimmed.
pub fn parse_cpu_model(content: &str) -> Option<String> {
    content
        .lines()
        .find(|line| line.trim_start().starts_with("model name"))
        .and_then(|line| line.split_once(':'))
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// hwmon `tempN_input` content (millidegrees Celsius) to degrees.
pub fn parse_millidegrees(content: &str) -> Option<f64> {
    content
        .trim()
        .parse::<i64>()
        .ok()
        .map(|milli| milli as f64 / 1000.0)
}

/// Finds the CPU temperature input under `hwmon_dir`: first chip (by `chips`
/// preference) whose `name` matches, then its package/die input or lowest-numbered input.
pub(super) fn discover_cpu_sensor(
    hwmon_dir: &Path,
    chips: &[String],
) -> Result<PathBuf, SourceError> {
    let entries = fs::read_dir(hwmon_dir).map_err(|e| SourceError::io(hwmon_dir, e))?;

    let mut devices: Vec<(String, PathBuf)> = entries
        .flatten()
        .filter_map(|entry| {
            let dir = entry.path();
            let name = fs::read_to_string(dir.join("name")).ok()?;
            Some((name.trim().to_string(), dir))
        })
        .collect();
    devices.sort_by(|a, b| a.1.cmp(&b.1));

    for chip in chips {
        for (name, dir) in devices.iter().filter(|(name, _)| name == chip) {
            if let Some(input) = pick_temp_input(dir) {
                tracing::debug!(chip = %name, path = %input.display(), "hwmon sensor matched");
                return Ok(input);
            }
        }
    }

    Err(SourceError::unavailable(
        "cpu_temperature",
        format!(
            "no hwmon chip in {} matches {:?}",
            hwmon_dir.display(),
            chips
        ),
    ))
}

fn pick_temp_input(device_dir: &Path) -> Option<PathBuf> {
    let mut indices: Vec<u32> = fs::read_dir(device_dir)
        .ok()?
        .flatten()
        .filter_map(|entry| {
            let file_name = entry.file_name();
            let file_name = file_name.to_str()?;
            file_name
                .strip_prefix("temp")?
                .strip_suffix("_input")?
                .parse::<u32>()
                .ok()
        })
        .collect();
    indices.sort_unstable();

    let labelled = indices.iter().find(|n| {
        fs::read_to_string(device_dir.join(format!("temp{}_label", n)))
            .map(|label| PREFERRED_TEMP_LABELS.contains(&label.trim()))
            .unwrap_or(false)
    });

    labelled
        .or_else(|| indices.first())
        .map(|n| device_dir.join(format!("temp{}_input", n)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CPUINFO: &str = "processor\t: 0\nvendor_id\t: AuthenticAMD\ncpu family\t: 25\nmodel name\t: AMD Ryzen 9 7950X 16-Core Processor\nstepping\t: 2\n\nprocessor\t: 1\nmodel name\t: AMD Ryzen 9 7950X 16-Core Processor\n";

    #[test]
    fn parse_cpu_model_takes_first_model_name_line() {
        assert_eq!(
            parse_cpu_model(CPUINFO).as_deref(),
            Some("AMD Ryzen 9 7950X 16-Core Processor")
        );
    }

    #[test]
    fn parse_cpu_model_none_without_label() {
        assert_eq!(parse_cpu_model("processor\t: 0\nBogoMIPS\t: 48.00\n"), None);
        assert_eq!(parse_cpu_model(""), None);
    }

    #[test]
    fn parse_cpu_model_none_for_empty_value() {
        assert_eq!(parse_cpu_model("model name\t:   \n"), None);
    }

    #[test]
    fn parse_millidegrees_divides_by_1000() {
        assert_eq!(parse_millidegrees("45250\n"), Some(45.25));
        assert_eq!(parse_millidegrees("-5000"), Some(-5.0));
        assert_eq!(parse_millidegrees("hot"), None);
    }

    #[test]
    fn pick_temp_input_prefers_package_label() {
        let dir = tempfile::TempDir::new().unwrap();
        for (n, label) in [(1, "Core 0"), (2, "Package id 0")] {
            fs::write(dir.path().join(format!("temp{n}_input")), "40000").unwrap();
            fs::write(dir.path().join(format!("temp{n}_label")), label).unwrap();
        }
        let picked = pick_temp_input(dir.path()).unwrap();
        assert_eq!(picked, dir.path().join("temp2_input"));
    }

    #[test]
    fn pick_temp_input_falls_back_to_lowest_index() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("temp3_input"), "40000").unwrap();
        fs::write(dir.path().join("temp1_input"), "41000").unwrap();
        fs::write(dir.path().join("temp1_crit"), "100000").unwrap();
        let picked = pick_temp_input(dir.path()).unwrap();
        assert_eq!(picked, dir.path().join("temp1_input"));
    }
}
