// Plain-text report layout for terminal renderers. Every unavailable field prints "N/A".

use crate::models::{GpuEntry, PartitionUsage, Reading, Snapshot, Usage};

const SEPARATOR: &str = "_____________________________";
const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

pub fn format_report(snapshot: &Snapshot) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("CPU: {}", snapshot.cpu_name));
    match &snapshot.per_core {
        Reading::Available(cores) => {
            for core in cores {
                lines.push(format!(
                    "Core {}: | {:.1}%, | {:.2} GHz",
                    core.index, core.utilization_percent, core.frequency_ghz
                ));
            }
        }
        Reading::Unavailable => lines.push("Cores: N/A".into()),
    }
    lines.push(format!(
        "CPU Temperature: {}",
        snapshot
            .cpu_temperature_celsius
            .display_or_na(|t| format!("{:.2}°C", t))
    ));

    lines.push(SEPARATOR.into());
    match &snapshot.gpus {
        Reading::Available(gpus) => {
            lines.push("GPU INFO:".into());
            for (i, gpu) in gpus.iter().enumerate() {
                push_gpu(&mut lines, i, gpu);
            }
        }
        Reading::Unavailable => lines.push("GPU INFO: N/A".into()),
    }

    lines.push(SEPARATOR.into());
    lines.push(format!(
        "RAM Usage: {}",
        snapshot.ram.display_or_na(format_usage)
    ));

    lines.push(SEPARATOR.into());
    match &snapshot.storage {
        Reading::Available(partitions) => {
            lines.push("Storage Info:".into());
            for partition in partitions {
                push_partition(&mut lines, partition);
            }
        }
        Reading::Unavailable => lines.push("Storage Info: N/A".into()),
    }

    lines.join("\n")
}

fn push_gpu(lines: &mut Vec<String>, i: usize, gpu: &GpuEntry) {
    lines.push(format!("GPU {}:", i + 1));
    lines.push(format!("  Name: {}", gpu.name));
    lines.push(format!("  Driver Version: {}", gpu.driver_version));
    lines.push(format!(
        "  GPU Usage: {}",
        gpu.utilization_gpu_percent.display_or_na(|p| format!("{:.0}%", p))
    ));
    lines.push(format!(
        "  GPU Memory Usage: {}",
        gpu.memory_used_percent.display_or_na(|p| format!("{:.2}%", p))
    ));
    lines.push(format!("  Total Memory: {} MB", gpu.total_memory_mb));
    lines.push(format!("  Free Memory: {} MB", gpu.free_memory_mb));
    lines.push(format!("  Used Memory: {} MB", gpu.used_memory_mb));
    lines.push(format!(
        "  GPU Temperature: {}",
        gpu.temperature_celsius.display_or_na(|t| format!("{:.0}°C", t))
    ));
}

fn push_partition(lines: &mut Vec<String>, partition: &PartitionUsage) {
    lines.push(format!(
        "  Partition: {} ({})",
        partition.device_name, partition.mount_point
    ));
    lines.push(format!(
        "    Usage: {}",
        partition.usage.display_or_na(format_usage)
    ));
}

fn format_usage(usage: &Usage) -> String {
    format!(
        "{} ({:.2}GB used / {:.2}GB)",
        usage.used_percent.display_or_na(|p| format!("{:.2}%", p)),
        usage.used_bytes as f64 / GIB,
        usage.total_bytes as f64 / GIB
    )
}
