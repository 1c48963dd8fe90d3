// Model serialization tests (JSON camelCase, unavailable marker)

use hwpulse::models::*;

#[test]
fn test_snapshot_serialization_camel_case() {
    let mut snapshot = Snapshot::unavailable(12345);
    snapshot.cpu_temperature_celsius = Reading::Available(55.0);
    snapshot.per_core = Reading::Available(vec![CoreStat {
        index: 0,
        utilization_percent: 10.0,
        frequency_ghz: 3.5,
    }]);
    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(json.contains("\"cpuTemperatureCelsius\""));
    assert!(json.contains("\"perCore\""));
    assert!(json.contains("\"frequencyGhz\""));
    assert!(json.contains("\"gpus\":{\"status\":\"unavailable\"}"));
    let back: Snapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snapshot);
}

#[test]
fn test_usage_from_totals() {
    let usage = Usage::from_totals(512, 1024);
    assert_eq!(usage.used_percent, Reading::Available(50.0));

    let empty = Usage::from_totals(0, 0);
    assert_eq!(empty.used_percent, Reading::Unavailable);
}

#[test]
fn test_usage_percent_never_exceeds_100() {
    let usage = Usage::from_totals(2048, 1024);
    assert_eq!(usage.used_percent, Reading::Available(100.0));
}

#[test]
fn test_partition_with_unavailable_usage_serializes() {
    let p = PartitionUsage {
        device_name: "/dev/sdb1".into(),
        mount_point: "/mnt/usb".into(),
        file_system: "vfat".into(),
        usage: Reading::Unavailable,
    };
    let json = serde_json::to_string(&p).unwrap();
    assert!(json.contains("\"deviceName\":\"/dev/sdb1\""));
    assert!(json.contains("\"usage\":{\"status\":\"unavailable\"}"));
}

#[test]
fn test_gpu_entry_serialization() {
    let gpu = hwpulse::sources::parse_gpu_line("RTX 4090, 535.86, 10, 5, 24576, 20480, 4096, 62")
        .unwrap();
    let json = serde_json::to_string(&gpu).unwrap();
    assert!(json.contains("\"driverVersion\":\"535.86\""));
    assert!(json.contains("\"totalMemoryMb\":24576"));
    let back: GpuEntry = serde_json::from_str(&json).unwrap();
    assert_eq!(back, gpu);
}

#[test]
fn test_unavailable_sections_counts_failed_fields() {
    let mut snapshot = Snapshot::unavailable(0);
    assert_eq!(snapshot.unavailable_sections(), 6);
    snapshot.ram = Reading::Available(Usage::from_totals(1, 2));
    snapshot.gpus = Reading::Available(vec![]);
    assert_eq!(snapshot.unavailable_sections(), 4);
}

#[test]
fn test_reading_conversions() {
    let r: Reading<u32> = Some(3).into();
    assert_eq!(r, Reading::Available(3));
    let r: Reading<u32> = Err::<u32, &str>("boom").into();
    assert!(!r.is_available());
    assert_eq!(Reading::Available(2).map(|v| v * 10), Reading::Available(20));
    assert_eq!(Reading::<u32>::default(), Reading::Unavailable);
}
