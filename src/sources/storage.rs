// Mounted partitions via sysinfo; usage per mount point via statvfs. Each partition
// is queried on its own so one failing mount does not hide the rest.

use super::Source;
use crate::error::SourceError;
use crate::models::{PartitionUsage, Reading, Usage};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use std::path::Path;
use std::sync::{Arc, Mutex};
use sysinfo::Disks;
use tracing::instrument;

/// Identity of a mounted partition, independent of its usage query.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionInfo {
    pub device_name: String,
    pub mount_point: String,
    pub file_system: String,
}

pub struct StorageSource {
    disks: Arc<Mutex<Disks>>,
}

impl Default for StorageSource {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageSource {
    pub fn new() -> Self {
        Self {
            disks: Arc::new(Mutex::new(Disks::new_with_refreshed_list())),
        }
    }

    #[instrument(skip(self), fields(source = "storage"))]
    async fn read_storage_info(&self) -> Result<Vec<PartitionUsage>, SourceError> {
        let disks = self.disks.clone();
        tokio::task::spawn_blocking(move || {
            let mut disks = disks.lock().map_err(|e| {
                SourceError::unavailable("storage", format!("sysinfo disks lock poisoned: {}", e))
            })?;
            disks.refresh(true);

            let partitions: Vec<PartitionInfo> = disks
                .list()
                .iter()
                .map(|disk| PartitionInfo {
                    device_name: disk.name().to_string_lossy().into_owned(),
                    mount_point: disk.mount_point().to_string_lossy().into_owned(),
                    file_system: disk.file_system().to_string_lossy().into_owned(),
                })
                .collect();

            Ok(probe_partitions(partitions))
        })
        .await?
    }
}

impl Source for StorageSource {
    type Output = Vec<PartitionUsage>;

    fn name(&self) -> &'static str {
        "storage"
    }

    fn query(&self) -> BoxFuture<'_, Result<Vec<PartitionUsage>, SourceError>> {
        self.read_storage_info().boxed()
    }
}

/// Queries usage for each partition's mount point and builds the partition list.
pub fn probe_partitions<I>(partitions: I) -> Vec<PartitionUsage>
where
    I: IntoIterator<Item = PartitionInfo>,
{
    assemble_partitions(partitions.into_iter().map(|info| {
        let usage = mount_usage(Path::new(&info.mount_point));
        (info, usage)
    }))
}

/// `(total, available)` bytes for the filesystem mounted at `mount_point`.
#[cfg(unix)]
pub fn mount_usage(mount_point: &Path) -> Result<(u64, u64), SourceError> {
    let stat = nix::sys::statvfs::statvfs(mount_point)
        .map_err(|errno| SourceError::io(mount_point, errno.into()))?;
    let fragment = stat.fragment_size() as u64;
    Ok((
        (stat.blocks() as u64).saturating_mul(fragment),
        (stat.blocks_available() as u64).saturating_mul(fragment),
    ))
}

#[cfg(not(unix))]
pub fn mount_usage(mount_point: &Path) -> Result<(u64, u64), SourceError> {
    Err(SourceError::unavailable(
        "storage",
        format!("no per-mount usage query on this platform for {}", mount_point.display()),
    ))
}

/// Builds the partition list from per-partition `(total, available)` results, in
/// enumeration order. A failed probe becomes an entry with unavailable usage.
pub fn assemble_partitions<I>(probed: I) -> Vec<PartitionUsage>
where
    I: IntoIterator<Item = (PartitionInfo, Result<(u64, u64), SourceError>)>,
{
    probed
        .into_iter()
        .map(|(info, usage)| {
            let usage = usage.inspect_err(|e| {
                tracing::debug!(error = %e, mount = %info.mount_point, "partition usage unavailable");
            });
            PartitionUsage {
                usage: Reading::from(usage).map(|(total, available)| {
                    Usage::from_totals(total.saturating_sub(available), total)
                }),
                device_name: info.device_name,
                mount_point: info.mount_point,
                file_system: info.file_system,
            }
        })
        .collect()
}
