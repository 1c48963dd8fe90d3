// RAM usage via sysinfo

use super::Source;
use crate::error::SourceError;
use crate::models::Usage;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use std::sync::{Arc, Mutex};
use sysinfo::System;
use tracing::instrument;

pub struct MemorySource {
    sys: Arc<Mutex<System>>,
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySource {
    pub fn new() -> Self {
        Self {
            sys: Arc::new(Mutex::new(System::new())),
        }
    }

    #[instrument(skip(self), fields(source = "memory"))]
    async fn read_ram_info(&self) -> Result<Usage, SourceError> {
        let sys = self.sys.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys.lock().map_err(|e| {
                SourceError::unavailable("memory", format!("sysinfo lock poisoned: {}", e))
            })?;
            sys.refresh_memory();

            let total = sys.total_memory();
            let used = total.saturating_sub(sys.available_memory());
            Ok(Usage::from_totals(used, total))
        })
        .await?
    }
}

impl Source for MemorySource {
    type Output = Usage;

    fn name(&self) -> &'static str {
        "memory"
    }

    fn query(&self) -> BoxFuture<'_, Result<Usage, SourceError>> {
        self.read_ram_info().boxed()
    }
}
