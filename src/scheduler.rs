// Refresh loop: collect a snapshot, hand it to the renderer, wait, repeat.
// Cycles never overlap; the delay is measured from the end of the previous cycle.

use crate::aggregator::SnapshotAggregator;
use crate::render::Renderer;
use tokio::sync::oneshot;
use tokio::time::{Duration, Instant, sleep};
use tracing::instrument;

pub struct Scheduler {
    aggregator: SnapshotAggregator,
    renderer: Box<dyn Renderer>,
    interval: Duration,
    stats_log_interval: Duration,
}

impl Scheduler {
    pub fn new(
        aggregator: SnapshotAggregator,
        renderer: Box<dyn Renderer>,
        interval: Duration,
    ) -> Self {
        Self {
            aggregator,
            renderer,
            interval,
            stats_log_interval: Duration::from_secs(60),
        }
    }

    /// How often to log refresh stats at INFO level.
    pub fn with_stats_log_interval(mut self, every: Duration) -> Self {
        self.stats_log_interval = every;
        self
    }

    /// Runs until `shutdown_rx` fires (or its sender is dropped). A cycle already
    /// sampling when the signal arrives is completed and published first.
    #[instrument(name = "scheduler", level = "debug", skip_all)]
    pub async fn run(mut self, mut shutdown_rx: oneshot::Receiver<()>) {
        let mut cycles_published: u64 = 0;
        let mut render_failures: u64 = 0;
        let mut last_stats_log = Instant::now();

        loop {
            let started = Instant::now();
            let snapshot = self.aggregator.collect().await;
            let unavailable_sections = snapshot.unavailable_sections();

            if let Err(e) = self.renderer.render(snapshot) {
                render_failures += 1;
                tracing::warn!(error = %e, operation = "render", "renderer failed");
            } else {
                cycles_published += 1;
            }
            tracing::debug!(
                cycle_ms = started.elapsed().as_millis() as u64,
                unavailable_sections,
                "cycle published"
            );

            if last_stats_log.elapsed() >= self.stats_log_interval {
                tracing::info!(
                    cycles_published,
                    render_failures,
                    unavailable_sections,
                    "refresh stats"
                );
                last_stats_log = Instant::now();
            }

            tokio::select! {
                _ = sleep(self.interval) => {}
                _ = &mut shutdown_rx => {
                    tracing::debug!(cycles_published, "Scheduler shutting down");
                    break;
                }
            }
        }
    }
}

pub fn spawn(
    scheduler: Scheduler,
    shutdown_rx: oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(scheduler.run(shutdown_rx))
}
