use anyhow::Result;
use hwpulse::config::OutputFormat;
use hwpulse::render::{JsonLinesRenderer, Renderer, TextRenderer};
use hwpulse::*;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the report.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let app_config = config::AppConfig::load()?;
    tracing::info!(
        refresh_interval_ms = app_config.monitoring.refresh_interval_ms,
        cpu_sample_window_ms = app_config.monitoring.cpu_sample_window_ms,
        gpu_enabled = app_config.gpu.enabled,
        "{} starting",
        version::banner()
    );

    let aggregator =
        aggregator::SnapshotAggregator::new(sources::Sources::from_config(&app_config));
    let renderer: Box<dyn Renderer> = match app_config.output.format {
        OutputFormat::Text => Box::new(TextRenderer::new(
            std::io::stdout(),
            app_config.output.clear_screen,
        )),
        OutputFormat::Json => Box::new(JsonLinesRenderer::new(std::io::stdout())),
    };
    let scheduler = scheduler::Scheduler::new(
        aggregator,
        renderer,
        Duration::from_millis(app_config.monitoring.refresh_interval_ms),
    )
    .with_stats_log_interval(Duration::from_secs(
        app_config.monitoring.stats_log_interval_secs,
    ));

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let mut scheduler_handle = scheduler::spawn(scheduler, shutdown_rx);

    tokio::select! {
        result = &mut scheduler_handle => {
            // The loop only ends on shutdown; getting here means the task panicked.
            result?;
        }
        _ = shutdown_signal() => {
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
            scheduler_handle.await?;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm = match tokio::signal::unix::signal(
            tokio::signal::unix::SignalKind::terminate(),
        ) {
            Ok(s) => s,
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
