// Renderers: consumers of one snapshot per refresh cycle.

use crate::models::Snapshot;
use crate::report::format_report;
use std::io::Write;
use tokio::sync::broadcast;

/// ANSI: clear screen, cursor home.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Receives each snapshot by value and redraws whatever surface it owns.
pub trait Renderer: Send {
    fn render(&mut self, snapshot: Snapshot) -> anyhow::Result<()>;
}

/// Text report for a terminal (or any writer), optionally redrawn in place.
pub struct TextRenderer<W> {
    out: W,
    clear_screen: bool,
}

impl<W: Write + Send> TextRenderer<W> {
    pub fn new(out: W, clear_screen: bool) -> Self {
        Self { out, clear_screen }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Renderer for TextRenderer<W> {
    fn render(&mut self, snapshot: Snapshot) -> anyhow::Result<()> {
        if self.clear_screen {
            self.out.write_all(CLEAR_SCREEN.as_bytes())?;
        }
        writeln!(self.out, "{}", format_report(&snapshot))?;
        self.out.flush()?;
        Ok(())
    }
}

/// One JSON object per line.
pub struct JsonLinesRenderer<W> {
    out: W,
}

impl<W: Write + Send> JsonLinesRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Renderer for JsonLinesRenderer<W> {
    fn render(&mut self, snapshot: Snapshot) -> anyhow::Result<()> {
        serde_json::to_writer(&mut self.out, &snapshot)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Publishes snapshots to in-process subscribers (embedding, tests).
pub struct BroadcastRenderer {
    tx: broadcast::Sender<Snapshot>,
}

impl BroadcastRenderer {
    pub fn new(tx: broadcast::Sender<Snapshot>) -> Self {
        Self { tx }
    }
}

impl Renderer for BroadcastRenderer {
    fn render(&mut self, snapshot: Snapshot) -> anyhow::Result<()> {
        if self.tx.send(snapshot).is_err() {
            tracing::debug!(
                operation = "broadcast_snapshot",
                "No subscribers; broadcast channel has no receivers"
            );
        }
        Ok(())
    }
}
