//! `SimOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use sw_core::Tick;
use sw_sim::{SimObserver, Snapshot, TickMetrics};

use crate::row::{AgentSnapshotRow, MetricsRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes per-tick metrics and periodic agent
/// snapshots to any [`OutputWriter`] backend.
///
/// Per-agent collision counts come from the metrics of the same tick, which
/// the simulation reports before the snapshot.  A snapshot with no matching
/// metrics gets zero counts.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].  The simulation itself never sees them.
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
    rows:       u64,
    collisions: Option<(Tick, Vec<usize>)>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None, rows: 0, collisions: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Snapshot rows written so far.
    pub fn rows_written(&self) -> u64 {
        self.rows
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_metrics(&mut self, metrics: &TickMetrics) {
        self.collisions = Some((metrics.tick, metrics.agent_collisions.clone()));
        let result = self.writer.write_metrics(&MetricsRow::from(metrics));
        self.store_err(result);
    }

    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        let collisions = match &self.collisions {
            Some((tick, counts)) if *tick == snapshot.tick => counts.as_slice(),
            _ => &[],
        };
        let rows = AgentSnapshotRow::from_snapshot(snapshot, collisions);
        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            if result.is_ok() {
                self.rows += rows.len() as u64;
            }
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _last: &Snapshot) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
