//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `metrics.csv` (one row per tick)
//! - `agent_snapshots.csv` (one row per agent every output interval)
//!
//! Histogram counts go into a single `opinion_bins` column joined with `;`
//! so the column set does not depend on the bin count.

use std::fs::{self, File};
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, MetricsRow, OutputResult};

pub const METRICS_HEADER: [&str; 12] = [
    "tick",
    "elapsed",
    "colliding_pairs",
    "colliding_agents",
    "obstacle_collisions",
    "reached",
    "consensus",
    "opinion_mean",
    "opinion_variance",
    "opinion_min",
    "opinion_max",
    "opinion_bins",
];

pub const SNAPSHOT_HEADER: [&str; 11] = [
    "tick",
    "agent_id",
    "x",
    "y",
    "heading",
    "opinion",
    "has_consensus",
    "reached_goal",
    "is_informed",
    "collisions",
    "color",
];

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    metrics:   Writer<File>,
    snapshots: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open (or truncate) the two CSV files in it and
    /// write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        fs::create_dir_all(dir)?;

        let mut metrics = Writer::from_path(dir.join("metrics.csv"))?;
        metrics.write_record(METRICS_HEADER)?;

        let mut snapshots = Writer::from_path(dir.join("agent_snapshots.csv"))?;
        snapshots.write_record(SNAPSHOT_HEADER)?;

        Ok(Self { metrics, snapshots, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.tick.to_string(),
                row.agent_id.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.heading.to_string(),
                row.opinion.to_string(),
                (row.has_consensus as u8).to_string(),
                (row.reached_goal as u8).to_string(),
                (row.is_informed as u8).to_string(),
                row.collisions.to_string(),
                row.color.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_metrics(&mut self, row: &MetricsRow) -> OutputResult<()> {
        let bins = row
            .opinion_bins
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(";");
        self.metrics.write_record(&[
            row.tick.to_string(),
            row.elapsed.to_string(),
            row.colliding_pairs.to_string(),
            row.colliding_agents.to_string(),
            row.obstacle_collisions.to_string(),
            row.reached.to_string(),
            row.consensus.to_string(),
            row.opinion_mean.to_string(),
            row.opinion_variance.to_string(),
            row.opinion_min.to_string(),
            row.opinion_max.to_string(),
            bins,
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.metrics.flush()?;
        self.snapshots.flush()?;
        Ok(())
    }
}
