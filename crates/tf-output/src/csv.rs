//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `pose_snapshots.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use tf_element::ManualMode;

use crate::writer::OutputWriter;
use crate::{OutputResult, PoseSnapshotRow, TickSummaryRow};

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut snapshots = Writer::from_path(dir.join("pose_snapshots.csv"))?;
        snapshots.write_record([
            "element_id",
            "tick",
            "x",
            "y",
            "z",
            "speed_mps",
            "mode",
            "geometry_valid",
        ])?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(["tick", "sim_time_ms", "updated_elements"])?;

        Ok(Self {
            snapshots,
            summaries,
            finished: false,
        })
    }
}

fn mode_str(mode: ManualMode) -> &'static str {
    match mode {
        ManualMode::Autonomous => "autonomous",
        ManualMode::Manual => "manual",
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[PoseSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.element_id.to_string(),
                row.tick.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.z.to_string(),
                row.speed_mps.to_string(),
                mode_str(row.mode).to_string(),
                (row.geometry_valid as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.sim_time_ms.to_string(),
            row.updated_elements.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
