//! `SnapshotObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use tf_core::{SimConfig, Tick};
use tf_element::TrafficElement;
use tf_sim::SimObserver;

use crate::row::{PoseSnapshotRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::OutputError;

/// A [`SimObserver`] that writes pose snapshots and tick summaries to any
/// [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver`
/// methods have no return value.  After the scenario run returns, check for
/// errors with [`take_error`][Self::take_error].
pub struct SnapshotObserver<W: OutputWriter> {
    writer:           W,
    tick_duration_ms: u32,
    last_error:       Option<OutputError>,
}

impl<W: OutputWriter> SnapshotObserver<W> {
    /// Create an observer backed by `writer`, using `config` for sim-time
    /// conversion.
    pub fn new(writer: W, config: &SimConfig) -> Self {
        Self {
            writer,
            tick_duration_ms: config.tick_duration_ms,
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after the run returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SnapshotObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, updated: usize) {
        let row = TickSummaryRow {
            tick:             tick.0,
            sim_time_ms:      tick.0 * self.tick_duration_ms as u64,
            updated_elements: updated as u64,
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, elements: &[TrafficElement]) {
        let rows: Vec<PoseSnapshotRow> = elements
            .iter()
            .map(|e| PoseSnapshotRow {
                element_id:     e.element_id.0,
                tick:           tick.0,
                x:              e.kinematics.position.x,
                y:              e.kinematics.position.y,
                z:              e.kinematics.position.z,
                speed_mps:      e.kinematics.velocity,
                mode:           e.manual.mode,
                geometry_valid: e.geometry.valid,
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
