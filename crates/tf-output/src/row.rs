//! Plain data row types written by output backends.

use tf_element::ManualMode;

/// A snapshot of one element's pose at a given tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseSnapshotRow {
    pub element_id: u64,
    pub tick:       u64,
    pub x:          f64,
    pub y:          f64,
    pub z:          f64,
    pub speed_mps:  f64,
    /// Control mode at snapshot time; manual elements hold externally
    /// supplied poses.
    pub mode:           ManualMode,
    /// `false` when the last relocalization failed and the bounding
    /// polygon is stale.
    pub geometry_valid: bool,
}

/// Summary statistics for one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:             u64,
    pub sim_time_ms:      u64,
    /// Elements advanced by the sweep this tick (manual elements excluded).
    pub updated_elements: u64,
}
