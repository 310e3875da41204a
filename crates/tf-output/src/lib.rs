//! `tf-output` — simulation output writers for the traffic framework.
//!
//! The CSV backend creates two files in the configured output directory:
//!
//! | File                 | Contents                                |
//! |----------------------|-----------------------------------------|
//! | `pose_snapshots.csv` | one row per element per snapshot tick   |
//! | `tick_summaries.csv` | one row per simulated tick              |
//!
//! Writers implement [`OutputWriter`] and are driven by
//! [`SnapshotObserver`], which implements `tf_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tf_output::{CsvWriter, SnapshotObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output")).unwrap();
//! let mut obs = SnapshotObserver::new(writer, &config);
//! scenario.run(&mut obs);
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SnapshotObserver;
pub use row::{PoseSnapshotRow, TickSummaryRow};
pub use writer::OutputWriter;
