// ===============================
// src/lib.rs
// ===============================
//! Realized PnL per instrument from an ordered fill log, using
//! weighted-average cost basis.
//!
//! - [`source`]    : fill log (CSV) -> `Vec<FillRecord>`
//! - [`positions`] : the accounting engine (`process`, `PnlEngine`)
//! - [`report`], [`metrics`], [`recorder`] : sinks for the engine output
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod positions;
pub mod recorder;
pub mod report;
pub mod source;

pub use domain::{CumulativeSeries, FillAction, FillRecord, InventoryState, Side};
pub use error::{AppError, Diagnostic, DiagnosticKind, SourceError};
pub use positions::{
    partition_by_instrument, process, process_partitioned, FillOutcome, PnlEngine, PnlReport, RunStats,
};
pub use source::CsvFillSource;
