//! Round orchestration.
//!
//! [`RoundDriver`] applies each round's file set to the virtual store, then
//! either notifies the watch registry (watch mode) or seeds a fresh build with
//! the previous handle of the round's project key (batch mode), collects the
//! round's diagnostics and emits according to the configured [`EmitPolicy`].

#![warn(missing_docs)]

pub mod driver;
pub mod error;
pub mod output;
pub mod report;

pub use driver::{DriverSettings, EmitPolicy, RoundDriver, RoundState};
pub use error::DriverError;
pub use output::DedupOutputSink;
pub use report::RoundReport;
