//! Artboard headless host.
//!
//! Stands in for the UI shell: reads an editing script, feeds it through the
//! engine and reports the resulting render snapshot.

pub mod script;

pub use script::{AppError, Report, Script, Session, Step, run_file};
