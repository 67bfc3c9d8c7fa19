//! Logging setup and report formatting.

mod output;

pub use output::{setup_output, write_report};
