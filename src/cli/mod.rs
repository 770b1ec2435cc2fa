//! Command-line interface for debate-forge.
//!
//! Provides the `run` command for full debates and `check-topic` for
//! validating a topic on its own, and `graph` for printing the workflow.

mod commands;

pub use commands::{parse_cli, run, run_with_cli, Cli, Commands};
