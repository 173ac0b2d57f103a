//! Command Line Interface (CLI) layer for spritetrim.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) for single-sheet, batch, and
//! survey flows. It wires user-provided options to the library API exposed
//! via `spritetrim::api`.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
