// cutonly-cli/src/lib.rs
//
// Library portion of the CutOnly CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, DetectArgs, ProbeArgs};
pub use commands::detect::run_detect;
pub use commands::probe::run_probe;
pub use error::{CliErrorContext, CliResult};
