//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// Module containing the implementation of the `detect` command.
/// This command finds the cuts in a video and optionally writes them as JSON.
pub mod detect;
pub mod probe;
