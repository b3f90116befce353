//! Implementation of the 'probe' subcommand.

use crate::cli::ProbeArgs;
use crate::commands::detect::resolve_input_file;
use crate::error::CliResult;
use crate::output;

use cutonly_core::{StreamProperties, input_display_name, probe_stream};

/// Prints the stream properties the detector will work with.
pub fn run_probe(args: ProbeArgs) -> CliResult<StreamProperties> {
    let input_path = resolve_input_file(&args.input_path)?;
    let properties = probe_stream(&input_path)?;
    log::debug!("Probe result for {}: {properties:?}", input_path.display());
    output::print_stream_properties(&input_display_name(&input_path), &properties);
    Ok(properties)
}
