pub mod generate;
pub mod summary;

use crate::cli::SelectionArgs;
use crate::config::{PartialRunConfig, RunConfig};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use cathmda::core::io::table::TableRowSource;
use cathmda::core::io::writers::WriteMode;
use cathmda::engine::progress::ProgressReporter;
use cathmda::workflows;
use cathmda::workflows::generate::GenerateResult;
use tracing::{info, warn};

/// Resolves configuration, loads the prediction table and runs the generate workflow.
pub(crate) fn collect(
    args: &SelectionArgs,
    write_mode: Option<WriteMode>,
    quiet: bool,
) -> Result<(RunConfig, GenerateResult)> {
    info!("Merging configuration from file and CLI arguments...");
    let config = PartialRunConfig::load(args)?.merge_with_cli(args, write_mode)?;

    info!("Loading prediction table from {:?}", &args.input);
    let mut source = TableRowSource::load(&args.input).map_err(|e| CliError::FileParsing {
        path: args.input.clone(),
        source: e.into(),
    })?;

    let progress_handler = if quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let result = workflows::generate::run(&mut source, &config.generate, &reporter)?;
    if result.truncated {
        warn!(
            "Stopped after {} rows (max_rows); results are incomplete.",
            result.rows_processed
        );
    }
    println!(
        "Collected {} proteins with {} domains ({} rows processed).",
        result.registry.len(),
        result.registry.count_domains(),
        result.rows_processed
    );
    Ok((config, result))
}
