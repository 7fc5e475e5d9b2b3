mod args;
mod error;
mod logging;

use std::process::ExitCode;

use clap::Parser;
use sitekit_build::build_tree;
use tracing::{error, info};

use crate::args::Cli;
use crate::error::CliError;
use crate::logging::init_logging;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_level(), cli.log_format) {
        eprintln!("[ERROR] {e}");
        return ExitCode::from(e.exit_code());
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Build failed: {e}");
            eprintln!("[ERROR] {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let spec_options = cli.to_build_options();
    info!(
        "Building {} -> {}",
        spec_options.dir_source.display(),
        spec_options.dir_output.display()
    );

    let report = build_tree(&spec_options)?;
    for spec_error in &report.errors {
        info!(
            "Copied unminified: {} ({})",
            spec_error.path.display(),
            spec_error.exception
        );
    }

    println!("Build finished successfully.");
    println!(
        "Files ready for upload are in '{}'.",
        spec_options.dir_output.display()
    );
    println!("{report}");
    Ok(())
}
