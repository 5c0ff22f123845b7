// bookrip-cli/src/main.rs
//
// Entry point for the `bookrip` binary: parse arguments, set up logging and
// run the conversion. Missing prerequisites exit with status 1; books that
// fail individually do not change the exit status.

use bookrip_cli::error::report_error;
use bookrip_cli::logging::init_logging;
use bookrip_cli::{Cli, run_convert};
use clap::Parser;
use std::process;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run_convert(cli) {
        report_error(&e);
        process::exit(1);
    }
}
