//! soltpl entry point
//!
//! Parses the command line, runs the selected command and renders any error
//! with its details and suggestion before exiting with status 1.

use anyhow::Result;
use clap::Parser;
use solution_templates::cli;
use solution_templates::core::user_friendly_error;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            user_friendly_error(e).display();
            std::process::exit(1);
        }
    }
}
