//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use tourguide_cli::CliError;

fn main() {
    match tourguide_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("tourguide: {err}");
            std::process::exit(1);
        }
    }
}
