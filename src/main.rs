//! GlobalMarket CLI entry point
//!
//! All logic is delegated to the CLI module. This file only maps the
//! outcome to a process exit status:
//! - 0: every document accepted
//! - 2: at least one document rejected
//! - 1: configuration, input, or schema error (printed to stderr)

use globalmarket::cli;

fn main() {
    match cli::run() {
        Ok(status) => std::process::exit(status),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
