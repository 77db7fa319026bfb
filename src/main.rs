//! Binary entrypoint for the `flakeid` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // A missing .env file is fine; FLAKEID_* may come from the real environment.
    let _ = dotenvy::dotenv();

    // Recording is handled in commands::dispatch via FLAKEID_RECORD=<path>.
    match flakeid::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
