//! rfcl - Metadata ledger and timeline generator for RFC documents

use std::process::ExitCode;

use rfcledger::ui::output;

fn main() -> ExitCode {
    match rfcledger::cli::run() {
        Ok(code) => code,
        Err(err) => {
            output::error(format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}
