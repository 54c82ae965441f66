use std::process::ExitCode;

use evorun_core::{format_score, FactoryRegistry};

fn main() -> ExitCode {
    // Engine crates embed evorun_cli::run with a populated registry; the
    // stock binary ships with none.
    match evorun_cli::run(FactoryRegistry::new()) {
        Ok(final_fitness) => {
            println!("{}", format_score(final_fitness));
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("evorun: {err:#}");
            ExitCode::FAILURE
        }
    }
}
