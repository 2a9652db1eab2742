//! dupeprune command-line entry point.

use clap::Parser;
use dupeprune::{
    cli::Cli,
    error::{exit_code_for, StructuredError},
};

fn main() {
    let cli = Cli::parse();
    let json_errors = cli.json_errors;

    match dupeprune::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = exit_code_for(&err);

            let json = json_errors
                .then(|| serde_json::to_string_pretty(&StructuredError::new(&err, exit_code)).ok())
                .flatten();
            match json {
                Some(json) => eprintln!("{json}"),
                None => eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err),
            }

            std::process::exit(exit_code.as_i32());
        }
    }
}
