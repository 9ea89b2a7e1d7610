//! Monkey command-line driver.

mod args;
mod driver;
mod error;
mod repl;

use args::ExecutionMode;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mode = match args::parse_args(std::env::args().skip(1)) {
        Ok(mode) => mode,
        Err(err) => {
            eprintln!("monkey: {}", err);
            eprint!("{}", args::USAGE);
            return ExitCode::from(error::EXIT_USAGE_ERROR);
        }
    };

    match mode {
        ExecutionMode::Build(path) => driver::build_file(&path),
        ExecutionMode::RunBytecode(path) => driver::run_bytecode(&path),
        ExecutionMode::Disassemble(path) => driver::disassemble_file(&path),
        ExecutionMode::Script(path) => driver::run_script(&path),
        ExecutionMode::Repl => repl::start(),
        ExecutionMode::PrintHelp => {
            print!("{}", args::USAGE);
            ExitCode::SUCCESS
        }
        ExecutionMode::PrintVersion => {
            println!("Monkey {}", monkey_core::VERSION);
            ExitCode::SUCCESS
        }
    }
}
