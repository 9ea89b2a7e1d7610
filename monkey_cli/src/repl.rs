//! Interactive read-compile-run loop.
//!
//! The REPL threads one symbol table, constant pool and globals array
//! through every line, so definitions persist across inputs. Every error
//! class recovers by resetting to the prompt.

use crate::error::{report_compile_error, report_parse_errors, report_runtime_error};
use monkey_compiler::{Compiler, SymbolTable};
use monkey_core::Value;
use monkey_parser::parse;
use monkey_vm::{VirtualMachine, new_globals};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

/// Prompt printed before each input line.
const PROMPT: &str = ">> ";

/// Run the REPL until end of input.
pub fn start() -> ExitCode {
    println!("Monkey {}", monkey_core::VERSION);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    let mut symbols = SymbolTable::new();
    let mut constants: Vec<Value> = Vec::new();
    let mut globals = new_globals();
    let mut line = String::new();

    loop {
        print!("{}", PROMPT);
        let _ = stdout.flush();

        line.clear();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let source = line.trim();
        if source.is_empty() {
            continue;
        }

        let program = match parse(source) {
            Ok(program) => program,
            Err(errors) => {
                report_parse_errors(&errors, source, "<repl>");
                continue;
            }
        };

        let mut compiler = Compiler::with_state(symbols, constants);
        let compiled = compiler.compile(&program);
        let (table, bytecode) = compiler.into_state();
        symbols = table;
        constants = bytecode.constants.clone();

        if let Err(err) = compiled {
            report_compile_error(&err, source, "<repl>");
            continue;
        }

        let mut vm = VirtualMachine::with_globals(bytecode, globals);
        let outcome = vm.run();
        match &outcome {
            Ok(()) => println!("{}", vm.last_popped_element().inspect()),
            Err(err) => report_runtime_error(err),
        }
        globals = vm.into_globals();
    }

    ExitCode::SUCCESS
}
