//! Drivers for the build, run and disassemble modes.

use crate::error::{
    EXIT_ERROR, report_compile_error, report_image_error, report_parse_errors,
    report_runtime_error,
};
use monkey_compiler::compiler::Bytecode;
use monkey_compiler::{Compiler, code, image};
use monkey_parser::parse;
use monkey_vm::VirtualMachine;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

/// Compile `-build <path>` and write `<basename>.mnc`.
pub fn build_file(path: &Path) -> ExitCode {
    let Some(source) = read_source(path) else {
        return ExitCode::from(EXIT_ERROR);
    };
    let Some(bytecode) = compile_source(&source, path) else {
        return ExitCode::from(EXIT_ERROR);
    };

    let output = image::output_path(path);
    match image::write_file(&output, &bytecode) {
        Ok(()) => {
            println!("wrote {}", output.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            report_image_error(&err, &output);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Compile and run a source file.
pub fn run_script(path: &Path) -> ExitCode {
    let Some(source) = read_source(path) else {
        return ExitCode::from(EXIT_ERROR);
    };
    let Some(bytecode) = compile_source(&source, path) else {
        return ExitCode::from(EXIT_ERROR);
    };
    execute(bytecode)
}

/// Load and run a compiled bytecode image.
pub fn run_bytecode(path: &Path) -> ExitCode {
    match image::read_file(path) {
        Ok(bytecode) => execute(bytecode),
        Err(err) => {
            report_image_error(&err, path);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Print a bytecode image's disassembly and constant pool.
pub fn disassemble_file(path: &Path) -> ExitCode {
    let bytecode = match image::read_file(path) {
        Ok(bytecode) => bytecode,
        Err(err) => {
            report_image_error(&err, path);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    print!("{}", code::disassemble(&bytecode.instructions));

    if !bytecode.constants.is_empty() {
        println!("\nConstants:");
        for (index, constant) in bytecode.constants.iter().enumerate() {
            println!("{:4}: {}", index, constant.inspect());
        }
    }

    ExitCode::SUCCESS
}

/// Read a source file, reporting failures.
fn read_source(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(source) => Some(source),
        Err(err) => {
            eprintln!("monkey: {}: {}", path.display(), err);
            None
        }
    }
}

/// Parse and compile, reporting every error. Parse errors skip the
/// compile pass entirely.
fn compile_source(source: &str, path: &Path) -> Option<Bytecode> {
    let filename = path.display().to_string();

    let program = match parse(source) {
        Ok(program) => program,
        Err(errors) => {
            report_parse_errors(&errors, source, &filename);
            return None;
        }
    };

    let mut compiler = Compiler::new();
    if let Err(err) = compiler.compile(&program) {
        report_compile_error(&err, source, &filename);
        return None;
    }
    Some(compiler.into_bytecode())
}

/// Run bytecode to completion. Script output happens through the
/// program's own effects; success prints nothing.
fn execute(bytecode: Bytecode) -> ExitCode {
    let mut vm = VirtualMachine::new(bytecode);
    match vm.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_runtime_error(&err);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
