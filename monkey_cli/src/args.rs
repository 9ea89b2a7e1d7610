//! Hand-rolled command-line argument parser.
//!
//! The flag surface is small and startup cost matters for a language
//! driver, so flags are matched directly instead of through an argparse
//! dependency. Flags accept both `-flag value` and `-flag=value` forms,
//! with one or two leading dashes.

use std::fmt;
use std::path::PathBuf;

/// Usage text printed for `-h` and on usage errors.
pub const USAGE: &str = "\
Usage: monkey [flags] [file]

With no flags and no file, start the REPL. With a file, compile and run it.

Flags:
  -build <path>           compile <path> and write <basename>.mnc
  -run-bc <path>          run a compiled bytecode image
  -disassemble-bc <path>  print a bytecode image's disassembly
  -h, --help              print this help
  -V, --version           print the version
";

/// What the driver should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Compile a source file to a bytecode image.
    Build(PathBuf),
    /// Run a bytecode image.
    RunBytecode(PathBuf),
    /// Disassemble a bytecode image.
    Disassemble(PathBuf),
    /// Compile and run a source file.
    Script(PathBuf),
    /// Interactive session.
    Repl,
    /// Print help and exit.
    PrintHelp,
    /// Print version and exit.
    PrintVersion,
}

/// Error during argument parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgError {
    /// A flag that requires a value did not get one.
    MissingValue(&'static str),
    /// A flag that is not recognized.
    UnknownFlag(String),
    /// Two mutually exclusive mode flags were given.
    ConflictingModes(&'static str, &'static str),
    /// A positional argument that cannot be combined with the mode.
    UnexpectedArg(String),
}

impl fmt::Display for ArgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgError::MissingValue(flag) => write!(f, "flag {} requires a value", flag),
            ArgError::UnknownFlag(flag) => write!(f, "unknown flag {}", flag),
            ArgError::ConflictingModes(first, second) => {
                write!(f, "{} cannot be combined with {}", second, first)
            }
            ArgError::UnexpectedArg(arg) => write!(f, "unexpected argument '{}'", arg),
        }
    }
}

impl std::error::Error for ArgError {}

/// Parse the command line (without the program name).
pub fn parse_args<I>(args: I) -> Result<ExecutionMode, ArgError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut mode: Option<(&'static str, ExecutionMode)> = None;
    let mut script: Option<String> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" | "-help" => return Ok(ExecutionMode::PrintHelp),
            "-V" | "--version" | "-version" => return Ok(ExecutionMode::PrintVersion),
            _ => {}
        }

        let Some(flag) = arg.strip_prefix('-') else {
            if script.is_some() {
                return Err(ArgError::UnexpectedArg(arg));
            }
            script = Some(arg);
            continue;
        };
        let flag = flag.strip_prefix('-').unwrap_or(flag);

        let (name, inline_value) = match flag.split_once('=') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (flag, None),
        };

        let flag_name: &'static str = match name {
            "build" => "-build",
            "run-bc" => "-run-bc",
            "disassemble-bc" => "-disassemble-bc",
            _ => return Err(ArgError::UnknownFlag(arg.clone())),
        };

        let value = match inline_value {
            Some(value) => value,
            None => args.next().ok_or(ArgError::MissingValue(flag_name))?,
        };
        let path = PathBuf::from(value);

        let new_mode = match flag_name {
            "-build" => ExecutionMode::Build(path),
            "-run-bc" => ExecutionMode::RunBytecode(path),
            _ => ExecutionMode::Disassemble(path),
        };

        if let Some((existing, _)) = &mode {
            return Err(ArgError::ConflictingModes(existing, flag_name));
        }
        mode = Some((flag_name, new_mode));
    }

    match (mode, script) {
        (Some(_), Some(arg)) => Err(ArgError::UnexpectedArg(arg)),
        (Some((_, mode)), None) => Ok(mode),
        (None, Some(path)) => Ok(ExecutionMode::Script(PathBuf::from(path))),
        (None, None) => Ok(ExecutionMode::Repl),
    }
}
