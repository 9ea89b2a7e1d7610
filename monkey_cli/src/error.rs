//! Error reporting and process exit codes.
//!
//! Every error family is formatted to stderr here, keeping the rest of
//! the driver free of presentation concerns.

use monkey_compiler::CompileError;
use monkey_compiler::ImageError;
use monkey_parser::ParseError;
use monkey_vm::RuntimeError;
use std::path::Path;

/// Parse, compile, image or runtime error.
pub const EXIT_ERROR: u8 = 1;
/// Command-line usage error.
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Convert a byte offset to 1-based line and column numbers.
#[must_use]
pub fn position(source: &str, offset: u32) -> (u32, u32) {
    let offset = (offset as usize).min(source.len());
    let mut line = 1;
    let mut column = 1;
    for (index, c) in source.char_indices() {
        if index >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

/// Print every collected parse error.
pub fn report_parse_errors(errors: &[ParseError], source: &str, filename: &str) {
    for error in errors {
        let (line, column) = position(source, error.span.start);
        eprintln!(
            "{}:{}:{}: parse error: {}",
            filename, line, column, error.message
        );
    }
}

/// Print a compile error with its source location when one is known.
pub fn report_compile_error(error: &CompileError, source: &str, filename: &str) {
    match error.span {
        Some(span) => {
            let (line, column) = position(source, span.start);
            eprintln!(
                "{}:{}:{}: compile error: {}",
                filename, line, column, error.message
            );
        }
        None => eprintln!("{}: compile error: {}", filename, error.message),
    }
}

/// Print a runtime error.
pub fn report_runtime_error(error: &RuntimeError) {
    eprintln!("runtime error: {}", error);
}

/// Print an image codec error against the file it came from.
pub fn report_image_error(error: &ImageError, path: &Path) {
    eprintln!("{}: {}", path.display(), error);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_first_line() {
        assert_eq!(position("abc", 0), (1, 1));
        assert_eq!(position("abc", 2), (1, 3));
    }

    #[test]
    fn test_position_later_lines() {
        let source = "one\ntwo\nthree";
        assert_eq!(position(source, 4), (2, 1));
        assert_eq!(position(source, 6), (2, 3));
        assert_eq!(position(source, 8), (3, 1));
    }

    #[test]
    fn test_position_clamps_past_end() {
        assert_eq!(position("ab", 99), (1, 3));
    }
}
