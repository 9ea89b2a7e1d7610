//! Lexer, AST and parser for the Monkey language.
//!
//! The parser is a recursive-descent/Pratt hybrid: statements by keyword
//! dispatch, expressions by a precedence-climbing loop. Errors are
//! collected rather than failing fast, so a source file reports as many
//! problems as possible in one pass.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{Block, Expr, ExprKind, Identifier, Program, Stmt, StmtKind};
pub use lexer::Lexer;
pub use parser::{ParseError, Parser, parse};
pub use token::{Token, TokenKind};
