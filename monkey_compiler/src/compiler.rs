//! Single-pass AST to bytecode compiler.
//!
//! The compiler walks the AST once, appending encoded instructions to a
//! flat byte buffer and interning literals into the constant pool. Jump
//! targets are emitted as `0xFFFF` placeholders and patched in place once
//! the destination offset is known; the two-slot
//! `last_instruction`/`previous_instruction` history makes both the
//! patching and the trailing-`OpPop` elision in branch bodies possible.

use crate::code::{self, Opcode};
use crate::symbols::SymbolTable;
use monkey_core::{Span, Value};
use monkey_parser::ast::{Block, Expr, ExprKind, Program, Stmt, StmtKind};
use monkey_parser::token::TokenKind;
use std::fmt;
use std::sync::Arc;

/// Placeholder operand for a jump whose target is not yet known.
const PLACEHOLDER: usize = 0xFFFF;

/// Compilation error.
#[derive(Debug, Clone)]
pub struct CompileError {
    /// Error message.
    pub message: String,
    /// Offending source span, when one is known.
    pub span: Option<Span>,
}

impl CompileError {
    fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span: Some(span),
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CompileError {}

/// Result type for compilation.
pub type CompileResult<T> = Result<T, CompileError>;

/// Compiler output: the instruction stream and its constant pool.
#[derive(Debug, Clone, Default)]
pub struct Bytecode {
    /// Encoded instructions.
    pub instructions: Vec<u8>,
    /// Constant pool referenced by `OpConstant` operands.
    pub constants: Vec<Value>,
}

/// Record of one emitted instruction, kept for patching and elision.
#[derive(Debug, Clone, Copy)]
struct EmittedInstruction {
    /// The opcode.
    opcode: Opcode,
    /// Byte offset of the opcode within the instruction buffer.
    position: usize,
}

/// Bytecode compiler.
pub struct Compiler {
    /// Flat instruction buffer.
    instructions: Vec<u8>,
    /// Append-only constant pool. No deduplication.
    constants: Vec<Value>,
    /// Name to global-slot mapping.
    symbols: SymbolTable,
    /// Most recently emitted instruction.
    last_instruction: Option<EmittedInstruction>,
    /// The one before it.
    previous_instruction: Option<EmittedInstruction>,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    /// Create a compiler with empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::with_state(SymbolTable::new(), Vec::new())
    }

    /// Create a compiler resuming from prior state. This is how a REPL
    /// keeps definitions and interned constants alive across lines.
    #[must_use]
    pub fn with_state(symbols: SymbolTable, constants: Vec<Value>) -> Self {
        Self {
            instructions: Vec::new(),
            constants,
            symbols,
            last_instruction: None,
            previous_instruction: None,
        }
    }

    /// Compile a whole program.
    pub fn compile(&mut self, program: &Program) -> CompileResult<()> {
        for stmt in &program.statements {
            self.compile_stmt(stmt)?;
        }
        Ok(())
    }

    /// Hand off the finished bytecode.
    #[must_use]
    pub fn into_bytecode(self) -> Bytecode {
        Bytecode {
            instructions: self.instructions,
            constants: self.constants,
        }
    }

    /// Hand off the finished bytecode along with the symbol table, so a
    /// subsequent compilation can resume against it.
    #[must_use]
    pub fn into_state(self) -> (SymbolTable, Bytecode) {
        (
            self.symbols,
            Bytecode {
                instructions: self.instructions,
                constants: self.constants,
            },
        )
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn compile_stmt(&mut self, stmt: &Stmt) -> CompileResult<()> {
        match &stmt.kind {
            StmtKind::Expression(expr) => {
                self.compile_expr(expr)?;
                self.emit(Opcode::Pop, &[]);
            }

            StmtKind::Var { names, value } => {
                // Each declared name evaluates the initializer afresh.
                for name in names {
                    self.compile_expr(value)?;
                    let Some(symbol) = self.symbols.define(name.name.as_str()) else {
                        return Err(CompileError::new(
                            format!("cannot redeclare variable '{}'", name.name),
                            name.span,
                        ));
                    };
                    self.emit(Opcode::SetGlobal, &[symbol.index as usize]);
                }
            }

            StmtKind::If {
                condition,
                consequence,
                alternative,
            } => {
                self.compile_expr(condition)?;
                let jump_not_truthy = self.emit(Opcode::JumpNotTruthy, &[PLACEHOLDER]);

                self.compile_block(consequence)?;
                self.strip_trailing_pop();

                match alternative {
                    None => {
                        self.change_operand(jump_not_truthy, self.instructions.len());
                    }
                    Some(alternative) => {
                        let jump = self.emit(Opcode::Jump, &[PLACEHOLDER]);
                        self.change_operand(jump_not_truthy, self.instructions.len());

                        self.compile_block(alternative)?;
                        self.strip_trailing_pop();
                        self.change_operand(jump, self.instructions.len());
                    }
                }
            }
        }
        Ok(())
    }

    fn compile_block(&mut self, block: &Block) -> CompileResult<()> {
        for stmt in &block.statements {
            self.compile_stmt(stmt)?;
        }
        Ok(())
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn compile_expr(&mut self, expr: &Expr) -> CompileResult<()> {
        match &expr.kind {
            ExprKind::Number(value) => {
                let index = self.add_constant(Value::Number(*value));
                self.emit(Opcode::Constant, &[index]);
            }

            ExprKind::Str(value) => {
                let index = self.add_constant(Value::Str(Arc::from(value.as_str())));
                self.emit(Opcode::Constant, &[index]);
            }

            ExprKind::Boolean(true) => {
                self.emit(Opcode::True, &[]);
            }
            ExprKind::Boolean(false) => {
                self.emit(Opcode::False, &[]);
            }

            ExprKind::Nil => {
                self.emit(Opcode::Nil, &[]);
            }

            ExprKind::Identifier(name) => {
                let Some(symbol) = self.symbols.resolve(name) else {
                    return Err(CompileError::new(
                        format!("undefined variable '{}'", name),
                        expr.span,
                    ));
                };
                let index = symbol.index as usize;
                self.emit(Opcode::GetGlobal, &[index]);
            }

            ExprKind::Infinity(_) | ExprKind::NaN => {
                return Err(CompileError::new(
                    format!("'{}' is not compilable", expr),
                    expr.span,
                ));
            }

            ExprKind::Binary {
                operator,
                left,
                right,
            } => {
                self.compile_expr(left)?;
                self.compile_expr(right)?;

                let opcode = match operator {
                    TokenKind::Plus => Opcode::Add,
                    TokenKind::Minus => Opcode::Subtract,
                    TokenKind::Star => Opcode::Multiply,
                    TokenKind::Slash => Opcode::Divide,
                    TokenKind::Caret => Opcode::Exponent,
                    TokenKind::Equal => Opcode::Equal,
                    TokenKind::NotEqual => Opcode::NotEqual,
                    TokenKind::Less => Opcode::Less,
                    TokenKind::LessEqual => Opcode::LessEqual,
                    TokenKind::Greater => Opcode::Greater,
                    TokenKind::GreaterEqual => Opcode::GreaterEqual,
                    other => {
                        return Err(CompileError::new(
                            format!("unknown binary operator '{}'", other),
                            expr.span,
                        ));
                    }
                };
                self.emit(opcode, &[]);
            }

            ExprKind::Unary { operator, right } => {
                self.compile_expr(right)?;
                let opcode = match operator {
                    TokenKind::Minus => Opcode::Negate,
                    TokenKind::Bang => Opcode::Not,
                    other => {
                        return Err(CompileError::new(
                            format!("unknown unary operator '{}'", other),
                            expr.span,
                        ));
                    }
                };
                self.emit(opcode, &[]);
            }

            ExprKind::Absolute(inner) => {
                self.compile_expr(inner)?;
                self.emit(Opcode::Absolute, &[]);
            }

            ExprKind::Array(elements) => {
                for element in elements {
                    self.compile_expr(element)?;
                }
                self.emit(Opcode::Array, &[elements.len()]);
            }

            ExprKind::Slice { target, start, end } => {
                self.compile_expr(target)?;
                match start {
                    Some(start) => self.compile_expr(start)?,
                    None => {
                        self.emit(Opcode::Nil, &[]);
                    }
                }
                match end {
                    Some(end) => self.compile_expr(end)?,
                    None => {
                        self.emit(Opcode::Nil, &[]);
                    }
                }
                self.emit(Opcode::Slice, &[]);
            }

            ExprKind::Ternary {
                consequence,
                condition,
                alternative,
            } => {
                self.compile_expr(condition)?;
                let jump_not_truthy = self.emit(Opcode::JumpNotTruthy, &[PLACEHOLDER]);

                self.compile_expr(consequence)?;
                self.strip_trailing_pop();
                let jump = self.emit(Opcode::Jump, &[PLACEHOLDER]);
                self.change_operand(jump_not_truthy, self.instructions.len());

                self.compile_expr(alternative)?;
                self.strip_trailing_pop();
                self.change_operand(jump, self.instructions.len());
            }
        }
        Ok(())
    }

    // =========================================================================
    // Emission
    // =========================================================================

    /// Encode and append an instruction, returning its byte offset.
    fn emit(&mut self, op: Opcode, operands: &[usize]) -> usize {
        let instruction = code::make(op, operands);
        let position = self.instructions.len();
        self.instructions.extend_from_slice(&instruction);

        self.previous_instruction = self.last_instruction;
        self.last_instruction = Some(EmittedInstruction {
            opcode: op,
            position,
        });

        position
    }

    /// Intern a constant, returning its pool index.
    fn add_constant(&mut self, value: Value) -> usize {
        debug_assert!(self.constants.len() <= u16::MAX as usize);
        self.constants.push(value);
        self.constants.len() - 1
    }

    /// Re-encode the instruction at `position` with a new operand. Used
    /// to patch jump placeholders once the target offset is known.
    fn change_operand(&mut self, position: usize, operand: usize) {
        let opcode =
            Opcode::from_u8(self.instructions[position]).expect("patch target is not an opcode");
        let instruction = code::make(opcode, &[operand]);
        self.instructions[position..position + instruction.len()].copy_from_slice(&instruction);
    }

    /// Drop a trailing `OpPop`, restoring the previous instruction as the
    /// last one. Branch bodies use this so their final value survives.
    fn strip_trailing_pop(&mut self) {
        let Some(last) = self.last_instruction else {
            return;
        };
        if last.opcode != Opcode::Pop {
            return;
        }
        self.instructions.truncate(last.position);
        self.last_instruction = self.previous_instruction;
    }
}
