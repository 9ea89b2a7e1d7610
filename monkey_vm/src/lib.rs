//! Stack-based virtual machine for Monkey bytecode.
//!
//! The VM is single-threaded and synchronous: [`VirtualMachine::run`] is
//! a tight fetch/decode/execute loop with no suspension points. State is
//! a fixed-capacity operand stack, a fixed-capacity globals array, and
//! the read-only instruction stream and constant pool handed over by the
//! compiler (or decoded from an image file).

pub mod error;
mod ops;
pub mod vm;

pub use error::{RuntimeError, RuntimeErrorKind, VmResult};
pub use vm::{GLOBALS_SIZE, STACK_SIZE, VirtualMachine, new_globals};
