//! Core types for the Monkey language runtime.
//!
//! This crate sits under every other workspace member and provides:
//! - The runtime value model ([`Value`], [`HashKey`], singleton constants)
//! - Source spans ([`Span`]) carried by tokens, AST nodes and errors

pub mod span;
pub mod value;

pub use span::Span;
pub use value::{HashKey, HashPair, Value};

/// Crate version, surfaced by the CLI banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
