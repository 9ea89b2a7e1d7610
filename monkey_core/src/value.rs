//! Runtime value model.
//!
//! Values are a clonable tagged enum. The canonical singletons (`NIL`,
//! `TRUE`, `FALSE`, `NAN`, `INFINITY`, `NEG_INFINITY`) are associated
//! constants; because they are fieldless (or carry only their tag data),
//! case equality on them is the moral equivalent of the pointer-identity
//! fast path an interpreter with heap-allocated objects would use.
//!
//! `PartialEq` is deliberately not derived: `==` between arbitrary values
//! is an operator the VM dispatches on, not a structural property.

use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Type tag for numbers.
pub const NUMBER_TAG: &str = "NUMBER";
/// Type tag for strings.
pub const STRING_TAG: &str = "STRING";
/// Type tag for arrays.
pub const ARRAY_TAG: &str = "ARRAY";
/// Type tag for booleans.
pub const BOOLEAN_TAG: &str = "BOOLEAN";
/// Type tag for nil.
pub const NIL_TAG: &str = "NIL";
/// Type tag for the NaN singleton.
pub const NAN_TAG: &str = "NAN";
/// Type tag for the signed infinity singletons.
pub const INFINITY_TAG: &str = "INFINITY";
/// Type tag for hashes.
pub const HASH_TAG: &str = "HASH";
/// Type tag for return-value wrappers.
pub const RETURN_VALUE_TAG: &str = "RETURN_VALUE";
/// Type tag for error values.
pub const ERROR_TAG: &str = "ERROR";

/// FNV-1a 64-bit offset basis.
const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
/// FNV-1a 64-bit prime.
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Key identifying a value inside a hash: its type tag plus a 64-bit
/// content hash. Two values collide only if both components match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    /// Type tag of the hashed value.
    pub tag: &'static str,
    /// 64-bit content hash.
    pub value: u64,
}

/// A key/value entry stored in a hash. The original key value is kept
/// alongside so inspection can render it.
#[derive(Debug, Clone)]
pub struct HashPair {
    /// The key as written.
    pub key: Value,
    /// The associated value.
    pub value: Value,
}

/// A Monkey runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    /// IEEE-754 double.
    Number(f64),
    /// Boolean; use [`Value::TRUE`] / [`Value::FALSE`].
    Boolean(bool),
    /// Immutable UTF-8 string.
    Str(Arc<str>),
    /// The nil singleton.
    Nil,
    /// Not-a-number singleton, distinct from `Number(f64::NAN)` for
    /// type-tag purposes.
    NaN,
    /// Signed infinity singleton; `sign` is `1` or `-1`.
    Infinity {
        /// Sign of the infinity.
        sign: i8,
    },
    /// Ordered sequence of values.
    Array(Vec<Value>),
    /// Mapping from hash key to key/value pair.
    Hash(FxHashMap<HashKey, HashPair>),
    /// Wrapper used by the tree-walking evaluator to unwind returns.
    /// The VM never produces these.
    ReturnValue(Box<Value>),
    /// An error value produced by collaborators (never by the VM, whose
    /// runtime errors travel out of band).
    Error {
        /// 1-based source line.
        line: u32,
        /// 1-based source column.
        column: u32,
        /// Human-readable message.
        message: String,
        /// Optional remediation hint.
        hint: String,
    },
}

impl Value {
    /// The canonical `true` value.
    pub const TRUE: Value = Value::Boolean(true);
    /// The canonical `false` value.
    pub const FALSE: Value = Value::Boolean(false);
    /// The canonical nil value.
    pub const NIL: Value = Value::Nil;
    /// The canonical not-a-number value.
    pub const NAN: Value = Value::NaN;
    /// The canonical positive infinity value.
    pub const INFINITY: Value = Value::Infinity { sign: 1 };
    /// The canonical negative infinity value.
    pub const NEG_INFINITY: Value = Value::Infinity { sign: -1 };

    /// The canonical boolean for a native `bool`.
    #[inline]
    #[must_use]
    pub const fn boolean(value: bool) -> Value {
        if value { Value::TRUE } else { Value::FALSE }
    }

    /// The value's type tag.
    #[must_use]
    pub fn type_tag(&self) -> &'static str {
        match self {
            Value::Number(_) => NUMBER_TAG,
            Value::Boolean(_) => BOOLEAN_TAG,
            Value::Str(_) => STRING_TAG,
            Value::Nil => NIL_TAG,
            Value::NaN => NAN_TAG,
            Value::Infinity { .. } => INFINITY_TAG,
            Value::Array(_) => ARRAY_TAG,
            Value::Hash(_) => HASH_TAG,
            Value::ReturnValue(_) => RETURN_VALUE_TAG,
            Value::Error { .. } => ERROR_TAG,
        }
    }

    /// Render the value for user-facing output.
    #[must_use]
    pub fn inspect(&self) -> String {
        match self {
            Value::Number(n) => format!("{}", n),
            Value::Boolean(b) => format!("{}", b),
            Value::Str(s) => format!("\"{}\"", s),
            Value::Nil => "nil".to_string(),
            Value::NaN => "NotANumber".to_string(),
            Value::Infinity { sign } => {
                if *sign > 0 {
                    "Infinity++".to_string()
                } else {
                    "Infinity--".to_string()
                }
            }
            Value::Array(elements) => {
                let rendered: Vec<String> = elements.iter().map(Value::inspect).collect();
                format!("[{}]", rendered.join(", "))
            }
            Value::Hash(pairs) => {
                if pairs.is_empty() {
                    return "{}".to_string();
                }
                let rendered: Vec<String> = pairs
                    .values()
                    .map(|pair| format!("{}: {}", pair.key.inspect(), pair.value.inspect()))
                    .collect();
                format!("{{{}}}", rendered.join(", "))
            }
            Value::ReturnValue(inner) => format!("return {{ {} }}", inner.inspect()),
            Value::Error {
                line,
                column,
                message,
                ..
            } => format!("Error at Ln {}:{} - {}", line, column, message),
        }
    }

    /// Derive the hash key for hashable variants (Number, String,
    /// Boolean). Returns `None` for everything else.
    #[must_use]
    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Value::Number(n) => Some(HashKey {
                tag: NUMBER_TAG,
                value: n.trunc() as i64 as u64,
            }),
            Value::Str(s) => Some(HashKey {
                tag: STRING_TAG,
                value: fnv1a_64(s.as_bytes()),
            }),
            Value::Boolean(b) => Some(HashKey {
                tag: BOOLEAN_TAG,
                value: u64::from(*b),
            }),
            _ => None,
        }
    }

    /// Truthiness: `nil`, `NaN`, `false` and `0` are falsy, everything
    /// else is truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::NaN => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0,
            _ => true,
        }
    }

    /// Whether this value is one of the canonical singletons (nil,
    /// booleans, NaN, infinities). Singletons support the identity
    /// comparison fast path in the VM.
    #[must_use]
    pub fn is_singleton(&self) -> bool {
        matches!(
            self,
            Value::Nil | Value::Boolean(_) | Value::NaN | Value::Infinity { .. }
        )
    }
}

/// FNV-1a 64-bit hash over a byte slice.
fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}
