//! Operator execution: typed binary dispatch, comparisons, unary
//! operators, arrays and slices.

use crate::error::{RuntimeError, VmResult};
use crate::vm::VirtualMachine;
use monkey_compiler::code::Opcode;
use monkey_core::Value;
use std::sync::Arc;

impl VirtualMachine {
    /// Arithmetic dispatch keyed on the operand types:
    ///
    /// | left, right      | ops        | result                  |
    /// |------------------|------------|-------------------------|
    /// | Number, Number   | all five   | IEEE-754 arithmetic     |
    /// | String, String   | `+`        | concatenation           |
    /// | String, Number   | `*`        | left repeated ⌊right⌋×  |
    pub(crate) fn execute_binary_op(&mut self, op: Opcode) -> VmResult<()> {
        let right = self.pop();
        let left = self.pop();

        match (&left, &right) {
            (Value::Number(l), Value::Number(r)) => {
                // Division by zero follows float semantics: ±Inf or NaN.
                let result = match op {
                    Opcode::Add => l + r,
                    Opcode::Subtract => l - r,
                    Opcode::Multiply => l * r,
                    Opcode::Divide => l / r,
                    Opcode::Exponent => l.powf(*r),
                    _ => unreachable!("non-arithmetic opcode {}", op.name()),
                };
                self.push(Value::Number(result))
            }

            (Value::Str(l), Value::Str(r)) if op == Opcode::Add => {
                let mut joined = String::with_capacity(l.len() + r.len());
                joined.push_str(l);
                joined.push_str(r);
                self.push(Value::Str(Arc::from(joined)))
            }

            (Value::Str(l), Value::Number(r)) if op == Opcode::Multiply => {
                let count = if *r < 0.0 { 0 } else { r.trunc() as usize };
                self.push(Value::Str(Arc::from(l.repeat(count))))
            }

            (Value::Str(_), Value::Str(_)) | (Value::Str(_), Value::Number(_)) => {
                Err(RuntimeError::unknown_operator(format!(
                    "'{}' is not defined for {} and {}",
                    op.name(),
                    left.type_tag(),
                    right.type_tag()
                )))
            }

            _ => Err(RuntimeError::type_mismatch(format!(
                "unsupported operand types {} and {}",
                left.type_tag(),
                right.type_tag()
            ))),
        }
    }

    /// Comparison dispatch: numeric pairs compare numerically; `==` and
    /// `!=` on singleton pairs compare by identity; everything else is
    /// an unknown-operator error.
    pub(crate) fn execute_comparison(&mut self, op: Opcode) -> VmResult<()> {
        let right = self.pop();
        let left = self.pop();

        if let (Value::Number(l), Value::Number(r)) = (&left, &right) {
            let result = match op {
                Opcode::Equal => l == r,
                Opcode::NotEqual => l != r,
                Opcode::Less => l < r,
                Opcode::LessEqual => l <= r,
                Opcode::Greater => l > r,
                Opcode::GreaterEqual => l >= r,
                _ => unreachable!("non-comparison opcode {}", op.name()),
            };
            return self.push(Value::boolean(result));
        }

        match op {
            Opcode::Equal | Opcode::NotEqual
                if left.is_singleton() && right.is_singleton() =>
            {
                let equal = singleton_eq(&left, &right);
                let result = if op == Opcode::Equal { equal } else { !equal };
                self.push(Value::boolean(result))
            }
            _ => Err(RuntimeError::unknown_operator(format!(
                "'{}' is not defined for {} and {}",
                op.name(),
                left.type_tag(),
                right.type_tag()
            ))),
        }
    }

    /// `OpNegate`: in-place arithmetic negation of the top value.
    pub(crate) fn execute_negate(&mut self) -> VmResult<()> {
        match self.top_mut() {
            Value::Number(n) => {
                *n = -*n;
                Ok(())
            }
            other => Err(RuntimeError::type_mismatch(format!(
                "cannot negate {}",
                other.type_tag()
            ))),
        }
    }

    /// `OpAbsolute`: in-place absolute value. A non-negative top is left
    /// untouched.
    pub(crate) fn execute_absolute(&mut self) -> VmResult<()> {
        match self.top_mut() {
            Value::Number(n) => {
                if *n < 0.0 {
                    *n = -*n;
                }
                Ok(())
            }
            other => Err(RuntimeError::type_mismatch(format!(
                "cannot take the absolute value of {}",
                other.type_tag()
            ))),
        }
    }

    /// `OpNot`: replace the top value with its truthiness negated.
    pub(crate) fn execute_not(&mut self) {
        let truthy = self.top_mut().is_truthy();
        *self.top_mut() = Value::boolean(!truthy);
    }

    /// `OpArray count`: pop `count` values, filling the array back to
    /// front, and push the result.
    pub(crate) fn execute_array(&mut self, count: usize) -> VmResult<()> {
        let mut elements = vec![Value::NIL; count];
        for slot in elements.iter_mut().rev() {
            *slot = self.pop();
        }
        self.push(Value::Array(elements))
    }

    /// `OpSlice`: pop end, start and target; push `target{start~end}`.
    ///
    /// Nil bounds default to the ends of the target. Numeric bounds are
    /// truncated toward zero and must satisfy `0 ≤ start ≤ end ≤ len`.
    pub(crate) fn execute_slice(&mut self) -> VmResult<()> {
        let end = self.pop();
        let start = self.pop();
        let target = self.pop();

        let Value::Str(text) = &target else {
            return Err(RuntimeError::unsupported_target(format!(
                "cannot slice {}",
                target.type_tag()
            )));
        };

        let start_index = slice_bound(&start, 0, text.len())?;
        let end_index = slice_bound(&end, text.len(), text.len())?;
        if start_index > end_index {
            return Err(RuntimeError::index_out_of_bounds(format!(
                "slice start {} is past end {}",
                start_index, end_index
            )));
        }

        let slice = text.get(start_index..end_index).ok_or_else(|| {
            RuntimeError::index_out_of_bounds("slice bound falls inside a character")
        })?;
        self.push(Value::Str(Arc::from(slice)))
    }
}

/// Identity comparison across the singleton values (booleans, nil, NaN,
/// the infinities).
fn singleton_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Boolean(l), Value::Boolean(r)) => l == r,
        (Value::Nil, Value::Nil) => true,
        (Value::NaN, Value::NaN) => true,
        (Value::Infinity { sign: l }, Value::Infinity { sign: r }) => l == r,
        _ => false,
    }
}

/// Resolve one slice bound: nil takes the default, numbers are
/// truncated and bounds-checked against the target length.
fn slice_bound(value: &Value, default: usize, length: usize) -> VmResult<usize> {
    match value {
        Value::Nil => Ok(default),
        Value::Number(n) => {
            let index = n.trunc();
            if index < 0.0 || index > length as f64 {
                return Err(RuntimeError::index_out_of_bounds(format!(
                    "slice index {} out of range for length {}",
                    n, length
                )));
            }
            Ok(index as usize)
        }
        other => Err(RuntimeError::type_mismatch(format!(
            "slice bound must be NUMBER, got {}",
            other.type_tag()
        ))),
    }
}
