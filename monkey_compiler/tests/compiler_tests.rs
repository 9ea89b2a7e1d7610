//! Compiler emission tests: instruction sequences and constant pools.

use monkey_compiler::{Bytecode, Compiler, Opcode, make};
use monkey_core::Value;
use monkey_parser::parse;

fn compile_source(source: &str) -> Bytecode {
    let program = parse(source).expect("parse failed");
    let mut compiler = Compiler::new();
    compiler.compile(&program).expect("compile failed");
    compiler.into_bytecode()
}

fn compile_error(source: &str) -> String {
    let program = parse(source).expect("parse failed");
    let mut compiler = Compiler::new();
    compiler
        .compile(&program)
        .expect_err("compile unexpectedly succeeded")
        .message
}

fn concat(parts: &[Vec<u8>]) -> Vec<u8> {
    parts.iter().flatten().copied().collect()
}

fn constants_of(bytecode: &Bytecode) -> Vec<String> {
    bytecode.constants.iter().map(Value::inspect).collect()
}

#[test]
fn test_number_arithmetic() {
    let bytecode = compile_source("1 + 2");
    assert_eq!(
        bytecode.instructions,
        concat(&[
            make(Opcode::Constant, &[0]),
            make(Opcode::Constant, &[1]),
            make(Opcode::Add, &[]),
            make(Opcode::Pop, &[]),
        ])
    );
    assert_eq!(constants_of(&bytecode), ["1", "2"]);
}

#[test]
fn test_binary_operator_selection() {
    let cases = [
        ("1 - 2", Opcode::Subtract),
        ("1 * 2", Opcode::Multiply),
        ("1 / 2", Opcode::Divide),
        ("1 ^ 2", Opcode::Exponent),
        ("1 == 2", Opcode::Equal),
        ("1 != 2", Opcode::NotEqual),
        ("1 < 2", Opcode::Less),
        ("1 <= 2", Opcode::LessEqual),
        ("1 > 2", Opcode::Greater),
        ("1 >= 2", Opcode::GreaterEqual),
    ];
    for (source, op) in cases {
        let bytecode = compile_source(source);
        assert_eq!(
            bytecode.instructions,
            concat(&[
                make(Opcode::Constant, &[0]),
                make(Opcode::Constant, &[1]),
                make(op, &[]),
                make(Opcode::Pop, &[]),
            ]),
            "source: {}",
            source
        );
    }
}

#[test]
fn test_booleans_and_nil_use_no_constants() {
    let bytecode = compile_source("true; false; nil");
    assert_eq!(
        bytecode.instructions,
        concat(&[
            make(Opcode::True, &[]),
            make(Opcode::Pop, &[]),
            make(Opcode::False, &[]),
            make(Opcode::Pop, &[]),
            make(Opcode::Nil, &[]),
            make(Opcode::Pop, &[]),
        ])
    );
    assert!(bytecode.constants.is_empty());
}

#[test]
fn test_unary_expressions() {
    let bytecode = compile_source("-5");
    assert_eq!(
        bytecode.instructions,
        concat(&[
            make(Opcode::Constant, &[0]),
            make(Opcode::Negate, &[]),
            make(Opcode::Pop, &[]),
        ])
    );

    let bytecode = compile_source("!true");
    assert_eq!(
        bytecode.instructions,
        concat(&[
            make(Opcode::True, &[]),
            make(Opcode::Not, &[]),
            make(Opcode::Pop, &[]),
        ])
    );
}

#[test]
fn test_absolute_expression() {
    let bytecode = compile_source("|-5|");
    assert_eq!(
        bytecode.instructions,
        concat(&[
            make(Opcode::Constant, &[0]),
            make(Opcode::Negate, &[]),
            make(Opcode::Absolute, &[]),
            make(Opcode::Pop, &[]),
        ])
    );
}

#[test]
fn test_string_constants() {
    let bytecode = compile_source("\"mon\" + \"key\"");
    assert_eq!(constants_of(&bytecode), ["\"mon\"", "\"key\""]);
}

#[test]
fn test_array_literal() {
    let bytecode = compile_source("[1, 2, 3]");
    assert_eq!(
        bytecode.instructions,
        concat(&[
            make(Opcode::Constant, &[0]),
            make(Opcode::Constant, &[1]),
            make(Opcode::Constant, &[2]),
            make(Opcode::Array, &[3]),
            make(Opcode::Pop, &[]),
        ])
    );

    let bytecode = compile_source("[]");
    assert_eq!(
        bytecode.instructions,
        concat(&[make(Opcode::Array, &[0]), make(Opcode::Pop, &[])])
    );
}

#[test]
fn test_slice_compiles_missing_bounds_as_nil() {
    let bytecode = compile_source("\"hello\"{1~4}");
    assert_eq!(
        bytecode.instructions,
        concat(&[
            make(Opcode::Constant, &[0]),
            make(Opcode::Constant, &[1]),
            make(Opcode::Constant, &[2]),
            make(Opcode::Slice, &[]),
            make(Opcode::Pop, &[]),
        ])
    );

    let bytecode = compile_source("\"hello\"{~}");
    assert_eq!(
        bytecode.instructions,
        concat(&[
            make(Opcode::Constant, &[0]),
            make(Opcode::Nil, &[]),
            make(Opcode::Nil, &[]),
            make(Opcode::Slice, &[]),
            make(Opcode::Pop, &[]),
        ])
    );
}

#[test]
fn test_if_without_alternative_patches_to_end() {
    let bytecode = compile_source("if (true) { 10 }; 3333;");
    assert_eq!(
        bytecode.instructions,
        concat(&[
            // 0000
            make(Opcode::True, &[]),
            // 0001
            make(Opcode::JumpNotTruthy, &[7]),
            // 0004 — the consequence's trailing pop is elided
            make(Opcode::Constant, &[0]),
            // 0007
            make(Opcode::Constant, &[1]),
            // 0010
            make(Opcode::Pop, &[]),
        ])
    );
}

#[test]
fn test_if_with_alternative_patches_both_jumps() {
    let bytecode = compile_source("if (true) { 10 } else { 20 }; 3333;");
    assert_eq!(
        bytecode.instructions,
        concat(&[
            // 0000
            make(Opcode::True, &[]),
            // 0001
            make(Opcode::JumpNotTruthy, &[10]),
            // 0004
            make(Opcode::Constant, &[0]),
            // 0007
            make(Opcode::Jump, &[13]),
            // 0010
            make(Opcode::Constant, &[1]),
            // 0013
            make(Opcode::Constant, &[2]),
            // 0016
            make(Opcode::Pop, &[]),
        ])
    );
    assert_eq!(constants_of(&bytecode), ["10", "20", "3333"]);
}

#[test]
fn test_ternary_expression() {
    let bytecode = compile_source("1 if true else 2");
    assert_eq!(
        bytecode.instructions,
        concat(&[
            // 0000
            make(Opcode::True, &[]),
            // 0001
            make(Opcode::JumpNotTruthy, &[10]),
            // 0004
            make(Opcode::Constant, &[0]),
            // 0007
            make(Opcode::Jump, &[13]),
            // 0010
            make(Opcode::Constant, &[1]),
            // 0013 — the statement's own pop survives
            make(Opcode::Pop, &[]),
        ])
    );
}

#[test]
fn test_global_var_and_identifier() {
    let bytecode = compile_source("var one = 1; var two = 2; one + two");
    assert_eq!(
        bytecode.instructions,
        concat(&[
            make(Opcode::Constant, &[0]),
            make(Opcode::SetGlobal, &[0]),
            make(Opcode::Constant, &[1]),
            make(Opcode::SetGlobal, &[1]),
            make(Opcode::GetGlobal, &[0]),
            make(Opcode::GetGlobal, &[1]),
            make(Opcode::Add, &[]),
            make(Opcode::Pop, &[]),
        ])
    );
}

#[test]
fn test_var_name_list_recompiles_initializer() {
    // Each declared name re-evaluates the shared initializer, and the
    // pool does not deduplicate, so the constant appears twice.
    let bytecode = compile_source("var a, b = 5");
    assert_eq!(
        bytecode.instructions,
        concat(&[
            make(Opcode::Constant, &[0]),
            make(Opcode::SetGlobal, &[0]),
            make(Opcode::Constant, &[1]),
            make(Opcode::SetGlobal, &[1]),
        ])
    );
    assert_eq!(constants_of(&bytecode), ["5", "5"]);
}

#[test]
fn test_redeclared_name_is_a_compile_error() {
    let message = compile_error("var a = 1; var a = 2");
    assert!(message.contains("cannot redeclare variable 'a'"), "{}", message);
}

#[test]
fn test_undefined_identifier_is_a_compile_error() {
    let message = compile_error("x + 1");
    assert!(message.contains("undefined variable 'x'"), "{}", message);
}

#[test]
fn test_literals_without_a_compiled_form_are_rejected() {
    assert!(compile_error("NaN").contains("not compilable"));
    assert!(compile_error("Infinity + 1").contains("not compilable"));
}

#[test]
fn test_state_resumption_extends_pool_and_symbols() {
    let program = parse("var x = 41").unwrap();
    let mut compiler = Compiler::new();
    compiler.compile(&program).unwrap();
    let (symbols, bytecode) = compiler.into_state();
    assert_eq!(constants_of(&bytecode), ["41"]);

    let program = parse("x + 1").unwrap();
    let mut compiler = Compiler::with_state(symbols, bytecode.constants);
    compiler.compile(&program).unwrap();
    let resumed = compiler.into_bytecode();

    assert_eq!(constants_of(&resumed), ["41", "1"]);
    assert_eq!(
        resumed.instructions,
        concat(&[
            make(Opcode::GetGlobal, &[0]),
            make(Opcode::Constant, &[1]),
            make(Opcode::Add, &[]),
            make(Opcode::Pop, &[]),
        ])
    );
}
