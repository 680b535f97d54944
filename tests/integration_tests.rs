//! Integration tests for end-to-end compilation.
//!
//! These tests run the complete pipeline against the LLVM backend: the
//! symbol-table pass, code generation, target configuration and module
//! verification.

use inkwell::{context::Context, values::BasicValueEnum};
use singularity::{
    ast::{
        ast::{Expression, Statement},
        operators::{create_operation, ArithmeticOperator, ComparisonOperator},
        statements::{Function, Program, VariableAssignment},
    },
    compiler::{
        backend::{Backend, FunctionKind},
        compiler::{compile, CodeGenContext, CompileOptions},
        expr::gen_expression,
        llvm::LlvmBackend,
    },
    demos::{demo, DEMOS},
};

fn compile_to_ir(program: &Program) -> String {
    let context = Context::create();
    let backend = LlvmBackend::new(&context, "test");
    let backend = compile(program, backend, CompileOptions::default())
        .unwrap()
        .into_backend();
    backend.print_to_string()
}

#[test]
fn test_compile_print_integer() {
    let program = Program::from_statements(vec![Statement::print_value(Expression::Integer(42))]);
    let ir = compile_to_ir(&program);

    assert!(ir.contains("declare i32 @printf(i8*, ...)"), "{}", ir);
    assert!(ir.contains("define i32 @main()"), "{}", ir);
    assert!(ir.contains("i64 42"), "{}", ir);
    assert!(ir.contains("ret i32 0"), "{}", ir);
    assert!(ir.contains("%lld\\0A\\00"), "{}", ir);
}

#[test]
fn test_addition_is_folded() {
    let context = Context::create();
    let mut backend = LlvmBackend::new(&context, "test");
    backend.enter_function("main", FunctionKind::Entry).unwrap();
    let mut codegen = CodeGenContext::new(backend, CompileOptions::default());

    let expression = create_operation(
        Expression::Integer(3),
        ArithmeticOperator::Addition as i32,
        Expression::Integer(4),
    )
    .unwrap();
    let typed = gen_expression(&mut codegen, &expression).unwrap();

    match typed.value {
        BasicValueEnum::IntValue(value) => {
            assert_eq!(value.get_sign_extended_constant(), Some(7));
        }
        other => panic!("expected an integer, found {:?}", other),
    }
}

#[test]
fn test_not_false_is_true() {
    let context = Context::create();
    let mut backend = LlvmBackend::new(&context, "test");
    backend.enter_function("main", FunctionKind::Entry).unwrap();
    let mut codegen = CodeGenContext::new(backend, CompileOptions::default());

    let typed = gen_expression(&mut codegen, &Expression::not(Expression::Boolean(false))).unwrap();

    match typed.value {
        BasicValueEnum::IntValue(value) => {
            assert_eq!(value.get_type().get_bit_width(), 1);
            assert_eq!(value.get_zero_extended_constant(), Some(1));
        }
        other => panic!("expected a boolean, found {:?}", other),
    }
}

#[test]
fn test_double_print_uses_double_format() {
    let program = Program::from_statements(vec![Statement::print_value(
        create_operation(
            Expression::Integer(7),
            ArithmeticOperator::Division as i32,
            Expression::Double(2.0),
        )
        .unwrap(),
    )]);
    let ir = compile_to_ir(&program);

    assert!(ir.contains("%lf\\0A\\00"), "{}", ir);
    assert!(ir.contains("double 3.500000e+00"), "{}", ir);
}

#[test]
fn test_globals_and_procedures() {
    let program = Program::new(
        vec![VariableAssignment::new("limit", Expression::Integer(10))],
        vec![Function::new(
            "check",
            vec![Statement::print_value(
                create_operation(
                    Expression::identifier("limit"),
                    ComparisonOperator::Greater as i32,
                    Expression::Integer(3),
                )
                .unwrap(),
            )],
        )],
        vec![Statement::print_value(Expression::identifier("limit"))],
    );
    let ir = compile_to_ir(&program);

    assert!(ir.contains("@limit = constant i64 10"), "{}", ir);
    assert!(ir.contains("define void @check()"), "{}", ir);
    assert!(ir.contains("ret void"), "{}", ir);
}

#[test]
fn test_undefined_symbol_fails() {
    let context = Context::create();
    let backend = LlvmBackend::new(&context, "test");
    let program =
        Program::from_statements(vec![Statement::print_value(Expression::identifier("y"))]);

    let error = compile(&program, backend, CompileOptions::default())
        .err()
        .unwrap();
    assert_eq!(error.get_error_name(), "UndefinedSymbolError");
}

#[test]
fn test_module_is_saved_to_file() {
    let program = demo("hello").unwrap().unwrap();
    let context = Context::create();
    let backend = LlvmBackend::new(&context, "hello");
    let backend = compile(&program, backend, CompileOptions::default())
        .unwrap()
        .into_backend();

    let path = std::env::temp_dir().join("singularity_hello.ll");
    backend.save_module_to_file(path.clone()).unwrap();

    let saved = std::fs::read_to_string(&path).unwrap();
    assert!(saved.contains("@printf"));
    let _ = std::fs::remove_file(path);
}

#[test]
fn test_all_demos_compile() {
    for name in DEMOS {
        let program = demo(name).unwrap().unwrap();
        let ir = compile_to_ir(&program);
        assert!(ir.contains("@main"), "{}: {}", name, ir);
    }
}

fn compile_error_name(program: &Program) -> String {
    let context = Context::create();
    let backend = LlvmBackend::new(&context, "test");
    let error = compile(program, backend, CompileOptions::default())
        .err()
        .unwrap();
    error.get_error_name().to_string()
}

#[test]
fn test_function_named_like_a_global_is_rejected() {
    let program = Program::new(
        vec![VariableAssignment::new("report", Expression::Integer(1))],
        vec![Function::new("report", vec![])],
        vec![],
    );

    assert_eq!(compile_error_name(&program), "CodeGenError");
}

#[test]
fn test_duplicate_functions_are_rejected() {
    let program = Program::new(
        vec![],
        vec![Function::new("report", vec![]), Function::new("report", vec![])],
        vec![],
    );

    assert_eq!(compile_error_name(&program), "CodeGenError");
}

#[test]
fn test_global_named_like_the_entry_point_is_rejected() {
    let program = Program::new(
        vec![VariableAssignment::new("main", Expression::Integer(2))],
        vec![],
        vec![],
    );

    assert_eq!(compile_error_name(&program), "CodeGenError");
}

#[test]
fn test_nan_is_not_nan() {
    let context = Context::create();
    let mut backend = LlvmBackend::new(&context, "test");
    backend.enter_function("main", FunctionKind::Entry).unwrap();
    let mut codegen = CodeGenContext::new(backend, CompileOptions::default());

    let nan = || {
        create_operation(
            Expression::Double(0.0),
            ArithmeticOperator::Division as i32,
            Expression::Double(0.0),
        )
        .unwrap()
    };
    let is_not = create_operation(nan(), ComparisonOperator::IsNot as i32, nan()).unwrap();
    let equals = create_operation(nan(), ComparisonOperator::Equals as i32, nan()).unwrap();

    let is_not = gen_expression(&mut codegen, &is_not).unwrap();
    let equals = gen_expression(&mut codegen, &equals).unwrap();

    match (is_not.value, equals.value) {
        (BasicValueEnum::IntValue(is_not), BasicValueEnum::IntValue(equals)) => {
            assert_eq!(is_not.get_zero_extended_constant(), Some(1));
            assert_eq!(equals.get_zero_extended_constant(), Some(0));
        }
        other => panic!("expected booleans, found {:?}", other),
    }
}
