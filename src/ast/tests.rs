//! Unit tests for the AST module.
//!
//! Covers the operator factory and the indented tree dump.

use pretty_assertions::assert_eq;

use super::{
    ast::{Expression, Node, Statement},
    operators::{
        create_operation, ArithmeticOperator, BooleanOperator, ComparisonOperator, OperationType,
    },
    statements::{Function, Program, VariableAssignment},
    types::Datatype,
};

#[test]
fn test_categorize_by_tag_bits() {
    assert_eq!(OperationType::categorize(0x104), Some(OperationType::ArithmeticOp));
    assert_eq!(OperationType::categorize(0x203), Some(OperationType::ComparisonOp));
    assert_eq!(OperationType::categorize(0x300), Some(OperationType::BooleanOp));
    assert_eq!(OperationType::categorize(0x000), None);
    assert_eq!(OperationType::categorize(0x400), None);
}

#[test]
fn test_create_operation_covers_every_code() {
    let arithmetic = [
        ArithmeticOperator::Addition,
        ArithmeticOperator::Subtraction,
        ArithmeticOperator::Multiplication,
        ArithmeticOperator::Division,
        ArithmeticOperator::Modulo,
    ];
    for operator in arithmetic {
        let expression =
            create_operation(Expression::Integer(1), operator as i32, Expression::Integer(2))
                .unwrap();
        match expression {
            Expression::Arithmetic(operation) => assert_eq!(operation.operator, operator),
            other => panic!("Expected arithmetic operation, got {:?}", other),
        }
    }

    let comparison = [
        ComparisonOperator::Leq,
        ComparisonOperator::Geq,
        ComparisonOperator::Greater,
        ComparisonOperator::Less,
        ComparisonOperator::Equals,
        ComparisonOperator::IsNot,
    ];
    for operator in comparison {
        let expression =
            create_operation(Expression::Integer(1), operator as i32, Expression::Integer(2))
                .unwrap();
        match expression {
            Expression::Comparison(operation) => assert_eq!(operation.operator, operator),
            other => panic!("Expected comparison operation, got {:?}", other),
        }
    }

    let boolean = [BooleanOperator::And, BooleanOperator::Or, BooleanOperator::Xor];
    for operator in boolean {
        let expression = create_operation(
            Expression::Boolean(true),
            operator as i32,
            Expression::Boolean(false),
        )
        .unwrap();
        match expression {
            Expression::Logical(operation) => assert_eq!(operation.operator, operator),
            other => panic!("Expected boolean operation, got {:?}", other),
        }
    }
}

#[test]
fn test_create_operation_keeps_operand_order() {
    let expression =
        create_operation(Expression::Integer(3), 0x101, Expression::Integer(4)).unwrap();

    match expression {
        Expression::Arithmetic(operation) => {
            assert_eq!(*operation.left, Expression::Integer(3));
            assert_eq!(*operation.right, Expression::Integer(4));
        }
        other => panic!("Expected arithmetic operation, got {:?}", other),
    }
}

#[test]
fn test_create_operation_rejects_unknown_codes() {
    for code in [0x000, 0x0FF, 0x400, 0x105, 0x206, 0x303, -1] {
        let error = create_operation(Expression::Integer(1), code, Expression::Integer(2))
            .expect_err("code outside the operator ranges must fail");
        assert_eq!(error.get_error_name(), "UnsupportedOperatorError");
    }
}

#[test]
fn test_dump_literals() {
    assert_eq!(Expression::Integer(42).dump(), "Integer: 42\n");
    assert_eq!(Expression::Double(1.5).dump(), "Double: 1.5\n");
    assert_eq!(Expression::string("hi").dump(), "String: hi\n");
    assert_eq!(Expression::Boolean(false).dump(), "Boolean: false\n");
    assert_eq!(Expression::identifier("x").dump(), "Identifier: x\n");
}

#[test]
fn test_dump_indents_by_depth() {
    let statement = Statement::expression(Expression::not(Expression::Boolean(false)));

    assert_eq!(
        statement.dump(),
        "ExpressionStatement:\n\tExpression:\n\tNotOperation:\n\t\tBoolean: false\n"
    );
}

#[test]
fn test_dump_operation() {
    let expression =
        create_operation(Expression::Integer(3), 0x100, Expression::identifier("y")).unwrap();

    let mut out = String::new();
    expression.print(1, &mut out);
    assert_eq!(out, "\tArithmetic: addition\n\t\tInteger: 3\n\t\tIdentifier: y\n");
}

#[test]
fn test_dump_program() {
    let program = Program::new(
        vec![VariableAssignment::new("x", Expression::Integer(1))],
        vec![Function::new(
            "show",
            vec![Statement::print_value(Expression::identifier("x"))],
        )],
        vec![Statement::block(vec![Statement::assign(
            "y",
            Expression::Double(2.5),
        )])],
    );

    let expected = "Program:\n\
                    \tGlobals:\n\
                    \t\tVariableAssignment: x\n\
                    \t\t\tInteger: 1\n\
                    \tFunctions:\n\
                    \t\tFunction: show\n\
                    \t\t\tPrint: \n\
                    \t\t\t\tIdentifier: x\n\
                    \tStatements:\n\
                    \t\tBlock:\n\
                    \t\t\tVariableAssignment: y\n\
                    \t\t\t\tDouble: 2.5\n";
    assert_eq!(program.dump(), expected);
}

#[test]
fn test_describe_nodes() {
    assert_eq!(Expression::identifier("y").describe(), "Identifier(y)");
    assert_eq!(
        create_operation(Expression::Integer(1), 0x203, Expression::Integer(2))
            .unwrap()
            .describe(),
        "Comparison(less)"
    );
    assert_eq!(
        Statement::assign("x", Expression::Integer(1)).describe(),
        "VariableAssignment(x)"
    );
}

#[test]
fn test_numeric_widening() {
    assert!(Datatype::Integer.is_numeric());
    assert!(Datatype::Double.is_numeric());
    assert!(!Datatype::Boolean.is_numeric());
    assert!(!Datatype::String.is_numeric());
    assert!(!Datatype::Unknown.is_numeric());

    assert_eq!(Datatype::Integer.widen(Datatype::Integer), Some(Datatype::Integer));
    assert_eq!(Datatype::Integer.widen(Datatype::Double), Some(Datatype::Double));
    assert_eq!(Datatype::Double.widen(Datatype::Integer), Some(Datatype::Double));
    assert_eq!(Datatype::Boolean.widen(Datatype::Integer), None);
    assert_eq!(Datatype::Unknown.widen(Datatype::Double), None);
}
