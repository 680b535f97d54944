//! Unit tests for the symbol table and the type pass.

use crate::ast::{
    ast::{Expression, Statement},
    operators::create_operation,
    statements::{Function, Program, VariableAssignment},
    types::Datatype,
};

use super::{
    symbol_table::SymbolTable,
    type_checker::{build_symbol_table, infer_type, register_symbols},
};

fn op(left: Expression, code: i32, right: Expression) -> Expression {
    create_operation(left, code, right).unwrap()
}

#[test]
fn test_lookup_walks_outwards() {
    let mut table: SymbolTable<i64> = SymbolTable::new("global");
    let root = table.root();
    table.declare(root, "x", 1);

    let function = table.enter(root, "f");
    let block = table.enter(function, "block");

    assert_eq!(table.lookup(block, "x"), Some(&1));
    assert_eq!(table.depth(block), 2);
}

#[test]
fn test_shadowing_is_restored_after_exit() {
    let mut table: SymbolTable<i64> = SymbolTable::new("global");
    let outer = table.root();
    table.declare(outer, "x", 1);

    let inner = table.enter(outer, "block");
    table.declare(inner, "x", 2);
    assert_eq!(table.lookup(inner, "x"), Some(&2));

    // Leaving the inner scope means looking up from its parent again
    let current = table.parent(inner).unwrap();
    assert_eq!(current, outer);
    assert_eq!(table.lookup(current, "x"), Some(&1));
}

#[test]
fn test_siblings_do_not_see_each_other() {
    let mut table: SymbolTable<i64> = SymbolTable::new("global");
    let root = table.root();
    let first = table.enter(root, "first");
    let second = table.enter(root, "second");
    table.declare(first, "only_first", 7);

    assert_eq!(table.lookup(first, "only_first"), Some(&7));
    assert_eq!(table.lookup(second, "only_first"), None);
    assert_eq!(table.lookup(root, "only_first"), None);
}

#[test]
fn test_last_write_wins_within_scope() {
    let mut table: SymbolTable = SymbolTable::new("global");
    let root = table.root();
    table.declare(root, "x", Datatype::Integer);
    table.declare(root, "x", Datatype::Double);

    assert_eq!(table.lookup(root, "x"), Some(&Datatype::Double));
    assert_eq!(table.scope(root).len(), 1);
}

#[test]
fn test_literal_types_are_stable() {
    let table: SymbolTable = SymbolTable::new("global");
    let root = table.root();
    let literals = [
        (Expression::Integer(42), Datatype::Integer),
        (Expression::Double(0.5), Datatype::Double),
        (Expression::string("s"), Datatype::String),
        (Expression::Boolean(true), Datatype::Boolean),
    ];

    for (literal, expected) in literals.iter() {
        for _ in 0..3 {
            assert_eq!(infer_type(literal, &table, root).unwrap(), *expected);
        }
    }
    assert!(table.scope(root).is_empty());
}

#[test]
fn test_identifier_type_comes_from_scope() {
    let mut table: SymbolTable = SymbolTable::new("global");
    let root = table.root();
    table.declare(root, "x", Datatype::Double);

    assert_eq!(
        infer_type(&Expression::identifier("x"), &table, root).unwrap(),
        Datatype::Double
    );

    let error = infer_type(&Expression::identifier("y"), &table, root).unwrap_err();
    assert_eq!(error.get_error_name(), "UndefinedSymbolError");
    assert_eq!(error.get_node(), "Identifier(y)");
}

#[test]
fn test_arithmetic_widening() {
    let table: SymbolTable = SymbolTable::new("global");
    let root = table.root();

    let int_int = op(Expression::Integer(1), 0x100, Expression::Integer(2));
    let int_double = op(Expression::Integer(1), 0x102, Expression::Double(2.0));
    let double_int = op(Expression::Double(1.0), 0x103, Expression::Integer(2));
    let double_double = op(Expression::Double(1.0), 0x104, Expression::Double(2.0));

    assert_eq!(infer_type(&int_int, &table, root).unwrap(), Datatype::Integer);
    assert_eq!(infer_type(&int_double, &table, root).unwrap(), Datatype::Double);
    assert_eq!(infer_type(&double_int, &table, root).unwrap(), Datatype::Double);
    assert_eq!(infer_type(&double_double, &table, root).unwrap(), Datatype::Double);
}

#[test]
fn test_operator_type_mismatches() {
    let table: SymbolTable = SymbolTable::new("global");
    let root = table.root();

    let cases = [
        op(Expression::Integer(1), 0x100, Expression::string("a")),
        op(Expression::Boolean(true), 0x101, Expression::Integer(1)),
        op(Expression::string("a"), 0x204, Expression::string("a")),
        op(Expression::Boolean(true), 0x203, Expression::Boolean(false)),
        op(Expression::Integer(1), 0x204, Expression::Boolean(false)),
        op(Expression::Integer(1), 0x300, Expression::Boolean(false)),
        Expression::not(Expression::Integer(0)),
    ];

    for case in cases.iter() {
        let error = infer_type(case, &table, root).unwrap_err();
        assert_eq!(error.get_error_name(), "TypeMismatchError", "{:?}", case);
    }
}

#[test]
fn test_comparison_and_boolean_results() {
    let table: SymbolTable = SymbolTable::new("global");
    let root = table.root();

    let less = op(Expression::Integer(1), 0x203, Expression::Double(2.0));
    let bool_equals = op(Expression::Boolean(true), 0x204, Expression::Boolean(true));
    let xor = op(Expression::Boolean(true), 0x302, less.clone());
    let not = Expression::not(xor.clone());

    for expression in [less, bool_equals, xor, not].iter() {
        assert_eq!(infer_type(expression, &table, root).unwrap(), Datatype::Boolean);
    }
}

#[test]
fn test_print_of_undeclared_identifier_fails() {
    let mut table: SymbolTable = SymbolTable::new("global");
    let root = table.root();

    let error = register_symbols(
        &Statement::print_value(Expression::identifier("y")),
        &mut table,
        root,
    )
    .unwrap_err();
    assert_eq!(error.get_error_name(), "UndefinedSymbolError");
}

#[test]
fn test_block_declarations_stay_inside() {
    let program = Program::from_statements(vec![
        Statement::assign("x", Expression::Integer(1)),
        Statement::block(vec![Statement::assign("inner", Expression::Integer(2))]),
        Statement::print_value(Expression::identifier("inner")),
    ]);

    let error = build_symbol_table(&program).unwrap_err();
    assert_eq!(error.get_error_name(), "UndefinedSymbolError");
}

#[test]
fn test_functions_see_globals_only() {
    let sees_global = Program::new(
        vec![VariableAssignment::new("g", Expression::Integer(1))],
        vec![Function::new(
            "f",
            vec![Statement::print_value(Expression::identifier("g"))],
        )],
        vec![],
    );
    let table = build_symbol_table(&sees_global).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.lookup(table.root(), "g"), Some(&Datatype::Integer));

    let sees_later_statement = Program::new(
        vec![],
        vec![Function::new(
            "f",
            vec![Statement::print_value(Expression::identifier("late"))],
        )],
        vec![Statement::assign("late", Expression::Integer(1))],
    );
    assert!(build_symbol_table(&sees_later_statement).is_err());
}

#[test]
fn test_redeclaration_changes_type() {
    let program = Program::from_statements(vec![
        Statement::assign("x", Expression::Integer(1)),
        Statement::assign("x", Expression::Boolean(true)),
        Statement::expression(Expression::not(Expression::identifier("x"))),
    ]);

    let table = build_symbol_table(&program).unwrap();
    assert_eq!(table.lookup(table.root(), "x"), Some(&Datatype::Boolean));
}
