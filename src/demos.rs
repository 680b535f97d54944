//! Bundled demo programs.
//!
//! Source text is parsed outside this crate, so the binary compiles trees
//! built here instead.

use crate::{
    ast::{
        ast::{Expression, Statement},
        operators::{create_operation, ArithmeticOperator, BooleanOperator, ComparisonOperator},
        statements::{Function, Program, VariableAssignment},
    },
    errors::errors::Error,
};

pub const DEMOS: [&str; 5] = ["hello", "arithmetic", "logic", "scopes", "globals"];

fn arithmetic(
    left: Expression,
    operator: ArithmeticOperator,
    right: Expression,
) -> Result<Expression, Error> {
    create_operation(left, operator as i32, right)
}

fn comparison(
    left: Expression,
    operator: ComparisonOperator,
    right: Expression,
) -> Result<Expression, Error> {
    create_operation(left, operator as i32, right)
}

fn logical(
    left: Expression,
    operator: BooleanOperator,
    right: Expression,
) -> Result<Expression, Error> {
    create_operation(left, operator as i32, right)
}

fn hello() -> Result<Program, Error> {
    Ok(Program::from_statements(vec![
        Statement::print_value(Expression::Integer(42)),
        Statement::print_value(Expression::string("hello, world")),
    ]))
}

fn arithmetic_demo() -> Result<Program, Error> {
    use ArithmeticOperator::*;

    Ok(Program::from_statements(vec![
        Statement::print_value(arithmetic(
            Expression::Integer(3),
            Addition,
            Expression::Integer(4),
        )?),
        Statement::assign(
            "half",
            arithmetic(Expression::Integer(7), Division, Expression::Double(2.0))?,
        ),
        Statement::print_value(Expression::identifier("half")),
        Statement::print_value(arithmetic(
            arithmetic(Expression::Integer(17), Modulo, Expression::Integer(5))?,
            Multiplication,
            Expression::Integer(-3),
        )?),
    ]))
}

fn logic() -> Result<Program, Error> {
    Ok(Program::from_statements(vec![
        Statement::print_value(Expression::not(Expression::Boolean(false))),
        Statement::assign(
            "in_range",
            logical(
                comparison(
                    Expression::Integer(1),
                    ComparisonOperator::Leq,
                    Expression::Double(1.5),
                )?,
                BooleanOperator::And,
                comparison(
                    Expression::Double(1.5),
                    ComparisonOperator::Less,
                    Expression::Integer(2),
                )?,
            )?,
        ),
        Statement::print_value(Expression::identifier("in_range")),
        Statement::print_value(logical(
            Expression::identifier("in_range"),
            BooleanOperator::Xor,
            Expression::Boolean(true),
        )?),
    ]))
}

fn scopes() -> Result<Program, Error> {
    Ok(Program::from_statements(vec![
        Statement::assign("x", Expression::Integer(1)),
        Statement::block(vec![
            Statement::assign("x", Expression::Double(2.5)),
            Statement::print_value(Expression::identifier("x")),
        ]),
        Statement::print_value(Expression::identifier("x")),
    ]))
}

fn globals() -> Result<Program, Error> {
    let scale = VariableAssignment::new(
        "scale",
        arithmetic(
            Expression::Integer(6),
            ArithmeticOperator::Multiplication,
            Expression::Integer(7),
        )?,
    );
    let report = Function::new(
        "report",
        vec![Statement::print_value(Expression::identifier("scale"))],
    );

    Ok(Program::new(
        vec![scale],
        vec![report],
        vec![Statement::print_value(arithmetic(
            Expression::identifier("scale"),
            ArithmeticOperator::Subtraction,
            Expression::Integer(2),
        )?)],
    ))
}

/// Builds the demo called `name`, or `None` if there is no such demo.
pub fn demo(name: &str) -> Option<Result<Program, Error>> {
    match name {
        "hello" => Some(hello()),
        "arithmetic" => Some(arithmetic_demo()),
        "logic" => Some(logic()),
        "scopes" => Some(scopes()),
        "globals" => Some(globals()),
        _ => None,
    }
}
