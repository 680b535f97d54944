use std::fmt::{Debug, Write};

use super::{
    expressions::{BinaryOperation, NotOperation},
    operators::{ArithmeticOperator, BooleanOperator, ComparisonOperator},
    statements::{Block, ExpressionStatement, Print, VariableAssignment},
};

/// Node Trait
///
/// Every AST element can render itself as an indented tree dump, one tab per
/// level of nesting.
pub trait Node: Debug {
    /// Appends this node and its children to `out`, starting at depth `tabs`.
    fn print(&self, tabs: usize, out: &mut String);

    /// Renders the subtree rooted at this node.
    fn dump(&self) -> String {
        let mut out = String::new();
        self.print(0, &mut out);
        out
    }
}

pub(crate) fn print_line(tabs: usize, out: &mut String, line: impl std::fmt::Display) {
    for _ in 0..tabs {
        out.push('\t');
    }
    // Writing into a String cannot fail
    let _ = writeln!(out, "{}", line);
}

/// Expression Types
///
/// Closed set of expression kinds. Operands are owned by their parent node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Integer(i64),
    Double(f64),
    String(String),
    Boolean(bool),
    Identifier(String),
    Arithmetic(BinaryOperation<ArithmeticOperator>),
    Comparison(BinaryOperation<ComparisonOperator>),
    Logical(BinaryOperation<BooleanOperator>),
    Not(NotOperation),
}

impl Expression {
    pub fn identifier(name: impl Into<String>) -> Self {
        Expression::Identifier(name.into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expression::String(value.into())
    }

    pub fn not(expression: Expression) -> Self {
        Expression::Not(NotOperation::new(expression))
    }

    /// Short label used to point diagnostics at this node.
    pub fn describe(&self) -> String {
        match self {
            Expression::Integer(value) => format!("Integer({})", value),
            Expression::Double(value) => format!("Double({})", value),
            Expression::String(value) => format!("String({:?})", value),
            Expression::Boolean(value) => format!("Boolean({})", value),
            Expression::Identifier(name) => format!("Identifier({})", name),
            Expression::Arithmetic(operation) => format!("Arithmetic({})", operation.operator),
            Expression::Comparison(operation) => format!("Comparison({})", operation.operator),
            Expression::Logical(operation) => format!("Logical({})", operation.operator),
            Expression::Not(_) => String::from("NotOperation"),
        }
    }
}

impl Node for Expression {
    fn print(&self, tabs: usize, out: &mut String) {
        match self {
            Expression::Integer(value) => print_line(tabs, out, format!("Integer: {}", value)),
            Expression::Double(value) => print_line(tabs, out, format!("Double: {}", value)),
            Expression::String(value) => print_line(tabs, out, format!("String: {}", value)),
            Expression::Boolean(value) => print_line(tabs, out, format!("Boolean: {}", value)),
            Expression::Identifier(name) => print_line(tabs, out, format!("Identifier: {}", name)),
            Expression::Arithmetic(operation) => operation.print_as("Arithmetic", tabs, out),
            Expression::Comparison(operation) => operation.print_as("Comparison", tabs, out),
            Expression::Logical(operation) => operation.print_as("Logical", tabs, out),
            Expression::Not(not) => not.print(tabs, out),
        }
    }
}

/// Statement Types
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Expression(ExpressionStatement),
    Print(Print),
    Assignment(VariableAssignment),
    Block(Block),
}

impl Statement {
    pub fn expression(expression: Expression) -> Self {
        Statement::Expression(ExpressionStatement::new(expression))
    }

    pub fn print_value(expression: Expression) -> Self {
        Statement::Print(Print::new(expression))
    }

    pub fn assign(name: impl Into<String>, value: Expression) -> Self {
        Statement::Assignment(VariableAssignment::new(name, value))
    }

    pub fn block(statements: Vec<Statement>) -> Self {
        Statement::Block(Block::new(statements))
    }

    pub fn describe(&self) -> String {
        match self {
            Statement::Expression(_) => String::from("ExpressionStatement"),
            Statement::Print(_) => String::from("Print"),
            Statement::Assignment(assignment) => {
                format!("VariableAssignment({})", assignment.name)
            }
            Statement::Block(_) => String::from("Block"),
        }
    }
}

impl Node for Statement {
    fn print(&self, tabs: usize, out: &mut String) {
        match self {
            Statement::Expression(statement) => statement.print(tabs, out),
            Statement::Print(print) => print.print(tabs, out),
            Statement::Assignment(assignment) => assignment.print(tabs, out),
            Statement::Block(block) => block.print(tabs, out),
        }
    }
}
