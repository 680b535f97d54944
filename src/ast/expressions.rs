use std::fmt::Display;

use super::ast::{print_line, Expression, Node};

// OPERATIONS

/// Binary Operation
/// An operator applied to two owned operands. `Op` is one of the operator
/// enums, so each category gets its own expression variant.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOperation<Op> {
    pub operator: Op,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

impl<Op: Display> BinaryOperation<Op> {
    pub fn new(operator: Op, left: Expression, right: Expression) -> Self {
        BinaryOperation {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub(crate) fn print_as(&self, category: &str, tabs: usize, out: &mut String) {
        print_line(tabs, out, format!("{}: {}", category, self.operator));
        self.left.print(tabs + 1, out);
        self.right.print(tabs + 1, out);
    }
}

/// Not Operation
/// Logical negation of a boolean operand.
#[derive(Debug, Clone, PartialEq)]
pub struct NotOperation {
    pub expression: Box<Expression>,
}

impl NotOperation {
    pub fn new(expression: Expression) -> Self {
        NotOperation {
            expression: Box::new(expression),
        }
    }
}

impl Node for NotOperation {
    fn print(&self, tabs: usize, out: &mut String) {
        print_line(tabs, out, "NotOperation:");
        self.expression.print(tabs + 1, out);
    }
}
