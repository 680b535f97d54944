//! Operator codes and the operator factory.
//!
//! The parser hands over binary operators as numeric codes. The high-order
//! tag bits (`code & 0xF00`) select the category and the low bits select the
//! operator inside it:
//!
//! | category   | tag     | members                                        |
//! |------------|---------|------------------------------------------------|
//! | arithmetic | `0x100` | addition, subtraction, multiplication, division, modulo |
//! | comparison | `0x200` | leq, geq, greater, less, equals, is_not        |
//! | boolean    | `0x300` | and, or, xor                                   |

use std::fmt::Display;

use tracing::trace;

use crate::errors::errors::{Error, ErrorImpl};

use super::{ast::Expression, expressions::BinaryOperation};

const CATEGORY_MASK: i32 = 0xF00;

/// Operator categories, valued by their tag bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    ArithmeticOp = 0x100,
    ComparisonOp = 0x200,
    BooleanOp = 0x300,
}

impl OperationType {
    pub fn categorize(code: i32) -> Option<OperationType> {
        match code & CATEGORY_MASK {
            0x100 => Some(OperationType::ArithmeticOp),
            0x200 => Some(OperationType::ComparisonOp),
            0x300 => Some(OperationType::BooleanOp),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOperator {
    Addition = 0x100,
    Subtraction,
    Multiplication,
    Division,
    Modulo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Leq = 0x200,
    Geq,
    Greater,
    Less,
    Equals,
    IsNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOperator {
    And = 0x300,
    Or,
    Xor,
}

impl ComparisonOperator {
    /// Equality operators are the only comparisons defined on booleans.
    pub fn is_equality(&self) -> bool {
        matches!(self, ComparisonOperator::Equals | ComparisonOperator::IsNot)
    }
}

impl TryFrom<i32> for ArithmeticOperator {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Ok(match code {
            0x100 => ArithmeticOperator::Addition,
            0x101 => ArithmeticOperator::Subtraction,
            0x102 => ArithmeticOperator::Multiplication,
            0x103 => ArithmeticOperator::Division,
            0x104 => ArithmeticOperator::Modulo,
            _ => return Err(unsupported(code)),
        })
    }
}

impl TryFrom<i32> for ComparisonOperator {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Ok(match code {
            0x200 => ComparisonOperator::Leq,
            0x201 => ComparisonOperator::Geq,
            0x202 => ComparisonOperator::Greater,
            0x203 => ComparisonOperator::Less,
            0x204 => ComparisonOperator::Equals,
            0x205 => ComparisonOperator::IsNot,
            _ => return Err(unsupported(code)),
        })
    }
}

impl TryFrom<i32> for BooleanOperator {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Ok(match code {
            0x300 => BooleanOperator::And,
            0x301 => BooleanOperator::Or,
            0x302 => BooleanOperator::Xor,
            _ => return Err(unsupported(code)),
        })
    }
}

impl Display for ArithmeticOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ArithmeticOperator::Addition => "addition",
            ArithmeticOperator::Subtraction => "subtraction",
            ArithmeticOperator::Multiplication => "multiplication",
            ArithmeticOperator::Division => "division",
            ArithmeticOperator::Modulo => "modulo",
        };
        write!(f, "{}", name)
    }
}

impl Display for ComparisonOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ComparisonOperator::Leq => "leq",
            ComparisonOperator::Geq => "geq",
            ComparisonOperator::Greater => "greater",
            ComparisonOperator::Less => "less",
            ComparisonOperator::Equals => "equals",
            ComparisonOperator::IsNot => "isNot",
        };
        write!(f, "{}", name)
    }
}

impl Display for BooleanOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BooleanOperator::And => "and",
            BooleanOperator::Or => "or",
            BooleanOperator::Xor => "xor",
        };
        write!(f, "{}", name)
    }
}

fn unsupported(code: i32) -> Error {
    Error::new(
        ErrorImpl::UnsupportedOperator { code },
        format!("{:#x}", code),
    )
}

/// Builds the operator node matching `op_code`, taking ownership of both operands.
///
/// Fails with `UnsupportedOperatorError` for any code outside the three
/// categories, or past the last member of its category.
pub fn create_operation(
    left: Expression,
    op_code: i32,
    right: Expression,
) -> Result<Expression, Error> {
    let category = OperationType::categorize(op_code).ok_or_else(|| unsupported(op_code))?;
    trace!(op_code, ?category, "creating operation");

    Ok(match category {
        OperationType::ArithmeticOp => Expression::Arithmetic(BinaryOperation::new(
            ArithmeticOperator::try_from(op_code)?,
            left,
            right,
        )),
        OperationType::ComparisonOp => Expression::Comparison(BinaryOperation::new(
            ComparisonOperator::try_from(op_code)?,
            left,
            right,
        )),
        OperationType::BooleanOp => Expression::Logical(BinaryOperation::new(
            BooleanOperator::try_from(op_code)?,
            left,
            right,
        )),
    })
}
