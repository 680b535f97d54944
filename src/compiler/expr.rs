use tracing::trace;

use crate::{
    ast::{ast::Expression, types::Datatype},
    errors::errors::{Error, ErrorImpl},
    type_checker::type_checker::{
        arithmetic_type, boolean_type, comparison_type, not_type, require_known,
    },
};

use super::{
    backend::{Backend, NumericKind},
    compiler::{CodeGenContext, Typed},
};

/// Converts an integer operand to double when the operation was widened.
fn coerce<B: Backend>(
    context: &mut CodeGenContext<B>,
    operand: Typed<B::Value>,
    target: Datatype,
) -> Result<B::Value, Error> {
    match (operand.datatype, target) {
        (Datatype::Integer, Datatype::Double) => context.backend.build_int_to_double(operand.value),
        _ => Ok(operand.value),
    }
}

fn numeric_kind(datatype: Datatype) -> NumericKind {
    match datatype {
        Datatype::Double => NumericKind::Double,
        _ => NumericKind::Integer,
    }
}

/// Generates backend values for the given expression.
///
/// Operands are lowered left to right, then the single matching instruction
/// is emitted. Operand types are checked again with the same rules as the
/// type pass, since identifiers now resolve to generated values.
pub fn gen_expression<B: Backend>(
    context: &mut CodeGenContext<B>,
    expression: &Expression,
) -> Result<Typed<B::Value>, Error> {
    trace!(expression = %expression.describe(), "lowering expression");

    let typed = match expression {
        Expression::Integer(value) => {
            Typed::new(Datatype::Integer, context.backend.const_int(*value))
        }
        Expression::Double(value) => {
            Typed::new(Datatype::Double, context.backend.const_double(*value))
        }
        Expression::Boolean(value) => {
            Typed::new(Datatype::Boolean, context.backend.const_bool(*value))
        }
        Expression::String(value) => {
            Typed::new(Datatype::String, context.backend.const_string(value)?)
        }
        Expression::Identifier(name) => context.search_value(name).ok_or_else(|| {
            Error::new(
                ErrorImpl::UndefinedSymbol { name: name.clone() },
                expression.describe(),
            )
        })?,
        Expression::Arithmetic(operation) => {
            let left = gen_expression(context, &operation.left)?;
            let right = gen_expression(context, &operation.right)?;
            let datatype = arithmetic_type(
                operation.operator,
                left.datatype,
                right.datatype,
                expression.describe(),
            )?;

            let left = coerce(context, left, datatype)?;
            let right = coerce(context, right, datatype)?;
            let value = context.backend.build_arithmetic(
                operation.operator,
                numeric_kind(datatype),
                left,
                right,
            )?;
            Typed::new(datatype, value)
        }
        Expression::Comparison(operation) => {
            let left = gen_expression(context, &operation.left)?;
            let right = gen_expression(context, &operation.right)?;
            let datatype = comparison_type(
                operation.operator,
                left.datatype,
                right.datatype,
                expression.describe(),
            )?;

            // Booleans compare as 1-bit integers and need no widening
            let operand_type = left.datatype.widen(right.datatype).unwrap_or(Datatype::Boolean);
            let left = coerce(context, left, operand_type)?;
            let right = coerce(context, right, operand_type)?;
            let value = context.backend.build_comparison(
                operation.operator,
                numeric_kind(operand_type),
                left,
                right,
            )?;
            Typed::new(datatype, value)
        }
        Expression::Logical(operation) => {
            let left = gen_expression(context, &operation.left)?;
            let right = gen_expression(context, &operation.right)?;
            let datatype = boolean_type(
                operation.operator,
                left.datatype,
                right.datatype,
                expression.describe(),
            )?;

            let value = context
                .backend
                .build_boolean(operation.operator, left.value, right.value)?;
            Typed::new(datatype, value)
        }
        Expression::Not(not) => {
            let operand = gen_expression(context, &not.expression)?;
            let datatype = not_type(operand.datatype, expression.describe())?;

            let value = context.backend.build_not(operand.value)?;
            Typed::new(datatype, value)
        }
    };

    require_known(typed.datatype, expression)?;
    Ok(typed)
}
