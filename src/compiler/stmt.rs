use tracing::{debug, trace};

use crate::{
    ast::{
        ast::{Expression, Statement},
        statements::{Function, Print, Program, VariableAssignment},
    },
    errors::errors::{codegen_error, Error},
};

use super::{
    backend::{Backend, FunctionKind, ValueKind},
    compiler::{CodeGenContext, PRINTF},
    expr::gen_expression,
};

/// Lowers a print statement into a `printf` call.
///
/// The format descriptor is chosen from the type the backend reports for the
/// lowered operand. Integers narrower than 64 bits (booleans) are widened to
/// match `%lld`.
pub fn gen_print<B: Backend>(
    context: &mut CodeGenContext<B>,
    print: &Print,
) -> Result<B::Value, Error> {
    let operand = gen_expression(context, &print.expression)?;
    let formats = context
        .formats
        .ok_or_else(|| codegen_error("printf has not been declared", "Print"))?;

    let (format, value) = match context.backend.value_kind(operand.value) {
        ValueKind::Double => (formats.double, operand.value),
        ValueKind::Integer { bits } if bits < 64 => (
            formats.integer,
            context.backend.build_widen_int(operand.value)?,
        ),
        ValueKind::Integer { .. } => (formats.integer, operand.value),
        ValueKind::Pointer => (formats.string, operand.value),
        ValueKind::Other => {
            return Err(codegen_error(
                "value has no print format",
                describe_operand(&print.expression),
            ))
        }
    };

    context.backend.build_call(PRINTF, &[format, value])
}

fn describe_operand(expression: &Expression) -> String {
    format!("Print({})", expression.describe())
}

pub fn gen_statement<B: Backend>(
    context: &mut CodeGenContext<B>,
    statement: &Statement,
) -> Result<(), Error> {
    trace!(statement = %statement.describe(), "lowering statement");

    match statement {
        Statement::Expression(expression_statement) => {
            gen_expression(context, &expression_statement.expression)?;
        }
        Statement::Print(print) => {
            gen_print(context, print)?;
        }
        Statement::Assignment(assignment) => {
            let value = gen_expression(context, &assignment.value)?;
            context.declare_value(&assignment.name, value);
        }
        Statement::Block(block) => {
            context.enter_scope("block");
            for statement in block.statements.iter() {
                gen_statement(context, statement)?;
            }
            context.exit_scope();
        }
    }

    Ok(())
}

/// Lowers a global into a read-only backend global and binds it in the root
/// scope.
pub fn gen_global<B: Backend>(
    context: &mut CodeGenContext<B>,
    global: &VariableAssignment,
) -> Result<(), Error> {
    let value = gen_expression(context, &global.value)?;
    context.backend.define_global(&global.name, value.value)?;

    let root = context.values.root();
    context.values.declare(root, &global.name, value);
    Ok(())
}

/// Lowers a function body in its own scope and backend function.
pub fn gen_function<B: Backend>(
    context: &mut CodeGenContext<B>,
    function: &Function,
) -> Result<(), Error> {
    debug!(function = %function.name, "generating function");

    let previous_function = context.current_function.replace(function.name.clone());
    context.enter_scope(&function.name);
    context
        .backend
        .enter_function(&function.name, FunctionKind::Procedure)?;

    for statement in function.body.statements.iter() {
        gen_statement(context, statement)?;
    }

    context.backend.leave_function(FunctionKind::Procedure)?;
    context.exit_scope();
    context.current_function = previous_function;
    Ok(())
}

/// Lowers globals, then functions, then top-level statements.
pub fn gen_program<B: Backend>(
    context: &mut CodeGenContext<B>,
    program: &Program,
) -> Result<(), Error> {
    for global in program.globals.iter() {
        gen_global(context, global)?;
    }

    for function in program.functions.iter() {
        gen_function(context, function)?;
    }

    for statement in program.statements.iter() {
        gen_statement(context, statement)?;
    }

    Ok(())
}
