use tracing::{debug, trace};

use crate::{
    ast::{
        ast::{Expression, Statement},
        operators::{ArithmeticOperator, BooleanOperator, ComparisonOperator},
        statements::{Function, Program},
        types::Datatype,
    },
    errors::errors::{Error, ErrorImpl},
};

use super::symbol_table::{ScopeId, SymbolTable};

pub const GLOBAL_SCOPE: &str = "global";

fn mismatch(operator: impl ToString, left: Datatype, right: Datatype, node: String) -> Error {
    Error::new(
        ErrorImpl::TypeMismatch {
            operator: operator.to_string(),
            left: left.to_string(),
            right: right.to_string(),
        },
        node,
    )
}

/// Arithmetic needs two numeric operands and yields the wider of the two.
pub fn arithmetic_type(
    operator: ArithmeticOperator,
    left: Datatype,
    right: Datatype,
    node: String,
) -> Result<Datatype, Error> {
    left.widen(right).ok_or_else(|| mismatch(operator, left, right, node))
}

/// Comparisons need two numeric operands, or two booleans for the equality
/// operators. The result is always a boolean.
pub fn comparison_type(
    operator: ComparisonOperator,
    left: Datatype,
    right: Datatype,
    node: String,
) -> Result<Datatype, Error> {
    let comparable = match (left, right) {
        (Datatype::Boolean, Datatype::Boolean) => operator.is_equality(),
        _ => left.widen(right).is_some(),
    };

    if comparable {
        Ok(Datatype::Boolean)
    } else {
        Err(mismatch(operator, left, right, node))
    }
}

pub fn boolean_type(
    operator: BooleanOperator,
    left: Datatype,
    right: Datatype,
    node: String,
) -> Result<Datatype, Error> {
    if left == Datatype::Boolean && right == Datatype::Boolean {
        Ok(Datatype::Boolean)
    } else {
        Err(mismatch(operator, left, right, node))
    }
}

pub fn not_type(operand: Datatype, node: String) -> Result<Datatype, Error> {
    if operand == Datatype::Boolean {
        Ok(Datatype::Boolean)
    } else {
        Err(mismatch("not", operand, Datatype::Boolean, node))
    }
}

/// Rejects the uninferred type.
pub fn require_known(datatype: Datatype, expression: &Expression) -> Result<Datatype, Error> {
    if datatype.is_known() {
        Ok(datatype)
    } else {
        Err(Error::new(
            ErrorImpl::UnknownType {
                expression: expression.describe(),
            },
            expression.describe(),
        ))
    }
}

/// Infers the type of `expression` as seen from `scope`.
///
/// Literals map to a fixed type. Identifiers are looked up through the scope
/// chain and fail with `UndefinedSymbolError` when no scope binds them.
/// Operators check their operand types. Calling this has no side effects.
pub fn infer_type(
    expression: &Expression,
    table: &SymbolTable,
    scope: ScopeId,
) -> Result<Datatype, Error> {
    let datatype = match expression {
        Expression::Integer(_) => Datatype::Integer,
        Expression::Double(_) => Datatype::Double,
        Expression::String(_) => Datatype::String,
        Expression::Boolean(_) => Datatype::Boolean,
        Expression::Identifier(name) => *table.lookup(scope, name).ok_or_else(|| {
            Error::new(
                ErrorImpl::UndefinedSymbol { name: name.clone() },
                expression.describe(),
            )
        })?,
        Expression::Arithmetic(operation) => arithmetic_type(
            operation.operator,
            infer_type(&operation.left, table, scope)?,
            infer_type(&operation.right, table, scope)?,
            expression.describe(),
        )?,
        Expression::Comparison(operation) => comparison_type(
            operation.operator,
            infer_type(&operation.left, table, scope)?,
            infer_type(&operation.right, table, scope)?,
            expression.describe(),
        )?,
        Expression::Logical(operation) => boolean_type(
            operation.operator,
            infer_type(&operation.left, table, scope)?,
            infer_type(&operation.right, table, scope)?,
            expression.describe(),
        )?,
        Expression::Not(not) => not_type(
            infer_type(&not.expression, table, scope)?,
            expression.describe(),
        )?,
    };

    require_known(datatype, expression)
}

/// Registers the names a statement declares into `scope`.
///
/// Statements that only use names still infer their operand types, which is
/// where references to undeclared identifiers are caught.
pub fn register_symbols(
    statement: &Statement,
    table: &mut SymbolTable,
    scope: ScopeId,
) -> Result<(), Error> {
    trace!(
        statement = %statement.describe(),
        scope = %table.scope(scope).name,
        "registering symbols"
    );

    match statement {
        Statement::Expression(expression_statement) => {
            infer_type(&expression_statement.expression, table, scope)?;
        }
        Statement::Print(print) => {
            infer_type(&print.expression, table, scope)?;
        }
        Statement::Assignment(assignment) => {
            let datatype = infer_type(&assignment.value, table, scope)?;
            debug!(
                symbol = %assignment.name,
                %datatype,
                scope = %table.scope(scope).name,
                "declaring symbol"
            );
            table.declare(scope, &assignment.name, datatype);
        }
        Statement::Block(block) => {
            let block_scope = table.enter(scope, "block");
            for statement in block.statements.iter() {
                register_symbols(statement, table, block_scope)?;
            }
        }
    }

    Ok(())
}

/// Registers a function body in its own scope under `parent`.
pub fn register_function(
    function: &Function,
    table: &mut SymbolTable,
    parent: ScopeId,
) -> Result<(), Error> {
    let function_scope = table.enter(parent, &function.name);
    for statement in function.body.statements.iter() {
        register_symbols(statement, table, function_scope)?;
    }
    Ok(())
}

/// Runs the symbol-table pass over a whole program.
///
/// Globals, functions and top-level statements are visited in the order code
/// generation will lower them, so a name is only visible where it will have
/// been generated. The first error aborts the pass.
pub fn build_symbol_table(program: &Program) -> Result<SymbolTable, Error> {
    let mut table = SymbolTable::new(GLOBAL_SCOPE);
    let root = table.root();

    for global in program.globals.iter() {
        let datatype = infer_type(&global.value, &table, root)?;
        debug!(symbol = %global.name, %datatype, "declaring global");
        table.declare(root, &global.name, datatype);
    }

    for function in program.functions.iter() {
        register_function(function, &mut table, root)?;
    }

    for statement in program.statements.iter() {
        register_symbols(statement, &mut table, root)?;
    }

    debug!(scopes = table.len(), "symbol table built");
    Ok(table)
}
