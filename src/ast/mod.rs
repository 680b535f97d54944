/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Core node enums and the `Node` tree-dump trait
/// - expressions: Operator and negation expression nodes
/// - operators: Operator codes and the operator factory
/// - statements: Statement, function and program nodes
/// - types: The closed set of value types
pub mod ast;
pub mod expressions;
pub mod operators;
pub mod statements;
pub mod types;

#[cfg(test)]
mod tests;
