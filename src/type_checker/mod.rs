//! Type checking and symbol resolution module.
//!
//! This module implements the first compilation pass. It:
//!
//! - Builds the scoped symbol table (an arena of scopes with parent handles)
//! - Infers the type of every expression
//! - Checks operand types against each operator category
//! - Detects use of undeclared identifiers before any code is generated

pub mod symbol_table;
pub mod type_checker;

#[cfg(test)]
mod tests;
