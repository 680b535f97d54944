//! Error types and error handling for the compiler.
//!
//! This module defines the error taxonomy shared by both compilation passes:
//!
//! - Undefined symbols, found during symbol registration or code generation
//! - Type mismatches between an operator and its operands
//! - Operator codes outside the recognised ranges
//! - Backend failures while emitting IR
//!
//! Every error is fatal and aborts the compilation it was raised in.

pub mod errors;
