//! Code generation module for the compiler.
//!
//! This module lowers a checked program into a backend. It handles:
//!
//! - The backend capability trait and its LLVM and recording implementations
//! - Lowering of expressions and statements
//! - The `printf` intrinsic behind print statements
//! - Global and function generation

pub mod backend;
pub mod compiler;
pub mod expr;
pub mod llvm;
pub mod recording;
pub mod stmt;
