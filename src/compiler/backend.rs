//! Capability surface the code generator needs from an IR backend.
//!
//! The generator never touches a concrete IR library directly. `LlvmBackend`
//! implements this trait on top of inkwell; `RecordingBackend` implements it
//! by recording instructions so lowering can be tested without LLVM.

use std::fmt::{Debug, Display};

use crate::{
    ast::operators::{ArithmeticOperator, BooleanOperator, ComparisonOperator},
    errors::errors::Error,
};

/// The type of a generated value, as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Integer { bits: u32 },
    Double,
    Pointer,
    /// Aggregates and anything else the generator never produces itself.
    Other,
}

/// Which family of instruction an arithmetic or comparison lowers to.
///
/// Booleans are compared as 1-bit integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    Integer,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    /// The program entry point. Returns an `i32` exit status of 0.
    Entry,
    /// A parameterless procedure returning nothing.
    Procedure,
}

impl Display for NumericKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumericKind::Integer => write!(f, "int"),
            NumericKind::Double => write!(f, "double"),
        }
    }
}

pub trait Backend {
    type Value: Copy + Debug;

    fn const_int(&mut self, value: i64) -> Self::Value;
    fn const_double(&mut self, value: f64) -> Self::Value;
    fn const_bool(&mut self, value: bool) -> Self::Value;
    /// Creates a global NUL-terminated string and returns a pointer to it.
    fn const_string(&mut self, value: &str) -> Result<Self::Value, Error>;

    fn value_kind(&self, value: Self::Value) -> ValueKind;

    /// Signed integer to double conversion.
    fn build_int_to_double(&mut self, value: Self::Value) -> Result<Self::Value, Error>;
    /// Zero-extends an integer narrower than 64 bits to 64 bits.
    fn build_widen_int(&mut self, value: Self::Value) -> Result<Self::Value, Error>;

    fn build_arithmetic(
        &mut self,
        operator: ArithmeticOperator,
        kind: NumericKind,
        left: Self::Value,
        right: Self::Value,
    ) -> Result<Self::Value, Error>;

    fn build_comparison(
        &mut self,
        operator: ComparisonOperator,
        kind: NumericKind,
        left: Self::Value,
        right: Self::Value,
    ) -> Result<Self::Value, Error>;

    fn build_boolean(
        &mut self,
        operator: BooleanOperator,
        left: Self::Value,
        right: Self::Value,
    ) -> Result<Self::Value, Error>;

    fn build_not(&mut self, value: Self::Value) -> Result<Self::Value, Error>;

    /// Declares an external `i32 name(i8*, ...)` function.
    fn declare_variadic(&mut self, name: &str) -> Result<(), Error>;
    fn build_call(&mut self, name: &str, arguments: &[Self::Value]) -> Result<Self::Value, Error>;

    /// Emits a named, read-only global initialised with a constant value.
    fn define_global(&mut self, name: &str, value: Self::Value) -> Result<(), Error>;

    /// Starts a function body. Emission continues inside it until the matching
    /// `leave_function`, which resumes the enclosing function, if any.
    fn enter_function(&mut self, name: &str, kind: FunctionKind) -> Result<(), Error>;
    fn leave_function(&mut self, kind: FunctionKind) -> Result<(), Error>;

    /// Completes the module. With `verify`, an invalid module is an error.
    fn finalize(&mut self, verify: bool) -> Result<(), Error>;
}
