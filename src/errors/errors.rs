use std::fmt::Display;

use thiserror::Error;

/// A fatal compilation error.
///
/// Every error aborts the compilation it was raised in. The `node` field holds a
/// short description of the AST node that caused it (e.g. `Identifier(y)`), which
/// stands in for a source position since the tree arrives from an external parser.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{internal_error} at `{node}`")]
pub struct Error {
    internal_error: ErrorImpl,
    node: String,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, node: impl Into<String>) -> Self {
        Error {
            internal_error: error_impl,
            node: node.into(),
        }
    }

    pub fn get_node(&self) -> &str {
        &self.node
    }

    pub fn get_kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UndefinedSymbol { .. } => "UndefinedSymbolError",
            ErrorImpl::TypeMismatch { .. } => "TypeMismatchError",
            ErrorImpl::UnsupportedOperator { .. } => "UnsupportedOperatorError",
            ErrorImpl::UnknownType { .. } => "UnknownTypeError",
            ErrorImpl::CodeGen { .. } => "CodeGenError",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UndefinedSymbol { name } => ErrorTip::Suggestion(format!(
                "`{}` is not declared in this scope or any enclosing one",
                name
            )),
            ErrorImpl::TypeMismatch {
                operator,
                left,
                right,
            } => ErrorTip::Suggestion(format!(
                "Operator `{}` cannot be applied to `{}` and `{}`",
                operator, left, right
            )),
            ErrorImpl::UnsupportedOperator { code } => ErrorTip::Suggestion(format!(
                "Operator code {:#x} is outside the arithmetic, comparison and boolean ranges",
                code
            )),
            ErrorImpl::UnknownType { .. } => ErrorTip::Suggestion(String::from(
                "Every expression needs a resolved type before code generation",
            )),
            ErrorImpl::CodeGen { .. } => ErrorTip::None,
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("undefined symbol {name:?}")]
    UndefinedSymbol { name: String },
    #[error("type mismatch for {operator}: {left} and {right}")]
    TypeMismatch {
        operator: String,
        left: String,
        right: String,
    },
    #[error("unsupported operator code {code:#x}")]
    UnsupportedOperator { code: i32 },
    #[error("expression has no resolvable type: {expression}")]
    UnknownType { expression: String },
    #[error("backend rejected emission: {message}")]
    CodeGen { message: String },
}

/// Shorthand for backend failures, which carry no useful node.
pub fn codegen_error(message: impl Display, node: impl Into<String>) -> Error {
    Error::new(
        ErrorImpl::CodeGen {
            message: message.to_string(),
        },
        node,
    )
}
