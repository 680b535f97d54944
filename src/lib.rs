#![allow(clippy::module_inception)]

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod compiler;
pub mod demos;
pub mod errors;
pub mod type_checker;

/// Renders an error as the compiler reports it.
///
/// ```text
/// Error: UndefinedSymbolError (`y` is not declared in this scope or any enclosing one)
/// -> undefined symbol "y" at `Identifier(y)`
/// ```
pub fn format_error(error: &Error) -> String {
    let header = match error.get_tip() {
        ErrorTip::None => format!("Error: {}", error.get_error_name()),
        tip => format!("Error: {} ({})", error.get_error_name(), tip),
    };

    format!("{}\n-> {}", header, error)
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::errors::errors::{Error, ErrorImpl};

    use super::format_error;

    #[test]
    fn test_format_error_without_tip() {
        let error = Error::new(
            ErrorImpl::CodeGen {
                message: String::from("bad"),
            },
            "module",
        );
        assert_eq!(
            format_error(&error),
            format!("Error: CodeGenError\n-> {}", error)
        );
    }

    #[test]
    fn test_format_error_with_tip() {
        let error = Error::new(
            ErrorImpl::UndefinedSymbol {
                name: String::from("y"),
            },
            "Identifier(y)",
        );
        let formatted = format_error(&error);
        assert!(formatted.starts_with("Error: UndefinedSymbolError ("));
        assert!(formatted.ends_with("-> undefined symbol \"y\" at `Identifier(y)`"));
    }
}
