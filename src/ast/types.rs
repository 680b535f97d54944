//! Type system definitions for the AST.
//!
//! The language has a closed set of value categories. `Unknown` is the
//! uninferred state and is never a valid operand type once inference ran.

use std::fmt::Display;

/// Represents the value categories of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Datatype {
    Integer,
    Double,
    String,
    Boolean,
    #[default]
    Unknown,
}

impl Datatype {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Datatype::Integer | Datatype::Double)
    }

    pub fn is_known(&self) -> bool {
        *self != Datatype::Unknown
    }

    /// Numeric widening: double dominates integer.
    ///
    /// Returns `None` unless both sides are numeric.
    pub fn widen(self, other: Datatype) -> Option<Datatype> {
        if !self.is_numeric() || !other.is_numeric() {
            return None;
        }

        if self == Datatype::Double || other == Datatype::Double {
            Some(Datatype::Double)
        } else {
            Some(Datatype::Integer)
        }
    }
}

impl Display for Datatype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Datatype::Integer => "INTEGER",
            Datatype::Double => "DOUBLE",
            Datatype::String => "STRING",
            Datatype::Boolean => "BOOLEAN",
            Datatype::Unknown => "UNKNOWN",
        };
        write!(f, "{}", name)
    }
}
