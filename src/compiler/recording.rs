//! A backend that records emission requests instead of building IR.
//!
//! Every value it hands out is an index into its value table. Operations
//! whose operands are all constants are folded, so callers can observe what a
//! lowered expression evaluates to, and `output` renders what the recorded
//! `printf` calls would write.

use std::{collections::BTreeSet, fmt::Display};

use crate::{
    ast::operators::{ArithmeticOperator, BooleanOperator, ComparisonOperator},
    errors::errors::{codegen_error, Error},
};

use super::backend::{Backend, FunctionKind, NumericKind, ValueKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueId(pub usize);

impl Display for ValueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "%{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Integer(i64),
    Double(f64),
    Boolean(bool),
    String(String),
}

impl Display for Constant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constant::Integer(value) => write!(f, "i64 {}", value),
            Constant::Double(value) => write!(f, "double {:?}", value),
            Constant::Boolean(value) => write!(f, "i1 {}", value),
            Constant::String(value) => write!(f, "str {:?}", value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    IntToDouble {
        result: ValueId,
        operand: ValueId,
    },
    WidenInt {
        result: ValueId,
        operand: ValueId,
    },
    Arithmetic {
        result: ValueId,
        operator: ArithmeticOperator,
        kind: NumericKind,
        left: ValueId,
        right: ValueId,
    },
    Comparison {
        result: ValueId,
        operator: ComparisonOperator,
        kind: NumericKind,
        left: ValueId,
        right: ValueId,
    },
    Boolean {
        result: ValueId,
        operator: BooleanOperator,
        left: ValueId,
        right: ValueId,
    },
    Not {
        result: ValueId,
        operand: ValueId,
    },
    Call {
        result: ValueId,
        callee: String,
        arguments: Vec<ValueId>,
    },
    Return {
        kind: FunctionKind,
    },
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instruction::IntToDouble { result, operand } => {
                write!(f, "{} = sitofp {}", result, operand)
            }
            Instruction::WidenInt { result, operand } => write!(f, "{} = zext {}", result, operand),
            Instruction::Arithmetic {
                result,
                operator,
                kind,
                left,
                right,
            } => write!(f, "{} = {} {} {}, {}", result, operator, kind, left, right),
            Instruction::Comparison {
                result,
                operator,
                kind,
                left,
                right,
            } => write!(f, "{} = cmp {} {} {}, {}", result, operator, kind, left, right),
            Instruction::Boolean {
                result,
                operator,
                left,
                right,
            } => write!(f, "{} = {} {}, {}", result, operator, left, right),
            Instruction::Not { result, operand } => write!(f, "{} = not {}", result, operand),
            Instruction::Call {
                result,
                callee,
                arguments,
            } => {
                let arguments: Vec<String> =
                    arguments.iter().map(|argument| argument.to_string()).collect();
                write!(f, "{} = call {}({})", result, callee, arguments.join(", "))
            }
            Instruction::Return { kind } => match kind {
                FunctionKind::Entry => write!(f, "ret i32 0"),
                FunctionKind::Procedure => write!(f, "ret void"),
            },
        }
    }
}

#[derive(Debug, Clone)]
struct RecordedValue {
    kind: ValueKind,
    constant: Option<Constant>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFunction {
    pub name: String,
    pub kind: FunctionKind,
    pub instructions: Vec<Instruction>,
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    values: Vec<RecordedValue>,
    functions: Vec<RecordedFunction>,
    /// Indices into `functions` of the bodies currently being emitted
    open: Vec<usize>,
    globals: Vec<(String, ValueId)>,
    externals: BTreeSet<String>,
    finalized: bool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// The folded constant behind `value`, if every input to it was constant.
    pub fn evaluate(&self, value: ValueId) -> Option<&Constant> {
        self.values.get(value.0)?.constant.as_ref()
    }

    pub fn functions(&self) -> &[RecordedFunction] {
        &self.functions
    }

    pub fn function(&self, name: &str) -> Option<&RecordedFunction> {
        self.functions.iter().find(|function| function.name == name)
    }

    /// All instructions in emission order of their functions.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.functions
            .iter()
            .flat_map(|function| function.instructions.iter())
    }

    pub fn globals(&self) -> &[(String, ValueId)] {
        &self.globals
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.externals.contains(name)
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// What the recorded `printf` calls print, in program order.
    ///
    /// Only the entry function runs; procedures are never called. Calls with
    /// operands that did not fold to constants are skipped.
    pub fn output(&self) -> String {
        let mut out = String::new();

        let entry = self
            .functions
            .iter()
            .filter(|function| function.kind == FunctionKind::Entry);
        for function in entry {
            for instruction in function.instructions.iter() {
                if let Instruction::Call {
                    callee, arguments, ..
                } = instruction
                {
                    if callee == "printf" {
                        if let Some(text) = self.format_call(arguments) {
                            out.push_str(&text);
                        }
                    }
                }
            }
        }

        out
    }

    fn format_call(&self, arguments: &[ValueId]) -> Option<String> {
        let (format, rest) = arguments.split_first()?;
        let format = match self.evaluate(*format)? {
            Constant::String(format) => format,
            _ => return None,
        };
        let argument = rest.first().and_then(|argument| self.evaluate(*argument));

        let rendered = match argument {
            Some(Constant::Integer(value)) => format.replacen("%lld", &value.to_string(), 1),
            Some(Constant::Double(value)) => format.replacen("%lf", &format!("{:.6}", value), 1),
            Some(Constant::String(value)) => format.replacen("%s", value, 1),
            Some(Constant::Boolean(value)) => {
                format.replacen("%lld", &(*value as i64).to_string(), 1)
            }
            None => format.clone(),
        };
        Some(rendered)
    }

    /// Text listing of the recorded module.
    pub fn listing(&self) -> String {
        let mut out = String::new();

        for (index, value) in self.values.iter().enumerate() {
            if let Some(constant) = &value.constant {
                out.push_str(&format!("{} = const {}\n", ValueId(index), constant));
            }
        }
        for (name, value) in self.globals.iter() {
            out.push_str(&format!("@{} = global {}\n", name, value));
        }
        for external in self.externals.iter() {
            out.push_str(&format!("declare i32 @{}(i8*, ...)\n", external));
        }
        for function in self.functions.iter() {
            out.push_str(&format!("\ndefine @{} {{\n", function.name));
            for instruction in function.instructions.iter() {
                out.push_str(&format!("  {}\n", instruction));
            }
            out.push_str("}\n");
        }

        out
    }

    fn push_value(&mut self, kind: ValueKind, constant: Option<Constant>) -> ValueId {
        self.values.push(RecordedValue { kind, constant });
        ValueId(self.values.len() - 1)
    }

    fn kind_of(&self, value: ValueId) -> Result<ValueKind, Error> {
        self.values
            .get(value.0)
            .map(|recorded| recorded.kind)
            .ok_or_else(|| codegen_error(format!("unknown value {}", value), "recording backend"))
    }

    fn expect_kind(&self, value: ValueId, expected: ValueKind) -> Result<(), Error> {
        let kind = self.kind_of(value)?;
        if kind == expected {
            Ok(())
        } else {
            Err(codegen_error(
                format!("{} is {:?}, expected {:?}", value, kind, expected),
                "recording backend",
            ))
        }
    }

    fn emit(&mut self, instruction: Instruction) -> Result<(), Error> {
        let index = *self
            .open
            .last()
            .ok_or_else(|| codegen_error("no function to emit into", "recording backend"))?;
        self.functions[index].instructions.push(instruction);
        Ok(())
    }

    fn fold_arithmetic(
        &self,
        operator: ArithmeticOperator,
        left: ValueId,
        right: ValueId,
    ) -> Option<Constant> {
        match (self.evaluate(left)?, self.evaluate(right)?) {
            (Constant::Integer(left), Constant::Integer(right)) => {
                let (left, right) = (*left, *right);
                let value = match operator {
                    ArithmeticOperator::Addition => left.wrapping_add(right),
                    ArithmeticOperator::Subtraction => left.wrapping_sub(right),
                    ArithmeticOperator::Multiplication => left.wrapping_mul(right),
                    ArithmeticOperator::Division => left.checked_div(right)?,
                    ArithmeticOperator::Modulo => left.checked_rem(right)?,
                };
                Some(Constant::Integer(value))
            }
            (Constant::Double(left), Constant::Double(right)) => {
                let value = match operator {
                    ArithmeticOperator::Addition => left + right,
                    ArithmeticOperator::Subtraction => left - right,
                    ArithmeticOperator::Multiplication => left * right,
                    ArithmeticOperator::Division => left / right,
                    ArithmeticOperator::Modulo => left % right,
                };
                Some(Constant::Double(value))
            }
            _ => None,
        }
    }

    fn fold_comparison(
        &self,
        operator: ComparisonOperator,
        left: ValueId,
        right: ValueId,
    ) -> Option<Constant> {
        let ordering = match (self.evaluate(left)?, self.evaluate(right)?) {
            (Constant::Integer(left), Constant::Integer(right)) => left.partial_cmp(right),
            (Constant::Double(left), Constant::Double(right)) => left.partial_cmp(right),
            (Constant::Boolean(left), Constant::Boolean(right)) => left.partial_cmp(right),
            _ => return None,
        };

        // Unordered (NaN) operands fail every predicate except `isNot`, which
        // lowers to the unordered `une`
        let value = match ordering {
            Some(ordering) => match operator {
                ComparisonOperator::Leq => ordering.is_le(),
                ComparisonOperator::Geq => ordering.is_ge(),
                ComparisonOperator::Greater => ordering.is_gt(),
                ComparisonOperator::Less => ordering.is_lt(),
                ComparisonOperator::Equals => ordering.is_eq(),
                ComparisonOperator::IsNot => ordering.is_ne(),
            },
            None => operator == ComparisonOperator::IsNot,
        };
        Some(Constant::Boolean(value))
    }

    /// Functions and globals share one symbol namespace.
    fn ensure_unused(&self, name: &str) -> Result<(), Error> {
        if self.function(name).is_some() || self.externals.contains(name) {
            Err(codegen_error(format!("function {} is already defined", name), name))
        } else if self.globals.iter().any(|(global, _)| global == name) {
            Err(codegen_error(format!("global {} is already defined", name), name))
        } else {
            Ok(())
        }
    }

    fn boolean(&self, value: ValueId) -> Option<bool> {
        match self.evaluate(value)? {
            Constant::Boolean(value) => Some(*value),
            _ => None,
        }
    }
}

const BOOLEAN: ValueKind = ValueKind::Integer { bits: 1 };
const INTEGER: ValueKind = ValueKind::Integer { bits: 64 };

impl Backend for RecordingBackend {
    type Value = ValueId;

    fn const_int(&mut self, value: i64) -> Self::Value {
        self.push_value(INTEGER, Some(Constant::Integer(value)))
    }

    fn const_double(&mut self, value: f64) -> Self::Value {
        self.push_value(ValueKind::Double, Some(Constant::Double(value)))
    }

    fn const_bool(&mut self, value: bool) -> Self::Value {
        self.push_value(BOOLEAN, Some(Constant::Boolean(value)))
    }

    fn const_string(&mut self, value: &str) -> Result<Self::Value, Error> {
        if self.open.is_empty() {
            return Err(codegen_error(
                "string constants need an insertion point",
                "recording backend",
            ));
        }
        Ok(self.push_value(ValueKind::Pointer, Some(Constant::String(String::from(value)))))
    }

    fn value_kind(&self, value: Self::Value) -> ValueKind {
        self.kind_of(value).unwrap_or(ValueKind::Other)
    }

    fn build_int_to_double(&mut self, value: Self::Value) -> Result<Self::Value, Error> {
        self.expect_kind(value, INTEGER)?;
        let constant = match self.evaluate(value) {
            Some(Constant::Integer(value)) => Some(Constant::Double(*value as f64)),
            _ => None,
        };
        let result = self.push_value(ValueKind::Double, constant);
        self.emit(Instruction::IntToDouble {
            result,
            operand: value,
        })?;
        Ok(result)
    }

    fn build_widen_int(&mut self, value: Self::Value) -> Result<Self::Value, Error> {
        let constant = match self.kind_of(value)? {
            ValueKind::Integer { .. } => match self.evaluate(value) {
                Some(Constant::Boolean(value)) => Some(Constant::Integer(*value as i64)),
                Some(Constant::Integer(value)) => Some(Constant::Integer(*value)),
                _ => None,
            },
            other => {
                return Err(codegen_error(
                    format!("cannot widen {:?}", other),
                    "recording backend",
                ))
            }
        };
        let result = self.push_value(INTEGER, constant);
        self.emit(Instruction::WidenInt {
            result,
            operand: value,
        })?;
        Ok(result)
    }

    fn build_arithmetic(
        &mut self,
        operator: ArithmeticOperator,
        kind: NumericKind,
        left: Self::Value,
        right: Self::Value,
    ) -> Result<Self::Value, Error> {
        let value_kind = match kind {
            NumericKind::Integer => INTEGER,
            NumericKind::Double => ValueKind::Double,
        };
        self.expect_kind(left, value_kind)?;
        self.expect_kind(right, value_kind)?;

        let constant = self.fold_arithmetic(operator, left, right);
        let result = self.push_value(value_kind, constant);
        self.emit(Instruction::Arithmetic {
            result,
            operator,
            kind,
            left,
            right,
        })?;
        Ok(result)
    }

    fn build_comparison(
        &mut self,
        operator: ComparisonOperator,
        kind: NumericKind,
        left: Self::Value,
        right: Self::Value,
    ) -> Result<Self::Value, Error> {
        let left_kind = self.kind_of(left)?;
        let valid = match kind {
            NumericKind::Integer => matches!(left_kind, ValueKind::Integer { .. }),
            NumericKind::Double => left_kind == ValueKind::Double,
        };
        if !valid {
            return Err(codegen_error(
                format!("cannot compare {:?} as {}", left_kind, kind),
                "recording backend",
            ));
        }
        self.expect_kind(right, left_kind)?;

        let constant = self.fold_comparison(operator, left, right);
        let result = self.push_value(BOOLEAN, constant);
        self.emit(Instruction::Comparison {
            result,
            operator,
            kind,
            left,
            right,
        })?;
        Ok(result)
    }

    fn build_boolean(
        &mut self,
        operator: BooleanOperator,
        left: Self::Value,
        right: Self::Value,
    ) -> Result<Self::Value, Error> {
        self.expect_kind(left, BOOLEAN)?;
        self.expect_kind(right, BOOLEAN)?;

        let constant = match (self.boolean(left), self.boolean(right)) {
            (Some(left), Some(right)) => Some(Constant::Boolean(match operator {
                BooleanOperator::And => left & right,
                BooleanOperator::Or => left | right,
                BooleanOperator::Xor => left ^ right,
            })),
            _ => None,
        };
        let result = self.push_value(BOOLEAN, constant);
        self.emit(Instruction::Boolean {
            result,
            operator,
            left,
            right,
        })?;
        Ok(result)
    }

    fn build_not(&mut self, value: Self::Value) -> Result<Self::Value, Error> {
        self.expect_kind(value, BOOLEAN)?;

        let constant = self.boolean(value).map(|value| Constant::Boolean(!value));
        let result = self.push_value(BOOLEAN, constant);
        self.emit(Instruction::Not {
            result,
            operand: value,
        })?;
        Ok(result)
    }

    fn declare_variadic(&mut self, name: &str) -> Result<(), Error> {
        self.externals.insert(String::from(name));
        Ok(())
    }

    fn build_call(&mut self, name: &str, arguments: &[Self::Value]) -> Result<Self::Value, Error> {
        if !self.externals.contains(name) {
            return Err(codegen_error(
                format!("function {} is not declared", name),
                name,
            ));
        }
        match arguments.first() {
            Some(format) => self.expect_kind(*format, ValueKind::Pointer)?,
            None => {
                return Err(codegen_error(
                    format!("call to {} is missing its format", name),
                    name,
                ))
            }
        }

        let result = self.push_value(ValueKind::Integer { bits: 32 }, None);
        self.emit(Instruction::Call {
            result,
            callee: String::from(name),
            arguments: arguments.to_vec(),
        })?;
        Ok(result)
    }

    fn define_global(&mut self, name: &str, value: Self::Value) -> Result<(), Error> {
        if self.evaluate(value).is_none() {
            return Err(codegen_error("global initialiser is not a constant", name));
        }
        self.ensure_unused(name)?;
        self.globals.push((String::from(name), value));
        Ok(())
    }

    fn enter_function(&mut self, name: &str, kind: FunctionKind) -> Result<(), Error> {
        self.ensure_unused(name)?;

        self.functions.push(RecordedFunction {
            name: String::from(name),
            kind,
            instructions: vec![],
        });
        self.open.push(self.functions.len() - 1);
        Ok(())
    }

    fn leave_function(&mut self, kind: FunctionKind) -> Result<(), Error> {
        self.emit(Instruction::Return { kind })?;
        self.open.pop();
        Ok(())
    }

    fn finalize(&mut self, verify: bool) -> Result<(), Error> {
        if verify && !self.open.is_empty() {
            return Err(codegen_error(
                "module finalized with an unterminated function",
                "recording backend",
            ));
        }
        self.finalized = true;
        Ok(())
    }
}
