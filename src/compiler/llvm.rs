//! LLVM backend built on inkwell.
//!
//! Owns the LLVM module and IR builder for one compilation. Constants are
//! created through the builder, so operations on constant operands are folded
//! by LLVM and show up as constants in the printed IR.

use std::{fmt::Debug, path::PathBuf};

use inkwell::{
    basic_block::BasicBlock,
    builder::Builder,
    context::Context,
    module::{Linkage, Module},
    targets::{CodeModel, InitializationConfig, RelocMode, Target, TargetMachine},
    types::BasicTypeEnum,
    values::{BasicMetadataValueEnum, BasicValueEnum, FloatValue, IntValue},
    AddressSpace, FloatPredicate, IntPredicate, OptimizationLevel,
};
use tracing::{debug, trace};

use crate::{
    ast::operators::{ArithmeticOperator, BooleanOperator, ComparisonOperator},
    errors::errors::{codegen_error, Error},
};

use super::backend::{Backend, FunctionKind, NumericKind, ValueKind};

fn llvm_error(error: impl Debug) -> Error {
    codegen_error(format!("{:?}", error), "LLVM builder")
}

/// Code generation state backed by an LLVM module.
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the LLVM context
pub struct LlvmBackend<'a> {
    /// Reference to the LLVM context
    pub context: &'a Context,
    /// The LLVM module being built
    pub module: Module<'a>,
    /// The LLVM IR builder
    pub builder: Builder<'a>,
    /// Insertion points of the functions suspended by `enter_function`
    suspended: Vec<BasicBlock<'a>>,
    strings: usize,
}

impl<'a> LlvmBackend<'a> {
    pub fn new(context: &'a Context, module_name: &str) -> Self {
        LlvmBackend {
            context,
            module: context.create_module(module_name),
            builder: context.create_builder(),
            suspended: vec![],
            strings: 0,
        }
    }

    /// Renders the module as textual LLVM IR.
    pub fn print_to_string(&self) -> String {
        self.module.print_to_string().to_string()
    }

    /// Saves the module as textual LLVM IR.
    pub fn save_module_to_file(&self, output_file: PathBuf) -> Result<(), Error> {
        self.module
            .print_to_file(&output_file)
            .map_err(|error| codegen_error(error.to_string(), output_file.display().to_string()))
    }

    fn int(&self, value: BasicValueEnum<'a>) -> Result<IntValue<'a>, Error> {
        match value {
            BasicValueEnum::IntValue(value) => Ok(value),
            other => Err(codegen_error(
                format!("expected an integer value, found {:?}", other.get_type()),
                "LLVM builder",
            )),
        }
    }

    fn float(&self, value: BasicValueEnum<'a>) -> Result<FloatValue<'a>, Error> {
        match value {
            BasicValueEnum::FloatValue(value) => Ok(value),
            other => Err(codegen_error(
                format!("expected a double value, found {:?}", other.get_type()),
                "LLVM builder",
            )),
        }
    }

    /// LLVM renames a clashing symbol instead of failing, so clashes are
    /// rejected before anything named `name` is added.
    fn ensure_unused(&self, name: &str) -> Result<(), Error> {
        if self.module.get_function(name).is_some() {
            Err(codegen_error(format!("function {} is already defined", name), name))
        } else if self.module.get_global(name).is_some() {
            Err(codegen_error(format!("global {} is already defined", name), name))
        } else {
            Ok(())
        }
    }

    /// Sets the host triple and data layout on the module.
    fn configure_target(&self) -> Result<(), Error> {
        Target::initialize_native(&InitializationConfig::default())
            .map_err(|error| codegen_error(error, "target"))?;

        let target_triple = TargetMachine::get_default_triple();
        let target = Target::from_triple(&target_triple).map_err(llvm_error)?;
        let target_machine = target
            .create_target_machine(
                &target_triple,
                "generic",
                "",
                OptimizationLevel::None,
                RelocMode::PIC,
                CodeModel::Default,
            )
            .ok_or_else(|| codegen_error("unable to create target machine", "target"))?;

        self.module.set_triple(&target_triple);
        self.module
            .set_data_layout(&target_machine.get_target_data().get_data_layout());
        Ok(())
    }
}

impl<'a> Backend for LlvmBackend<'a> {
    type Value = BasicValueEnum<'a>;

    fn const_int(&mut self, value: i64) -> Self::Value {
        self.context.i64_type().const_int(value as u64, true).into()
    }

    fn const_double(&mut self, value: f64) -> Self::Value {
        self.context.f64_type().const_float(value).into()
    }

    fn const_bool(&mut self, value: bool) -> Self::Value {
        self.context.bool_type().const_int(value as u64, false).into()
    }

    fn const_string(&mut self, value: &str) -> Result<Self::Value, Error> {
        let name = format!(".str.{}", self.strings);
        self.strings += 1;

        Ok(self
            .builder
            .build_global_string_ptr(value, &name)
            .map_err(llvm_error)?
            .as_pointer_value()
            .into())
    }

    fn value_kind(&self, value: Self::Value) -> ValueKind {
        match value.get_type() {
            BasicTypeEnum::IntType(int_type) => ValueKind::Integer {
                bits: int_type.get_bit_width(),
            },
            BasicTypeEnum::FloatType(_) => ValueKind::Double,
            BasicTypeEnum::PointerType(_) => ValueKind::Pointer,
            _ => ValueKind::Other,
        }
    }

    fn build_int_to_double(&mut self, value: Self::Value) -> Result<Self::Value, Error> {
        let value = self.int(value)?;
        Ok(self
            .builder
            .build_signed_int_to_float(value, self.context.f64_type(), "")
            .map_err(llvm_error)?
            .into())
    }

    fn build_widen_int(&mut self, value: Self::Value) -> Result<Self::Value, Error> {
        let value = self.int(value)?;
        Ok(self
            .builder
            .build_int_z_extend(value, self.context.i64_type(), "")
            .map_err(llvm_error)?
            .into())
    }

    fn build_arithmetic(
        &mut self,
        operator: ArithmeticOperator,
        kind: NumericKind,
        left: Self::Value,
        right: Self::Value,
    ) -> Result<Self::Value, Error> {
        trace!(%operator, %kind, "building arithmetic");

        let value: BasicValueEnum<'a> = match kind {
            NumericKind::Integer => {
                let (left, right) = (self.int(left)?, self.int(right)?);
                match operator {
                    ArithmeticOperator::Addition => self.builder.build_int_add(left, right, ""),
                    ArithmeticOperator::Subtraction => self.builder.build_int_sub(left, right, ""),
                    ArithmeticOperator::Multiplication => {
                        self.builder.build_int_mul(left, right, "")
                    }
                    ArithmeticOperator::Division => {
                        self.builder.build_int_signed_div(left, right, "")
                    }
                    ArithmeticOperator::Modulo => {
                        self.builder.build_int_signed_rem(left, right, "")
                    }
                }
                .map_err(llvm_error)?
                .into()
            }
            NumericKind::Double => {
                let (left, right) = (self.float(left)?, self.float(right)?);
                match operator {
                    ArithmeticOperator::Addition => self.builder.build_float_add(left, right, ""),
                    ArithmeticOperator::Subtraction => {
                        self.builder.build_float_sub(left, right, "")
                    }
                    ArithmeticOperator::Multiplication => {
                        self.builder.build_float_mul(left, right, "")
                    }
                    ArithmeticOperator::Division => self.builder.build_float_div(left, right, ""),
                    ArithmeticOperator::Modulo => self.builder.build_float_rem(left, right, ""),
                }
                .map_err(llvm_error)?
                .into()
            }
        };

        Ok(value)
    }

    fn build_comparison(
        &mut self,
        operator: ComparisonOperator,
        kind: NumericKind,
        left: Self::Value,
        right: Self::Value,
    ) -> Result<Self::Value, Error> {
        trace!(%operator, %kind, "building comparison");

        let value = match kind {
            NumericKind::Integer => {
                let predicate = match operator {
                    ComparisonOperator::Leq => IntPredicate::SLE,
                    ComparisonOperator::Geq => IntPredicate::SGE,
                    ComparisonOperator::Greater => IntPredicate::SGT,
                    ComparisonOperator::Less => IntPredicate::SLT,
                    ComparisonOperator::Equals => IntPredicate::EQ,
                    ComparisonOperator::IsNot => IntPredicate::NE,
                };
                let (left, right) = (self.int(left)?, self.int(right)?);
                self.builder
                    .build_int_compare(predicate, left, right, "")
                    .map_err(llvm_error)?
            }
            NumericKind::Double => {
                let predicate = match operator {
                    ComparisonOperator::Leq => FloatPredicate::OLE,
                    ComparisonOperator::Geq => FloatPredicate::OGE,
                    ComparisonOperator::Greater => FloatPredicate::OGT,
                    ComparisonOperator::Less => FloatPredicate::OLT,
                    ComparisonOperator::Equals => FloatPredicate::OEQ,
                    ComparisonOperator::IsNot => FloatPredicate::UNE,
                };
                let (left, right) = (self.float(left)?, self.float(right)?);
                self.builder
                    .build_float_compare(predicate, left, right, "")
                    .map_err(llvm_error)?
            }
        };

        Ok(value.into())
    }

    fn build_boolean(
        &mut self,
        operator: BooleanOperator,
        left: Self::Value,
        right: Self::Value,
    ) -> Result<Self::Value, Error> {
        let (left, right) = (self.int(left)?, self.int(right)?);
        let value = match operator {
            BooleanOperator::And => self.builder.build_and(left, right, ""),
            BooleanOperator::Or => self.builder.build_or(left, right, ""),
            BooleanOperator::Xor => self.builder.build_xor(left, right, ""),
        }
        .map_err(llvm_error)?;

        Ok(value.into())
    }

    fn build_not(&mut self, value: Self::Value) -> Result<Self::Value, Error> {
        let value = self.int(value)?;
        Ok(self.builder.build_not(value, "").map_err(llvm_error)?.into())
    }

    fn declare_variadic(&mut self, name: &str) -> Result<(), Error> {
        if self.module.get_function(name).is_some() {
            return Ok(());
        }

        let i8_ptr_type = self.context.i8_type().ptr_type(AddressSpace::default());
        let function_type = self.context.i32_type().fn_type(&[i8_ptr_type.into()], true);
        self.module
            .add_function(name, function_type, Some(Linkage::External));

        debug!(function = name, "declared external variadic function");
        Ok(())
    }

    fn build_call(&mut self, name: &str, arguments: &[Self::Value]) -> Result<Self::Value, Error> {
        let function = self
            .module
            .get_function(name)
            .ok_or_else(|| codegen_error(format!("function {} is not declared", name), name))?;

        let arguments: Vec<BasicMetadataValueEnum<'a>> =
            arguments.iter().map(|argument| (*argument).into()).collect();

        self.builder
            .build_call(function, &arguments, "")
            .map_err(llvm_error)?
            .try_as_basic_value()
            .left()
            .ok_or_else(|| codegen_error(format!("call to {} produced no value", name), name))
    }

    fn define_global(&mut self, name: &str, value: Self::Value) -> Result<(), Error> {
        let is_constant = match value {
            BasicValueEnum::IntValue(value) => value.is_const(),
            BasicValueEnum::FloatValue(value) => value.is_const(),
            BasicValueEnum::PointerValue(value) => value.is_const(),
            _ => false,
        };
        if !is_constant {
            return Err(codegen_error("global initialiser is not a constant", name));
        }
        self.ensure_unused(name)?;

        let global = self
            .module
            .add_global(value.get_type(), Some(AddressSpace::default()), name);
        global.set_initializer(&value);
        global.set_constant(true);
        Ok(())
    }

    fn enter_function(&mut self, name: &str, kind: FunctionKind) -> Result<(), Error> {
        self.ensure_unused(name)?;

        let function_type = match kind {
            FunctionKind::Entry => self.context.i32_type().fn_type(&[], false),
            FunctionKind::Procedure => self.context.void_type().fn_type(&[], false),
        };

        if let Some(block) = self.builder.get_insert_block() {
            self.suspended.push(block);
        }

        let function = self.module.add_function(name, function_type, None);
        let entry = self.context.append_basic_block(function, "entry");
        self.builder.position_at_end(entry);
        Ok(())
    }

    fn leave_function(&mut self, kind: FunctionKind) -> Result<(), Error> {
        match kind {
            FunctionKind::Entry => self
                .builder
                .build_return(Some(&self.context.i32_type().const_zero())),
            FunctionKind::Procedure => self.builder.build_return(None),
        }
        .map_err(llvm_error)?;

        match self.suspended.pop() {
            Some(block) => self.builder.position_at_end(block),
            None => self.builder.clear_insertion_position(),
        }
        Ok(())
    }

    fn finalize(&mut self, verify: bool) -> Result<(), Error> {
        self.configure_target()?;

        if verify {
            self.module
                .verify()
                .map_err(|error| codegen_error(error.to_string(), "module"))?;
        }

        debug!(
            functions = self.module.get_functions().count(),
            "finalized LLVM module"
        );
        Ok(())
    }
}
