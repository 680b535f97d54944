//! Main compiler module.
//!
//! This module contains the code generation context and the compilation
//! pipeline: the symbol-table pass runs over the whole program first, and only
//! if it succeeds is the program lowered into the backend and the backend
//! module finalized.

use tracing::{debug, info};

use crate::{
    ast::{statements::Program, types::Datatype},
    errors::errors::Error,
    type_checker::{
        symbol_table::{ScopeId, SymbolTable},
        type_checker::{build_symbol_table, GLOBAL_SCOPE},
    },
};

use super::{
    backend::{Backend, FunctionKind},
    stmt::gen_program,
};

/// Name of the external print entry point.
pub const PRINTF: &str = "printf";

/// Compilation settings.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Name of the function top-level statements are lowered into
    pub entry_point: String,
    /// Whether the backend should verify the module when finalizing
    pub verify: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            entry_point: String::from("main"),
            verify: true,
        }
    }
}

/// A generated value together with its static type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Typed<V> {
    pub datatype: Datatype,
    pub value: V,
}

impl<V> Typed<V> {
    pub fn new(datatype: Datatype, value: V) -> Self {
        Typed { datatype, value }
    }
}

/// Format descriptors passed to `printf`, created once per compilation.
#[derive(Debug, Clone, Copy)]
pub struct FormatDescriptors<V> {
    pub integer: V,
    pub double: V,
    pub string: V,
}

/// The state of one compilation.
///
/// Holds the backend, the generated-value table consulted while lowering and
/// the current position (innermost scope and function) in the tree. The type
/// pass has already accepted the program by the time a context exists.
pub struct CodeGenContext<B: Backend> {
    pub backend: B,
    pub options: CompileOptions,
    /// Generated values, scoped the same way as the symbol table
    pub values: SymbolTable<Typed<B::Value>>,
    pub current_scope: ScopeId,
    pub current_function: Option<String>,
    pub formats: Option<FormatDescriptors<B::Value>>,
}

impl<B: Backend> CodeGenContext<B> {
    pub fn new(backend: B, options: CompileOptions) -> Self {
        let values = SymbolTable::new(GLOBAL_SCOPE);
        let current_scope = values.root();

        CodeGenContext {
            backend,
            options,
            values,
            current_scope,
            current_function: None,
            formats: None,
        }
    }

    /// Opens a child scope of the current one and makes it current.
    pub fn enter_scope(&mut self, name: &str) -> ScopeId {
        self.current_scope = self.values.enter(self.current_scope, name);
        self.current_scope
    }

    /// Returns to the parent of the current scope.
    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.values.parent(self.current_scope) {
            self.current_scope = parent;
        }
    }

    /// Looks a generated value up from the current scope outwards.
    pub fn search_value(&self, name: &str) -> Option<Typed<B::Value>> {
        self.values.lookup(self.current_scope, name).copied()
    }

    pub fn declare_value(&mut self, name: &str, value: Typed<B::Value>) {
        self.values.declare(self.current_scope, name, value);
    }

    /// Declares `printf` and precomputes its format descriptors.
    ///
    /// Must run inside a function, since the descriptors are global strings
    /// created through the builder.
    fn create_printf(&mut self) -> Result<(), Error> {
        self.backend.declare_variadic(PRINTF)?;
        self.formats = Some(FormatDescriptors {
            integer: self.backend.const_string("%lld\n")?,
            double: self.backend.const_string("%lf\n")?,
            string: self.backend.const_string("%s\n")?,
        });
        Ok(())
    }

    /// Lowers `program` into the backend and finalizes the module.
    pub fn generate_code(&mut self, program: &Program) -> Result<(), Error> {
        let entry_point = self.options.entry_point.clone();

        self.backend.enter_function(&entry_point, FunctionKind::Entry)?;
        self.current_function = Some(entry_point);
        self.create_printf()?;

        gen_program(self, program)?;

        self.backend.leave_function(FunctionKind::Entry)?;
        self.current_function = None;

        self.backend.finalize(self.options.verify)?;
        debug!(scopes = self.values.len(), "code generation finished");
        Ok(())
    }

    /// Consumes the context, handing back the finalized backend.
    pub fn into_backend(self) -> B {
        self.backend
    }
}

/// Compiles a program: builds the symbol table, then generates code.
///
/// Any error aborts the compilation and the partially built backend is
/// dropped, so a module is only ever returned complete.
///
/// # Returns
///
/// The code generation context, whose backend holds the finalized module.
pub fn compile<B: Backend>(
    program: &Program,
    backend: B,
    options: CompileOptions,
) -> Result<CodeGenContext<B>, Error> {
    info!(
        globals = program.globals.len(),
        functions = program.functions.len(),
        statements = program.statements.len(),
        "compiling program"
    );

    let symbols = build_symbol_table(program)?;
    debug!(scopes = symbols.len(), "symbol table pass finished");

    let mut context = CodeGenContext::new(backend, options);
    context.generate_code(program)?;

    Ok(context)
}
