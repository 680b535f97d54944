use super::ast::{print_line, Expression, Node, Statement};

/// Expression Statement
/// Evaluates an expression for its side effects; the value is discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub expression: Expression,
}

impl ExpressionStatement {
    pub fn new(expression: Expression) -> Self {
        ExpressionStatement { expression }
    }
}

impl Node for ExpressionStatement {
    fn print(&self, tabs: usize, out: &mut String) {
        print_line(tabs, out, "ExpressionStatement:");
        print_line(tabs + 1, out, "Expression:");
        self.expression.print(tabs + 1, out);
    }
}

/// Print Statement
/// Writes its operand to standard output through the `printf` intrinsic.
#[derive(Debug, Clone, PartialEq)]
pub struct Print {
    pub expression: Expression,
}

impl Print {
    pub fn new(expression: Expression) -> Self {
        Print { expression }
    }
}

impl Node for Print {
    fn print(&self, tabs: usize, out: &mut String) {
        print_line(tabs, out, "Print: ");
        self.expression.print(tabs + 1, out);
    }
}

/// Variable Assignment
/// Binds `name` in the current scope. A later assignment to the same name in
/// the same scope overwrites the earlier binding.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableAssignment {
    pub name: String,
    pub value: Expression,
}

impl VariableAssignment {
    pub fn new(name: impl Into<String>, value: Expression) -> Self {
        VariableAssignment {
            name: name.into(),
            value,
        }
    }
}

impl Node for VariableAssignment {
    fn print(&self, tabs: usize, out: &mut String) {
        print_line(tabs, out, format!("VariableAssignment: {}", self.name));
        self.value.print(tabs + 1, out);
    }
}

/// Block Statement
/// A nested lexical scope.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Statement>,
}

impl Block {
    pub fn new(statements: Vec<Statement>) -> Self {
        Block { statements }
    }
}

impl Node for Block {
    fn print(&self, tabs: usize, out: &mut String) {
        print_line(tabs, out, "Block:");
        for statement in self.statements.iter() {
            statement.print(tabs + 1, out);
        }
    }
}

/// Function Declaration
/// A parameterless procedure whose body opens a scope under the global one.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub body: Block,
}

impl Function {
    pub fn new(name: impl Into<String>, statements: Vec<Statement>) -> Self {
        Function {
            name: name.into(),
            body: Block::new(statements),
        }
    }
}

impl Node for Function {
    fn print(&self, tabs: usize, out: &mut String) {
        print_line(tabs, out, format!("Function: {}", self.name));
        for statement in self.body.statements.iter() {
            statement.print(tabs + 1, out);
        }
    }
}

/// Program
/// Root of the tree. Owns the globals, the functions and the top-level
/// statements, lowered in that order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub globals: Vec<VariableAssignment>,
    pub functions: Vec<Function>,
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new(
        globals: Vec<VariableAssignment>,
        functions: Vec<Function>,
        statements: Vec<Statement>,
    ) -> Self {
        Program {
            globals,
            functions,
            statements,
        }
    }

    /// A program made only of top-level statements.
    pub fn from_statements(statements: Vec<Statement>) -> Self {
        Program {
            statements,
            ..Default::default()
        }
    }
}

impl Node for Program {
    fn print(&self, tabs: usize, out: &mut String) {
        print_line(tabs, out, "Program:");

        print_line(tabs + 1, out, "Globals:");
        for global in self.globals.iter() {
            global.print(tabs + 2, out);
        }

        print_line(tabs + 1, out, "Functions:");
        for function in self.functions.iter() {
            function.print(tabs + 2, out);
        }

        print_line(tabs + 1, out, "Statements:");
        for statement in self.statements.iter() {
            statement.print(tabs + 2, out);
        }
    }
}
