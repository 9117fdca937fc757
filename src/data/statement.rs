//! Statement tree
//!
//! Parsed form of an include file: a tree of named blocks and instructions.
//! Sibling order is significant and preserved. No semantics are attached at
//! this layer; unknown names pass through untouched.

/// A single node of a parsed include file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Block(Block),
    Instruction(Instruction),
}

impl Statement {
    pub fn name(&self) -> &str {
        match self {
            Statement::Block(block) => &block.name,
            Statement::Instruction(instruction) => &instruction.name,
        }
    }
}

/// Named container holding ordered child statements.
///
/// The name is only unique within its parent scope, and may itself be a
/// numeral or a symbolic define.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub name: String,
    pub statements: Vec<Statement>,
}

impl Block {
    /// Find the first immediate child block with the given name.
    pub fn block(&self, name: &str) -> Option<&Block> {
        self.statements.iter().find_map(|statement| match statement {
            Statement::Block(block) if block.name == name => Some(block),
            _ => None,
        })
    }

    /// Find the first immediate child instruction with the given name.
    pub fn instruction(&self, name: &str) -> Option<&Instruction> {
        self.statements.iter().find_map(|statement| match statement {
            Statement::Instruction(instruction) if instruction.name == name => Some(instruction),
            _ => None,
        })
    }
}

/// Named leaf statement holding ordered scalar parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub name: String,
    pub parameters: Vec<Parameter>,
}

impl Instruction {
    /// Get the parameter at `index` coerced to an integer.
    ///
    /// Returns `None` when the parameter is absent or not numeric; absence is
    /// a "field not present" outcome, never a hard failure.
    pub fn integer(&self, index: usize) -> Option<i32> {
        match self.parameters.get(index)? {
            Parameter::Integer(value) => Some(*value),
            Parameter::Text(text) => text.parse().ok(),
        }
    }

    /// Get the parameter at `index` coerced to a string.
    pub fn text(&self, index: usize) -> Option<String> {
        match self.parameters.get(index)? {
            Parameter::Integer(value) => Some(value.to_string()),
            Parameter::Text(text) => Some(text.clone()),
        }
    }
}

/// Scalar instruction parameter. Quoting forces a text parameter; a bare
/// token that parses as an integer becomes an integer parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameter {
    Integer(i32),
    Text(String),
}

impl Parameter {
    pub(crate) fn from_token(token: &str) -> Self {
        if let Some(inner) = token.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
            return Parameter::Text(inner.to_string());
        }
        match token.parse() {
            Ok(value) => Parameter::Integer(value),
            Err(_) => Parameter::Text(token.to_string()),
        }
    }
}
