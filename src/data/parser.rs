//! Statement tree parser
//!
//! Single forward pass over the token stream, no backtracking. A file is a
//! sequence of statements; `NAME { ... }` opens a block, `NAME ( p, ... ) ;`
//! is an instruction, and a bare `NAME ;` is a zero-parameter instruction.
//! The format is permissive: stray separators are skipped and unknown names
//! are accepted opaquely. Unbalanced delimiters fail the whole file.

use super::statement::{Block, Instruction, Parameter, Statement};
use super::tokenizer::tokenize;
use super::ParseError;

/// Parse include-file text into a statement tree.
pub fn parse(source: &str) -> Result<Vec<Statement>, ParseError> {
    let tokens = tokenize(source)?;
    let mut cursor = Cursor { tokens: &tokens, position: 0 };
    cursor.parse_statements(None)
}

struct Cursor<'a> {
    tokens: &'a [&'a str],
    position: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.position).copied()
    }

    fn advance(&mut self) -> Option<&'a str> {
        let token = self.peek()?;
        self.position += 1;
        Some(token)
    }

    /// Parse statements until end of input, or until the closing brace of
    /// `block_name` when inside a block.
    fn parse_statements(&mut self, block_name: Option<&str>) -> Result<Vec<Statement>, ParseError> {
        let mut statements = Vec::new();

        while let Some(token) = self.peek() {
            match token {
                "}" => {
                    return match block_name {
                        Some(_) => {
                            self.advance();
                            Ok(statements)
                        }
                        None => Err(ParseError::UnexpectedToken("}".to_string())),
                    };
                }
                ";" | "," | "=" => {
                    self.advance();
                }
                "{" | "(" | ")" => {
                    return Err(ParseError::UnexpectedToken(token.to_string()));
                }
                name => {
                    let name = unquote(name).to_string();
                    self.advance();
                    statements.push(self.parse_statement(name)?);
                }
            }
        }

        match block_name {
            Some(name) => Err(ParseError::UnclosedBlock(name.to_string())),
            None => Ok(statements),
        }
    }

    fn parse_statement(&mut self, name: String) -> Result<Statement, ParseError> {
        match self.peek() {
            Some("{") => {
                self.advance();
                let statements = self.parse_statements(Some(&name))?;
                Ok(Statement::Block(Block { name, statements }))
            }
            Some("(") => {
                self.advance();
                let parameters = self.parse_parameters(&name)?;
                if self.peek() == Some(";") {
                    self.advance();
                }
                Ok(Statement::Instruction(Instruction { name, parameters }))
            }
            _ => {
                // Bare `NAME ;` — the separator itself is optional.
                if self.peek() == Some(";") {
                    self.advance();
                }
                Ok(Statement::Instruction(Instruction {
                    name,
                    parameters: Vec::new(),
                }))
            }
        }
    }

    fn parse_parameters(&mut self, name: &str) -> Result<Vec<Parameter>, ParseError> {
        let mut parameters = Vec::new();

        loop {
            match self.advance() {
                None => return Err(ParseError::UnclosedParameterList(name.to_string())),
                Some(")") => return Ok(parameters),
                Some(",") => {}
                Some(token) => parameters.push(Parameter::from_token(token)),
            }
        }
    }
}

fn unquote(token: &str) -> &str {
    token
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(token)
}
