//! Include-file resource layer
//!
//! Tokenizer and statement-tree parser for the schema-less quest include
//! format, plus the read-only defines/texts symbol tables every resolution
//! site consults.

pub mod parser;
pub mod statement;
pub mod tables;
pub mod tokenizer;

pub use parser::parse;
pub use statement::{Block, Instruction, Parameter, Statement};
pub use tables::{DefineTable, GameResources, ResourcesHandle, TextTable};

use thiserror::Error;

/// Structural failure while tokenizing or parsing an include file.
///
/// Any of these abandons the whole file; the loader logs it and moves on to
/// the next file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unterminated string literal starting at byte {0}")]
    UnterminatedLiteral(usize),
    #[error("missing closing brace for block '{0}'")]
    UnclosedBlock(String),
    #[error("missing closing parenthesis for instruction '{0}'")]
    UnclosedParameterList(String),
    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),
}
