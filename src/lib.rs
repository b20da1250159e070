//! Compiles parenthesized prefix calls such as `(add 2 (subtract 4 2))` into
//! call-expression syntax such as `add(2, subtract(4, 2));`.
//!
//! The pipeline runs [`tok::tokenize`], [`parser::parse`],
//! [`transform::transform`] and [`codegen::generate`] in order; [`compile`]
//! chains all four and stops at the first failing stage.

pub mod ast;
pub mod codegen;
pub mod parser;
pub mod target;
pub mod tok;
pub mod transform;
pub mod walker;

use thiserror::Error;

use crate::codegen::{generate, GenerateError};
use crate::parser::{parse, ParseError};
use crate::tok::{tokenize, TokenizerError};
use crate::transform::{transform, TransformError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    #[error("tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("transform error: {0}")]
    Transform(#[from] TransformError),
    #[error("generate error: {0}")]
    Generate(#[from] GenerateError),
}

pub fn compile(source: &str) -> Result<String, CompileError> {
    let tokens = tokenize(source)?;
    let program = parse(&tokens)?;
    let target = transform(&program)?;
    Ok(generate(&target)?)
}
