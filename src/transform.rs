use thiserror::Error;
use tracing::debug;

use crate::ast::AST;
use crate::target::TargetAST;
use crate::walker::{walk, Visitor};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    #[error("{variant} has no enclosing program to append into")]
    MissingContext { variant: &'static str },
    #[error("a program cannot appear inside another node")]
    NestedProgram,
}

/// Target-side sequence that the children of the node being visited append
/// into.
enum Frame {
    Program(Vec<TargetAST>),
    Call {
        name: String,
        arguments: Vec<TargetAST>,
        as_statement: bool,
    },
}

impl Frame {
    fn push(&mut self, node: TargetAST) {
        match self {
            Frame::Program(body) => body.push(node),
            Frame::Call { arguments, .. } => arguments.push(node),
        }
    }
}

/// Stack of frames for the nodes currently being visited; the top frame
/// belongs to the innermost open node. Lives only for one `transform` call.
#[derive(Default)]
struct Transformer {
    frames: Vec<Frame>,
    finished: Option<TargetAST>,
}

impl Transformer {
    fn append(&mut self, node: TargetAST, variant: &'static str) -> Result<(), TransformError> {
        let frame = self
            .frames
            .last_mut()
            .ok_or(TransformError::MissingContext { variant })?;
        frame.push(node);
        Ok(())
    }
}

impl Visitor for Transformer {
    type Error = TransformError;

    fn enter_program(&mut self, _body: &[AST], parent: Option<&AST>) -> Result<(), Self::Error> {
        if parent.is_some() {
            return Err(TransformError::NestedProgram);
        }
        self.frames.push(Frame::Program(Vec::new()));
        Ok(())
    }

    fn exit_program(&mut self, _body: &[AST], _parent: Option<&AST>) -> Result<(), Self::Error> {
        match self.frames.pop() {
            Some(Frame::Program(body)) => {
                self.finished = Some(TargetAST::Program { body });
                Ok(())
            }
            _ => Err(TransformError::MissingContext { variant: "Program" }),
        }
    }

    fn enter_call_expression(
        &mut self,
        name: &str,
        _params: &[AST],
        parent: Option<&AST>,
    ) -> Result<(), Self::Error> {
        if self.frames.is_empty() {
            return Err(TransformError::MissingContext {
                variant: "CallExpression",
            });
        }

        // only the immediate parent decides statement vs bare call
        let as_statement = !matches!(parent, Some(AST::CallExpression { .. }));
        self.frames.push(Frame::Call {
            name: name.to_owned(),
            arguments: Vec::new(),
            as_statement,
        });
        Ok(())
    }

    fn exit_call_expression(
        &mut self,
        _name: &str,
        _params: &[AST],
        _parent: Option<&AST>,
    ) -> Result<(), Self::Error> {
        let (name, arguments, as_statement) = match self.frames.pop() {
            Some(Frame::Call {
                name,
                arguments,
                as_statement,
            }) => (name, arguments, as_statement),
            _ => {
                return Err(TransformError::MissingContext {
                    variant: "CallExpression",
                })
            }
        };

        let call = TargetAST::call(name, arguments);
        let node = if as_statement {
            TargetAST::statement(call)
        } else {
            call
        };
        self.append(node, "CallExpression")
    }

    fn enter_number_literal(
        &mut self,
        value: &str,
        _parent: Option<&AST>,
    ) -> Result<(), Self::Error> {
        self.append(TargetAST::NumberLiteral(value.to_owned()), "NumberLiteral")
    }

    fn enter_string_literal(
        &mut self,
        value: &str,
        _parent: Option<&AST>,
    ) -> Result<(), Self::Error> {
        self.append(TargetAST::StringLiteral(value.to_owned()), "StringLiteral")
    }
}

/// Rebuilds a source `Program` as a target `Program`. Calls directly under the
/// program become expression statements; calls used as arguments stay bare.
pub fn transform(program: &AST) -> Result<TargetAST, TransformError> {
    let mut transformer = Transformer::default();
    walk(program, &mut transformer)?;

    let target = transformer.finished.ok_or(TransformError::MissingContext {
        variant: program.variant_name(),
    })?;
    if let TargetAST::Program { body } = &target {
        debug!(statements = body.len(), "transformed program");
    }
    Ok(target)
}
