use thiserror::Error;
use tracing::debug;

use crate::ast::AST;
use crate::tok::{Position, TokenAndSpan, TokenKind};

/// Deepest call nesting accepted before parsing is rejected. Keeps the
/// recursive stages well clear of the thread's stack limit.
pub const MAX_NESTING_DEPTH: usize = 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected end of input inside the call opened at {open}")]
    UnexpectedEof { open: Position },
    #[error("unexpected {kind} token {text:?} at {at}")]
    UnexpectedToken {
        kind: TokenKind,
        text: String,
        at: Position,
    },
    #[error("call at {at} must start with a name, found {found} token")]
    MalformedCall { found: TokenKind, at: Position },
    #[error("call at {at} is nested more than {} levels deep", MAX_NESTING_DEPTH)]
    NestingTooDeep { at: Position },
}

/// Builds a source tree from a token slice, sharing one cursor across the
/// recursive descent.
pub struct RecursiveDescentParser<'a> {
    tokens_and_spans: &'a [TokenAndSpan],
    current: usize,
    depth: usize,
}

impl<'a> RecursiveDescentParser<'a> {
    pub fn new(tokens_and_spans: &'a [TokenAndSpan]) -> Self {
        Self {
            tokens_and_spans,
            current: 0,
            depth: 0,
        }
    }

    pub fn parse_program(&mut self) -> Result<AST, ParseError> {
        let mut body = Vec::new();
        while let Some(expr) = self.next_expression()? {
            body.push(expr);
        }

        debug!(statements = body.len(), "parsed program");
        Ok(AST::Program { body })
    }

    /// Parses the expression at the cursor, or returns `None` at the end of
    /// the token sequence.
    pub fn next_expression(&mut self) -> Result<Option<AST>, ParseError> {
        match self.advance() {
            Some(token_and_span) => self.expression(token_and_span).map(Some),
            None => Ok(None),
        }
    }

    fn expression(&mut self, token_and_span: &'a TokenAndSpan) -> Result<AST, ParseError> {
        let token = &token_and_span.token;

        match token.kind {
            TokenKind::Number => Ok(AST::NumberLiteral(token.text.clone())),
            TokenKind::String => Ok(AST::StringLiteral(token.text.clone())),

            // open paren tokens indicate we should go down one level in parsing things
            TokenKind::Paren if token.is_open_paren() => {
                if self.depth >= MAX_NESTING_DEPTH {
                    return Err(ParseError::NestingTooDeep {
                        at: token_and_span.from,
                    });
                }
                self.depth += 1;
                let call = self.call_expression(token_and_span.from);
                self.depth -= 1;
                call
            }

            _ => Err(ParseError::UnexpectedToken {
                kind: token.kind,
                text: token.text.clone(),
                at: token_and_span.from,
            }),
        }
    }

    fn call_expression(&mut self, open: Position) -> Result<AST, ParseError> {
        let name_token = self
            .advance()
            .ok_or(ParseError::UnexpectedEof { open })?;
        if name_token.token.kind != TokenKind::Name {
            return Err(ParseError::MalformedCall {
                found: name_token.token.kind,
                at: name_token.from,
            });
        }
        let name = name_token.token.text.clone();

        let mut params = Vec::new();
        loop {
            match self.advance() {
                None => return Err(ParseError::UnexpectedEof { open }),
                // close paren tokens indicate we should go up one level, and so return
                Some(next) if next.token.is_close_paren() => break,
                Some(next) => params.push(self.expression(next)?),
            }
        }

        Ok(AST::CallExpression { name, params })
    }

    fn peek(&self) -> Option<&'a TokenAndSpan> {
        self.tokens_and_spans.get(self.current)
    }

    fn advance(&mut self) -> Option<&'a TokenAndSpan> {
        let token_and_span = self.peek()?;
        self.current += 1;
        Some(token_and_span)
    }
}

/// Parses a whole token sequence into a `Program`. An empty sequence yields an
/// empty body.
pub fn parse(tokens_and_spans: &[TokenAndSpan]) -> Result<AST, ParseError> {
    RecursiveDescentParser::new(tokens_and_spans).parse_program()
}
