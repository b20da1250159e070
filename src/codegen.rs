use thiserror::Error;
use tracing::debug;

use crate::target::TargetAST;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("cannot render {variant} in this position")]
    UnknownNodeVariant { variant: &'static str },
}

/// Renders a target tree as text. A `Program` is only accepted at the root and
/// a call's callee must be an `Identifier`.
pub fn generate(node: &TargetAST) -> Result<String, GenerateError> {
    let output = match node {
        TargetAST::Program { body } => body
            .iter()
            .map(generate_nested)
            .collect::<Result<Vec<_>, _>>()?
            .join("\n"),
        _ => generate_nested(node)?,
    };

    debug!(bytes = output.len(), "generated output");
    Ok(output)
}

fn generate_nested(node: &TargetAST) -> Result<String, GenerateError> {
    match node {
        TargetAST::ExpressionStatement { expression } => {
            Ok(format!("{};", generate_nested(expression)?))
        }
        TargetAST::CallExpression { callee, arguments } => {
            let callee = match callee.as_ref() {
                TargetAST::Identifier(name) => name,
                other => {
                    return Err(GenerateError::UnknownNodeVariant {
                        variant: other.variant_name(),
                    })
                }
            };
            let arguments = arguments
                .iter()
                .map(generate_nested)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!("{}({})", callee, arguments.join(", ")))
        }
        TargetAST::Identifier(name) => Ok(name.clone()),
        TargetAST::NumberLiteral(value) => Ok(value.clone()),
        TargetAST::StringLiteral(value) => Ok(format!("\"{}\"", value)),
        TargetAST::Program { .. } => Err(GenerateError::UnknownNodeVariant {
            variant: node.variant_name(),
        }),
    }
}
