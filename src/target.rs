/// Call-expression shaped tree handed to the code generator.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TargetAST {
    Program {
        body: Vec<TargetAST>,
    },
    ExpressionStatement {
        expression: Box<TargetAST>,
    },
    CallExpression {
        callee: Box<TargetAST>,
        arguments: Vec<TargetAST>,
    },
    Identifier(String),
    NumberLiteral(String),
    StringLiteral(String),
}

impl TargetAST {
    pub fn call(name: impl Into<String>, arguments: Vec<TargetAST>) -> Self {
        TargetAST::CallExpression {
            callee: Box::new(TargetAST::Identifier(name.into())),
            arguments,
        }
    }

    pub fn statement(expression: TargetAST) -> Self {
        TargetAST::ExpressionStatement {
            expression: Box::new(expression),
        }
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            TargetAST::Program { .. } => "Program",
            TargetAST::ExpressionStatement { .. } => "ExpressionStatement",
            TargetAST::CallExpression { .. } => "CallExpression",
            TargetAST::Identifier(_) => "Identifier",
            TargetAST::NumberLiteral(_) => "NumberLiteral",
            TargetAST::StringLiteral(_) => "StringLiteral",
        }
    }
}
