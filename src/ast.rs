/// Source tree produced by the parser. Literal values stay as source text.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AST {
    Program { body: Vec<AST> },
    CallExpression { name: String, params: Vec<AST> },
    NumberLiteral(String),
    StringLiteral(String),
}

impl AST {
    pub fn variant_name(&self) -> &'static str {
        match self {
            AST::Program { .. } => "Program",
            AST::CallExpression { .. } => "CallExpression",
            AST::NumberLiteral(_) => "NumberLiteral",
            AST::StringLiteral(_) => "StringLiteral",
        }
    }
}
