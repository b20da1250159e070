//! Depth-first traversal of the source tree.
//!
//! [`walk`] calls a [`Visitor`]'s `enter_*` callback for a node before
//! descending into its children left to right, and the matching `exit_*`
//! callback once they have all been visited. Every callback defaults to a
//! no-op, so a visitor only overrides the variants it cares about. The root is
//! visited with `parent == None`.

use crate::ast::AST;

pub trait Visitor {
    type Error;

    fn enter_program(&mut self, _body: &[AST], _parent: Option<&AST>) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_program(&mut self, _body: &[AST], _parent: Option<&AST>) -> Result<(), Self::Error> {
        Ok(())
    }

    fn enter_call_expression(
        &mut self,
        _name: &str,
        _params: &[AST],
        _parent: Option<&AST>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_call_expression(
        &mut self,
        _name: &str,
        _params: &[AST],
        _parent: Option<&AST>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn enter_number_literal(
        &mut self,
        _value: &str,
        _parent: Option<&AST>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_number_literal(
        &mut self,
        _value: &str,
        _parent: Option<&AST>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn enter_string_literal(
        &mut self,
        _value: &str,
        _parent: Option<&AST>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_string_literal(
        &mut self,
        _value: &str,
        _parent: Option<&AST>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Walks `root` and everything below it. The first callback error stops the
/// traversal and is returned as is.
pub fn walk<V: Visitor>(root: &AST, visitor: &mut V) -> Result<(), V::Error> {
    walk_node(root, None, visitor)
}

fn walk_children<V: Visitor>(
    children: &[AST],
    parent: &AST,
    visitor: &mut V,
) -> Result<(), V::Error> {
    for child in children {
        walk_node(child, Some(parent), visitor)?;
    }
    Ok(())
}

fn walk_node<V: Visitor>(node: &AST, parent: Option<&AST>, visitor: &mut V) -> Result<(), V::Error> {
    match node {
        AST::Program { body } => {
            visitor.enter_program(body, parent)?;
            walk_children(body, node, visitor)?;
            visitor.exit_program(body, parent)
        }
        AST::CallExpression { name, params } => {
            visitor.enter_call_expression(name, params, parent)?;
            walk_children(params, node, visitor)?;
            visitor.exit_call_expression(name, params, parent)
        }
        AST::NumberLiteral(value) => {
            visitor.enter_number_literal(value, parent)?;
            visitor.exit_number_literal(value, parent)
        }
        AST::StringLiteral(value) => {
            visitor.enter_string_literal(value, parent)?;
            visitor.exit_string_literal(value, parent)
        }
    }
}
